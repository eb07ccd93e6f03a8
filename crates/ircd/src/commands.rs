use thiserror::Error;

use crate::message::Message;

/// One fully extracted client command, ready for a handler. Comma lists
/// (JOIN targets, PRIVMSG targets, KICK victims) are split here so handlers
/// only see positional data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pass {
        password: String,
    },
    Nick {
        nick: String,
    },
    User {
        username: String,
        realname: String,
    },
    Cap {
        subcommand: String,
    },
    Quit {
        reason: Option<String>,
    },
    Ping {
        token: String,
    },
    Pong,
    Join {
        targets: Vec<String>,
        keys: Vec<String>,
    },
    Part {
        channels: Vec<String>,
        reason: Option<String>,
    },
    Privmsg {
        targets: Vec<String>,
        text: String,
    },
    Notice {
        targets: Vec<String>,
        text: String,
    },
    Kick {
        channel: String,
        victims: Vec<String>,
        reason: Option<String>,
    },
    Invite {
        nick: String,
        channel: String,
    },
    Topic {
        channel: String,
        topic: Option<String>,
    },
    Mode {
        target: String,
        modestring: Option<String>,
        params: Vec<String>,
    },
    Who {
        mask: Option<String>,
    },
    Whois {
        nick: String,
    },
    Names {
        channels: Option<Vec<String>>,
    },
    List {
        channels: Option<Vec<String>>,
    },
    Motd,
    Version,
    Time,
    Info,
    Admin,
    Stats,
}

/// Verb-level failures, each mapping to exactly one numeric reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{verb} needs more parameters")]
    NeedMoreParams { verb: String }, // 461

    #[error("no nickname given")]
    NoNicknameGiven, // 431

    #[error("no recipient given ({verb})")]
    NoRecipient { verb: String }, // 411

    #[error("no text to send")]
    NoTextToSend, // 412

    #[error("no origin specified")]
    NoOrigin, // 409

    #[error("unknown command {verb}")]
    UnknownCommand { verb: String }, // 421
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

impl Command {
    pub fn parse(message: &Message) -> Result<Command, CommandError> {
        let params = &message.params;
        let need = |n: usize| -> Result<(), CommandError> {
            if params.len() < n {
                Err(CommandError::NeedMoreParams {
                    verb: message.verb.clone(),
                })
            } else {
                Ok(())
            }
        };

        match message.verb.as_str() {
            "PASS" => {
                need(1)?;
                Ok(Command::Pass {
                    password: params[0].clone(),
                })
            }
            "NICK" => {
                if params.is_empty() || params[0].is_empty() {
                    return Err(CommandError::NoNicknameGiven);
                }
                Ok(Command::Nick {
                    nick: params[0].clone(),
                })
            }
            "USER" => {
                need(4)?;
                Ok(Command::User {
                    username: params[0].clone(),
                    realname: params[3].clone(),
                })
            }
            "CAP" => Ok(Command::Cap {
                subcommand: params.first().cloned().unwrap_or_else(|| "LS".to_string()),
            }),
            "QUIT" => Ok(Command::Quit {
                reason: params.first().cloned(),
            }),
            "PING" => {
                if params.is_empty() {
                    return Err(CommandError::NoOrigin);
                }
                Ok(Command::Ping {
                    token: params[0].clone(),
                })
            }
            "PONG" => Ok(Command::Pong),
            "JOIN" => {
                need(1)?;
                Ok(Command::Join {
                    targets: split_list(&params[0]),
                    keys: params.get(1).map(|k| split_list(k)).unwrap_or_default(),
                })
            }
            "PART" => {
                need(1)?;
                Ok(Command::Part {
                    channels: split_list(&params[0]),
                    reason: params.get(1).cloned(),
                })
            }
            "PRIVMSG" => {
                if params.is_empty() {
                    return Err(CommandError::NoRecipient {
                        verb: message.verb.clone(),
                    });
                }
                if params.len() < 2 {
                    return Err(CommandError::NoTextToSend);
                }
                Ok(Command::Privmsg {
                    targets: split_list(&params[0]),
                    text: params[1].clone(),
                })
            }
            // NOTICE never produces error numerics: a malformed one is
            // simply a no-op with zero targets
            "NOTICE" => Ok(Command::Notice {
                targets: params.first().map(|t| split_list(t)).unwrap_or_default(),
                text: params.get(1).cloned().unwrap_or_default(),
            }),
            "KICK" => {
                need(2)?;
                Ok(Command::Kick {
                    channel: params[0].clone(),
                    victims: split_list(&params[1]),
                    reason: params.get(2).cloned(),
                })
            }
            "INVITE" => {
                need(2)?;
                Ok(Command::Invite {
                    nick: params[0].clone(),
                    channel: params[1].clone(),
                })
            }
            "TOPIC" => {
                need(1)?;
                Ok(Command::Topic {
                    channel: params[0].clone(),
                    topic: params.get(1).cloned(),
                })
            }
            "MODE" => {
                need(1)?;
                Ok(Command::Mode {
                    target: params[0].clone(),
                    modestring: params.get(1).cloned(),
                    params: params.iter().skip(2).cloned().collect(),
                })
            }
            "WHO" => Ok(Command::Who {
                mask: params.first().cloned(),
            }),
            "WHOIS" => {
                if params.is_empty() {
                    return Err(CommandError::NoNicknameGiven);
                }
                Ok(Command::Whois {
                    nick: params[0].clone(),
                })
            }
            "NAMES" => Ok(Command::Names {
                channels: params.first().map(|c| split_list(c)),
            }),
            "LIST" => Ok(Command::List {
                channels: params.first().map(|c| split_list(c)),
            }),
            "MOTD" => Ok(Command::Motd),
            "VERSION" => Ok(Command::Version),
            "TIME" => Ok(Command::Time),
            "INFO" => Ok(Command::Info),
            "ADMIN" => Ok(Command::Admin),
            "STATS" => Ok(Command::Stats),
            _ => Err(CommandError::UnknownCommand {
                verb: message.verb.clone(),
            }),
        }
    }

    /// Pre-registration gate: everything else is answered with 451.
    pub fn allowed_before_registration(&self) -> bool {
        matches!(
            self,
            Command::Pass { .. }
                | Command::Nick { .. }
                | Command::User { .. }
                | Command::Cap { .. }
                | Command::Quit { .. }
                | Command::Ping { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        Command::parse(&Message::parse(line).expect("message should tokenize"))
    }

    #[test]
    fn pass_requires_a_parameter() {
        assert_eq!(
            parse("PASS"),
            Err(CommandError::NeedMoreParams {
                verb: "PASS".to_string()
            })
        );
        assert_eq!(
            parse("PASS secret"),
            Ok(Command::Pass {
                password: "secret".to_string()
            })
        );
    }

    #[test]
    fn user_takes_first_and_fourth_params() {
        assert_eq!(
            parse("USER guest 0 * :Ronnie Reagan"),
            Ok(Command::User {
                username: "guest".to_string(),
                realname: "Ronnie Reagan".to_string()
            })
        );
        assert!(matches!(
            parse("USER guest 0 *"),
            Err(CommandError::NeedMoreParams { .. })
        ));
    }

    #[test]
    fn join_splits_targets_and_keys() {
        assert_eq!(
            parse("JOIN #a,#b key1,key2"),
            Ok(Command::Join {
                targets: vec!["#a".to_string(), "#b".to_string()],
                keys: vec!["key1".to_string(), "key2".to_string()],
            })
        );
    }

    #[test]
    fn privmsg_error_ladder() {
        assert!(matches!(
            parse("PRIVMSG"),
            Err(CommandError::NoRecipient { .. })
        ));
        assert_eq!(parse("PRIVMSG bob"), Err(CommandError::NoTextToSend));
        assert_eq!(
            parse("PRIVMSG bob,#x :hi there"),
            Ok(Command::Privmsg {
                targets: vec!["bob".to_string(), "#x".to_string()],
                text: "hi there".to_string()
            })
        );
    }

    #[test]
    fn notice_is_lenient() {
        assert_eq!(
            parse("NOTICE"),
            Ok(Command::Notice {
                targets: vec![],
                text: String::new()
            })
        );
    }

    #[test]
    fn ping_without_origin() {
        assert_eq!(parse("PING"), Err(CommandError::NoOrigin));
        assert_eq!(
            parse("PING :irc.example.net"),
            Ok(Command::Ping {
                token: "irc.example.net".to_string()
            })
        );
    }

    #[test]
    fn mode_collects_trailing_params() {
        assert_eq!(
            parse("MODE #x +kl secret 10"),
            Ok(Command::Mode {
                target: "#x".to_string(),
                modestring: Some("+kl".to_string()),
                params: vec!["secret".to_string(), "10".to_string()],
            })
        );
    }

    #[test]
    fn unknown_verbs_are_reported() {
        assert_eq!(
            parse("FROBNICATE a b"),
            Err(CommandError::UnknownCommand {
                verb: "FROBNICATE".to_string()
            })
        );
    }

    #[test]
    fn gate_admits_only_the_handshake_commands() {
        assert!(parse("PASS x").unwrap().allowed_before_registration());
        assert!(parse("NICK a").unwrap().allowed_before_registration());
        assert!(parse("CAP LS").unwrap().allowed_before_registration());
        assert!(parse("QUIT").unwrap().allowed_before_registration());
        assert!(!parse("JOIN #x").unwrap().allowed_before_registration());
        assert!(!parse("PRIVMSG a :b").unwrap().allowed_before_registration());
        assert!(!parse("LIST").unwrap().allowed_before_registration());
    }
}
