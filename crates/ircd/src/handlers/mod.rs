pub mod channels;
pub mod messages;
pub mod queries;
pub mod registration;

use log::info;

use crate::commands::{Command, CommandError};
use crate::message::Message;
use crate::replies::IrcReply;
use crate::state::ServerState;
use crate::users::UserId;

/// One inbound line, end to end: tokenize, extract the command, apply the
/// registration gate, run the handler. Every failure becomes a numeric
/// reply on the offending connection; nothing escapes to the broker.
pub fn dispatch(state: &mut ServerState, user_id: UserId, line: &str) {
    if state.user(user_id).is_none() {
        return;
    }
    info!(">> [{user_id}] {line}");
    state.touch(user_id);

    let Some(message) = Message::parse(line) else {
        return;
    };
    let command = match Command::parse(&message) {
        Ok(command) => command,
        Err(error) => {
            send_command_error(state, user_id, &error);
            return;
        }
    };

    let registered = state
        .user(user_id)
        .map(|user| user.registered)
        .unwrap_or(false);
    if !registered && !command.allowed_before_registration() {
        let nick = nick_or_star(state, user_id);
        send_reply(state, user_id, IrcReply::ErrNotRegistered { nick: &nick });
        return;
    }

    match command {
        Command::Pass { password } => registration::handle_pass(state, user_id, &password),
        Command::Nick { nick } => registration::handle_nick(state, user_id, &nick),
        Command::User { username, realname } => {
            registration::handle_user(state, user_id, username, realname)
        }
        Command::Cap { .. } => registration::handle_cap(state, user_id),
        Command::Quit { reason } => registration::handle_quit(state, user_id, reason.as_deref()),
        Command::Ping { token } => queries::handle_ping(state, user_id, &token),
        Command::Pong => {}
        Command::Join { targets, keys } => channels::handle_join(state, user_id, &targets, &keys),
        Command::Part { channels, reason } => {
            channels::handle_part(state, user_id, &channels, reason.as_deref())
        }
        Command::Privmsg { targets, text } => {
            messages::handle_privmsg(state, user_id, &targets, &text)
        }
        Command::Notice { targets, text } => {
            messages::handle_notice(state, user_id, &targets, &text)
        }
        Command::Kick {
            channel,
            victims,
            reason,
        } => channels::handle_kick(state, user_id, &channel, &victims, reason.as_deref()),
        Command::Invite { nick, channel } => {
            channels::handle_invite(state, user_id, &nick, &channel)
        }
        Command::Topic { channel, topic } => {
            channels::handle_topic(state, user_id, &channel, topic.as_deref())
        }
        Command::Mode {
            target,
            modestring,
            params,
        } => channels::handle_mode(state, user_id, &target, modestring.as_deref(), &params),
        Command::Who { mask } => queries::handle_who(state, user_id, mask.as_deref()),
        Command::Whois { nick } => queries::handle_whois(state, user_id, &nick),
        Command::Names { channels: names } => {
            channels::handle_names(state, user_id, names.as_deref())
        }
        Command::List { channels: names } => channels::handle_list(state, user_id, names.as_deref()),
        Command::Motd => registration::send_motd(state, user_id),
        Command::Version => queries::handle_version(state, user_id),
        Command::Time => queries::handle_time(state, user_id),
        Command::Info => queries::handle_info(state, user_id),
        Command::Admin => queries::handle_admin(state, user_id),
        Command::Stats => queries::handle_stats(state, user_id),
    }
}

fn send_command_error(state: &ServerState, user_id: UserId, error: &CommandError) {
    let nick = nick_or_star(state, user_id);
    let reply = match error {
        CommandError::NeedMoreParams { verb } => IrcReply::ErrNeedMoreParams {
            nick: &nick,
            command: verb,
        },
        CommandError::NoNicknameGiven => IrcReply::ErrNoNicknameGiven { nick: &nick },
        CommandError::NoRecipient { verb } => IrcReply::ErrNoRecipient {
            nick: &nick,
            command: verb,
        },
        CommandError::NoTextToSend => IrcReply::ErrNoTextToSend { nick: &nick },
        CommandError::NoOrigin => IrcReply::ErrNoOrigin { nick: &nick },
        CommandError::UnknownCommand { verb } => IrcReply::ErrUnknownCommand {
            nick: &nick,
            command: verb,
        },
    };
    send_reply(state, user_id, reply);
}

pub(crate) fn send_reply(state: &ServerState, user_id: UserId, reply: IrcReply<'_>) {
    let line = reply.format(state.server_name());
    state.send_line(user_id, line);
}

pub(crate) fn nick_or_star(state: &ServerState, user_id: UserId) -> String {
    state
        .user(user_id)
        .map(|user| user.nick_or_star().to_string())
        .unwrap_or_else(|| "*".to_string())
}

/// Shared fixtures for handler tests: a registry plus in-memory clients
/// whose outbound queues can be drained synchronously.
#[cfg(test)]
pub(crate) mod harness {
    use super::dispatch;
    use crate::config::Config;
    use crate::state::ServerState;
    use crate::users::UserId;
    use crate::wire::OutboundLine;
    use tokio::sync::mpsc::{self, Receiver};

    pub struct TestClient {
        pub id: UserId,
        pub rx: Receiver<OutboundLine>,
    }

    impl TestClient {
        /// Drains everything queued for this client, CRLF stripped.
        pub fn lines(&mut self) -> Vec<String> {
            let mut lines = Vec::new();
            while let Ok(line) = self.rx.try_recv() {
                lines.push(line.raw.trim_end().to_string());
            }
            lines
        }

        /// Numeric codes of the drained lines, for order assertions.
        pub fn codes(&mut self) -> Vec<u16> {
            self.lines()
                .iter()
                .filter_map(|line| {
                    line.split(' ').nth(1).and_then(|code| code.parse().ok())
                })
                .collect()
        }
    }

    pub fn test_state(password: &str) -> ServerState {
        ServerState::new(Config::default(), password.to_string())
    }

    pub fn connect(state: &mut ServerState) -> TestClient {
        let (tx, rx) = mpsc::channel(512);
        let id = state.add_user("127.0.0.1".to_string(), tx);
        TestClient { id, rx }
    }

    pub fn send(state: &mut ServerState, client: &TestClient, line: &str) {
        dispatch(state, client.id, line);
    }

    /// Runs the full PASS/NICK/USER handshake and discards the welcome
    /// burst.
    pub fn register(state: &mut ServerState, client: &mut TestClient, nick: &str) {
        let username: String = nick.chars().take(1).collect();
        let password = state.password.clone();
        send(state, client, &format!("PASS {password}"));
        send(state, client, &format!("NICK {nick}"));
        send(
            state,
            client,
            &format!("USER {username} 0 * :{nick} realname"),
        );
        client.lines();
    }
}

#[cfg(test)]
mod tests {
    use super::harness::*;

    #[test]
    fn commands_before_registration_get_451() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        send(&mut state, &client, "JOIN #x");
        assert_eq!(
            client.lines(),
            vec![":ircd.local 451 * :You have not registered"]
        );
    }

    #[test]
    fn unknown_command_gets_421() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        register(&mut state, &mut client, "alice");
        send(&mut state, &client, "FLY away");
        assert_eq!(
            client.lines(),
            vec![":ircd.local 421 alice FLY :Unknown command"]
        );
    }

    #[test]
    fn ping_is_allowed_before_registration() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        send(&mut state, &client, "PING token");
        assert_eq!(
            client.lines(),
            vec![":ircd.local PONG ircd.local :token"]
        );
    }

    #[test]
    fn lines_for_gone_users_are_ignored() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        register(&mut state, &mut client, "alice");
        send(&mut state, &client, "QUIT :bye");
        // the reader task may still race a line in after removal
        send(&mut state, &client, "JOIN #x");
        assert!(client.lines().is_empty());
        assert!(state.channels.is_empty());
    }
}
