use super::{nick_or_star, send_reply};
use crate::channels::JoinRejection;
use crate::parsers::{is_valid_channel_name, is_valid_key};
use crate::replies::{
    IrcReply, relay_invite, relay_join, relay_kick, relay_mode, relay_part, relay_topic,
};
use crate::state::ServerState;
use crate::users::UserId;

// 3.2 Channel operations
//
//    This group of messages is concerned with manipulating channels, their
//    properties (channel modes), and their contents (typically users).

pub fn handle_join(state: &mut ServerState, user_id: UserId, targets: &[String], keys: &[String]) {
    for (index, target) in targets.iter().enumerate() {
        let name = if target.starts_with('#') || target.starts_with('&') {
            target.clone()
        } else {
            format!("#{target}")
        };
        join_one(state, user_id, &name, keys.get(index).map(String::as_str));
    }
}

fn join_one(state: &mut ServerState, user_id: UserId, name: &str, key: Option<&str>) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();

    if user.channels.contains(name) {
        return; // already there, nothing to say
    }
    if user.channels.len() >= state.config.limits.max_channels_per_user {
        send_reply(
            state,
            user_id,
            IrcReply::ErrTooManyChannels {
                nick: &nick,
                channel: name,
            },
        );
        return;
    }
    if !is_valid_channel_name(name) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: name,
            },
        );
        return;
    }
    if let Some(channel) = state.channels.get(name) {
        if let Err(rejection) = channel.check_join(user_id, key) {
            let reply = match rejection {
                JoinRejection::Banned => IrcReply::ErrBannedFromChan {
                    nick: &nick,
                    channel: name,
                },
                JoinRejection::Full => IrcReply::ErrChannelIsFull {
                    nick: &nick,
                    channel: name,
                },
                JoinRejection::InviteOnly => IrcReply::ErrInviteOnlyChan {
                    nick: &nick,
                    channel: name,
                },
                JoinRejection::BadKey => IrcReply::ErrBadChannelKey {
                    nick: &nick,
                    channel: name,
                },
            };
            send_reply(state, user_id, reply);
            return;
        }
    }

    state.join_channel(user_id, name);

    let Some(user) = state.user(user_id) else {
        return;
    };
    let prefix = user.prefix();
    state.send_to_channel(name, &relay_join(&prefix, name), None);

    match state.channels.get(name) {
        Some(channel) if !channel.topic.is_empty() => {
            let topic = channel.topic.clone();
            send_reply(
                state,
                user_id,
                IrcReply::Topic {
                    nick: &nick,
                    channel: name,
                    topic: &topic,
                },
            );
        }
        _ => send_reply(
            state,
            user_id,
            IrcReply::NoTopic {
                nick: &nick,
                channel: name,
            },
        ),
    }
    send_names(state, user_id, name);
}

fn send_names(state: &ServerState, user_id: UserId, name: &str) {
    let nick = nick_or_star(state, user_id);
    if let Some(channel) = state.channels.get(name) {
        let names = state.names_reply(channel);
        send_reply(
            state,
            user_id,
            IrcReply::NamReply {
                nick: &nick,
                channel: name,
                names: &names,
            },
        );
    }
    send_reply(
        state,
        user_id,
        IrcReply::EndOfNames {
            nick: &nick,
            channel: name,
        },
    );
}

pub fn handle_part(
    state: &mut ServerState,
    user_id: UserId,
    channels: &[String],
    reason: Option<&str>,
) {
    for name in channels {
        let Some(user) = state.user(user_id) else {
            return;
        };
        let nick = user.nick.clone();
        let prefix = user.prefix();

        if !state.channels.contains_key(name) {
            send_reply(
                state,
                user_id,
                IrcReply::ErrNoSuchChannel {
                    nick: &nick,
                    channel: name,
                },
            );
            continue;
        }
        if !user.channels.contains(name) {
            send_reply(
                state,
                user_id,
                IrcReply::ErrNotOnChannel {
                    nick: &nick,
                    channel: name,
                },
            );
            continue;
        }

        let line = relay_part(&prefix, name, reason.unwrap_or(&nick));
        state.send_to_channel(name, &line, None);
        state.part_channel(user_id, name);
    }
}

pub fn handle_kick(
    state: &mut ServerState,
    user_id: UserId,
    channel_name: &str,
    victims: &[String],
    reason: Option<&str>,
) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();
    let prefix = user.prefix();

    let Some(channel) = state.channels.get(channel_name) else {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    };
    if !channel.is_member(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNotOnChannel {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    }
    if !channel.is_operator(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrChanOPrivsNeeded {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    }

    for victim in victims {
        let victim_id = state.user_by_nick(victim);
        let is_member = victim_id
            .and_then(|id| state.channels.get(channel_name).map(|c| c.is_member(id)))
            .unwrap_or(false);
        let Some(victim_id) = victim_id.filter(|_| is_member) else {
            send_reply(
                state,
                user_id,
                IrcReply::ErrUserNotInChannel {
                    nick: &nick,
                    target: victim,
                    channel: channel_name,
                },
            );
            continue;
        };

        let victim_nick = state
            .user(victim_id)
            .map(|u| u.nick.clone())
            .unwrap_or_default();
        let line = relay_kick(
            &prefix,
            channel_name,
            &victim_nick,
            reason.unwrap_or(&nick),
        );
        state.send_to_channel(channel_name, &line, None);
        state.part_channel(victim_id, channel_name);
    }
}

pub fn handle_invite(state: &mut ServerState, user_id: UserId, target: &str, channel_name: &str) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();
    let prefix = user.prefix();

    let Some(channel) = state.channels.get(channel_name) else {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    };
    if !channel.is_member(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNotOnChannel {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    }
    if channel.modes.invite_only && !channel.is_operator(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrChanOPrivsNeeded {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    }
    let Some(target_id) = state.user_by_nick(target) else {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNoSuchNick {
                nick: &nick,
                target,
            },
        );
        return;
    };
    if channel.is_member(target_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrUserOnChannel {
                nick: &nick,
                target,
                channel: channel_name,
            },
        );
        return;
    }

    let target_nick = state
        .user(target_id)
        .map(|u| u.nick.clone())
        .unwrap_or_default();
    if let Some(channel) = state.channels.get_mut(channel_name) {
        channel.invited.insert(target_id);
    }
    send_reply(
        state,
        user_id,
        IrcReply::Inviting {
            nick: &nick,
            target: &target_nick,
            channel: channel_name,
        },
    );
    state.send_line(target_id, relay_invite(&prefix, &target_nick, channel_name));
}

pub fn handle_topic(
    state: &mut ServerState,
    user_id: UserId,
    channel_name: &str,
    topic: Option<&str>,
) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();
    let prefix = user.prefix();

    let Some(channel) = state.channels.get(channel_name) else {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    };
    if !channel.is_member(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNotOnChannel {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    }

    let Some(new_topic) = topic else {
        // read
        if channel.topic.is_empty() {
            send_reply(
                state,
                user_id,
                IrcReply::NoTopic {
                    nick: &nick,
                    channel: channel_name,
                },
            );
        } else {
            let topic = channel.topic.clone();
            send_reply(
                state,
                user_id,
                IrcReply::Topic {
                    nick: &nick,
                    channel: channel_name,
                    topic: &topic,
                },
            );
        }
        return;
    };

    if channel.modes.topic_restricted && !channel.is_operator(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrChanOPrivsNeeded {
                nick: &nick,
                channel: channel_name,
            },
        );
        return;
    }

    let stored = if let Some(channel) = state.channels.get_mut(channel_name) {
        channel.set_topic(new_topic, prefix.clone());
        channel.topic.clone()
    } else {
        return;
    };
    state.send_to_channel(channel_name, &relay_topic(&prefix, channel_name, &stored), None);
}

struct AppliedMode {
    sign: char,
    letter: char,
    param: Option<String>,
}

pub fn handle_mode(
    state: &mut ServerState,
    user_id: UserId,
    target: &str,
    modestring: Option<&str>,
    params: &[String],
) {
    if !(target.starts_with('#') || target.starts_with('&')) {
        handle_user_mode(state, user_id, target);
        return;
    }

    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();
    let prefix = user.prefix();

    let Some(channel) = state.channels.get(target) else {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNoSuchChannel {
                nick: &nick,
                channel: target,
            },
        );
        return;
    };
    if !channel.is_member(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNotOnChannel {
                nick: &nick,
                channel: target,
            },
        );
        return;
    }

    let Some(modestring) = modestring else {
        let modes = channel.mode_string();
        send_reply(
            state,
            user_id,
            IrcReply::ChannelModeIs {
                nick: &nick,
                channel: target,
                modes: &modes,
            },
        );
        return;
    };

    if !channel.is_operator(user_id) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrChanOPrivsNeeded {
                nick: &nick,
                channel: target,
            },
        );
        return;
    }

    let applied = apply_channel_modes(state, target, modestring, params, &nick, user_id);
    if !applied.is_empty() {
        let changes = render_mode_changes(&applied);
        state.send_to_channel(target, &relay_mode(&prefix, target, &changes), None);
    }
}

/// Walks the mode string left to right against a running sign, mutating the
/// channel as letters take effect. Returns the changes that actually
/// happened, parameters included, in application order.
fn apply_channel_modes(
    state: &mut ServerState,
    channel_name: &str,
    modestring: &str,
    params: &[String],
    nick: &str,
    user_id: UserId,
) -> Vec<AppliedMode> {
    let mut applied = Vec::new();
    let mut sign = '+';
    let mut param_index = 0;

    for letter in modestring.chars() {
        match letter {
            '+' | '-' => sign = letter,
            'i' | 't' | 'm' | 'n' | 's' | 'p' => {
                let enable = sign == '+';
                if let Some(channel) = state.channels.get_mut(channel_name) {
                    let flag = match letter {
                        'i' => &mut channel.modes.invite_only,
                        't' => &mut channel.modes.topic_restricted,
                        'm' => &mut channel.modes.moderated,
                        'n' => &mut channel.modes.no_external,
                        's' => &mut channel.modes.secret,
                        _ => &mut channel.modes.private,
                    };
                    if *flag != enable {
                        *flag = enable;
                        applied.push(AppliedMode {
                            sign,
                            letter,
                            param: None,
                        });
                    }
                }
            }
            'k' => {
                if sign == '+' {
                    let Some(key) = params.get(param_index) else {
                        continue;
                    };
                    param_index += 1;
                    if !is_valid_key(key) {
                        continue;
                    }
                    if let Some(channel) = state.channels.get_mut(channel_name) {
                        channel.set_key(key);
                        applied.push(AppliedMode {
                            sign,
                            letter,
                            param: channel.modes.key.clone(),
                        });
                    }
                } else if let Some(channel) = state.channels.get_mut(channel_name) {
                    if channel.modes.key.take().is_some() {
                        applied.push(AppliedMode {
                            sign,
                            letter,
                            param: None,
                        });
                    }
                }
            }
            'l' => {
                if sign == '+' {
                    let Some(raw) = params.get(param_index) else {
                        continue;
                    };
                    param_index += 1;
                    let Ok(limit) = raw.parse::<usize>() else {
                        continue;
                    };
                    if limit == 0 {
                        continue;
                    }
                    if let Some(channel) = state.channels.get_mut(channel_name) {
                        channel.set_user_limit(limit);
                        applied.push(AppliedMode {
                            sign,
                            letter,
                            param: Some(channel.modes.user_limit.to_string()),
                        });
                    }
                } else if let Some(channel) = state.channels.get_mut(channel_name) {
                    if channel.modes.user_limit > 0 {
                        channel.modes.user_limit = 0;
                        applied.push(AppliedMode {
                            sign,
                            letter,
                            param: None,
                        });
                    }
                }
            }
            'o' => {
                let Some(target_nick) = params.get(param_index) else {
                    continue;
                };
                param_index += 1;
                let Some(target_id) = state.user_by_nick(target_nick) else {
                    continue; // silently ignored
                };
                let stored_nick = state
                    .user(target_id)
                    .map(|u| u.nick.clone())
                    .unwrap_or_default();
                if let Some(channel) = state.channels.get_mut(channel_name) {
                    if !channel.is_member(target_id) {
                        continue;
                    }
                    let changed = if sign == '+' {
                        channel.operators.insert(target_id)
                    } else {
                        // never strip the last operator
                        channel.operators.len() > 1 && channel.operators.remove(&target_id)
                    };
                    if changed {
                        applied.push(AppliedMode {
                            sign,
                            letter,
                            param: Some(stored_nick),
                        });
                    }
                }
            }
            unknown => {
                send_reply(
                    state,
                    user_id,
                    IrcReply::ErrUnknownMode {
                        nick,
                        mode: unknown,
                    },
                );
            }
        }
    }
    applied
}

fn render_mode_changes(applied: &[AppliedMode]) -> String {
    let mut word = String::new();
    let mut args = Vec::new();
    let mut current_sign = '\0';
    for change in applied {
        if change.sign != current_sign {
            word.push(change.sign);
            current_sign = change.sign;
        }
        word.push(change.letter);
        if let Some(param) = &change.param {
            args.push(param.clone());
        }
    }
    for arg in args {
        word.push(' ');
        word.push_str(&arg);
    }
    word
}

// User modes are accepted for compatibility but the server stores none of
// them; only the 502 guard is real.
fn handle_user_mode(state: &ServerState, user_id: UserId, target: &str) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();
    if crate::parsers::casefold(target) != crate::parsers::casefold(&nick) {
        send_reply(state, user_id, IrcReply::ErrUsersDontMatch { nick: &nick });
    }
}

pub fn handle_names(state: &ServerState, user_id: UserId, channels: Option<&[String]>) {
    match channels {
        Some(names) => {
            for name in names {
                send_names(state, user_id, name);
            }
        }
        None => {
            let nick = nick_or_star(state, user_id);
            let mut names: Vec<&String> = state.channels.keys().collect();
            names.sort_unstable();
            for name in names {
                let Some(channel) = state.channels.get(name.as_str()) else {
                    continue;
                };
                if !channel.visible_to(user_id) {
                    continue;
                }
                let members = state.names_reply(channel);
                send_reply(
                    state,
                    user_id,
                    IrcReply::NamReply {
                        nick: &nick,
                        channel: name.as_str(),
                        names: &members,
                    },
                );
            }
            send_reply(
                state,
                user_id,
                IrcReply::EndOfNames {
                    nick: &nick,
                    channel: "*",
                },
            );
        }
    }
}

pub fn handle_list(state: &ServerState, user_id: UserId, channels: Option<&[String]>) {
    let nick = nick_or_star(state, user_id);
    send_reply(state, user_id, IrcReply::ListStart { nick: &nick });

    let mut names: Vec<String> = match channels {
        Some(requested) => requested.to_vec(),
        None => {
            let mut all: Vec<String> = state.channels.keys().cloned().collect();
            all.sort_unstable();
            all
        }
    };
    names.dedup();

    for name in names {
        let Some(channel) = state.channels.get(&name) else {
            continue;
        };
        if !channel.visible_to(user_id) {
            continue;
        }
        let topic = if channel.topic.is_empty() {
            "No topic set"
        } else {
            channel.topic.as_str()
        };
        send_reply(
            state,
            user_id,
            IrcReply::List {
                nick: &nick,
                channel: name.as_str(),
                visible: channel.members.len(),
                topic,
            },
        );
    }
    send_reply(state, user_id, IrcReply::ListEnd { nick: &nick });
}
