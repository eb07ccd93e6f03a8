use super::send_reply;
use crate::replies::{IrcReply, relay_message};
use crate::state::ServerState;
use crate::users::UserId;

// 3.3.1 Private messages
//
//       Command: PRIVMSG
//    Parameters: <msgtarget> <text to be sent>
//
//    PRIVMSG is used to send private messages between users, as well as to
//    send messages to channels.
//
// 3.3.2 Notice
//
//    The NOTICE command is used similarly to PRIVMSG. The difference
//    between NOTICE and PRIVMSG is that automatic replies MUST NEVER be
//    sent in response to a NOTICE message.

pub fn handle_privmsg(state: &mut ServerState, user_id: UserId, targets: &[String], text: &str) {
    relay_to_targets(state, user_id, "PRIVMSG", targets, text, true);
}

pub fn handle_notice(state: &mut ServerState, user_id: UserId, targets: &[String], text: &str) {
    relay_to_targets(state, user_id, "NOTICE", targets, text, false);
}

fn relay_to_targets(
    state: &ServerState,
    user_id: UserId,
    verb: &str,
    targets: &[String],
    text: &str,
    report_errors: bool,
) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();
    let prefix = user.prefix();

    for target in targets {
        if target.starts_with('#') || target.starts_with('&') {
            let Some(channel) = state.channels.get(target) else {
                if report_errors {
                    send_reply(
                        state,
                        user_id,
                        IrcReply::ErrNoSuchChannel {
                            nick: &nick,
                            channel: target,
                        },
                    );
                }
                continue;
            };
            let may_speak = channel.is_member(user_id)
                && !channel.is_banned(user_id)
                && (!channel.modes.moderated || channel.is_operator(user_id));
            if !may_speak {
                if report_errors {
                    send_reply(
                        state,
                        user_id,
                        IrcReply::ErrCannotSendToChan {
                            nick: &nick,
                            channel: target,
                        },
                    );
                }
                continue;
            }
            let line = relay_message(&prefix, verb, target, text);
            state.send_to_channel(target, &line, Some(user_id));
        } else {
            match state.user_by_nick(target) {
                Some(target_id) => {
                    state.send_line(target_id, relay_message(&prefix, verb, target, text));
                }
                None => {
                    if report_errors {
                        send_reply(
                            state,
                            user_id,
                            IrcReply::ErrNoSuchNick {
                                nick: &nick,
                                target,
                            },
                        );
                    }
                }
            }
        }
    }
}
