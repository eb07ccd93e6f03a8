use log::info;

use super::{nick_or_star, send_reply};
use crate::parsers::{is_reserved_nickname, is_valid_nickname};
use crate::replies::{IrcReply, relay_nick};
use crate::state::ServerState;
use crate::users::UserId;

// 3.1 Connection Registration
//
//    The commands described here are used to register a connection with an
//    IRC server as a user as well as to correctly disconnect.
//
//    The recommended order for a client to register is as follows:
//        1. Pass message
//        2. Nick message
//        3. User message

pub fn handle_pass(state: &mut ServerState, user_id: UserId, password: &str) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick_or_star().to_string();
    if user.registered {
        send_reply(state, user_id, IrcReply::ErrAlreadyRegistered { nick: &nick });
        return;
    }

    if password == state.password {
        if let Some(user) = state.user_mut(user_id) {
            user.password_accepted = true;
        }
        try_register(state, user_id);
    } else {
        send_reply(state, user_id, IrcReply::ErrPasswdMismatch { nick: &nick });
    }
}

pub fn handle_nick(state: &mut ServerState, user_id: UserId, nick: &str) {
    let current = nick_or_star(state, user_id);

    if !is_valid_nickname(nick) || is_reserved_nickname(nick) {
        send_reply(
            state,
            user_id,
            IrcReply::ErrErroneusNickname {
                nick: &current,
                attempted: nick,
            },
        );
        return;
    }

    if let Some(owner) = state.user_by_nick(nick) {
        if owner != user_id {
            send_reply(
                state,
                user_id,
                IrcReply::ErrNicknameInUse {
                    nick: &current,
                    attempted: nick,
                },
            );
            return;
        }
    }

    let Some(user) = state.user(user_id) else {
        return;
    };
    let was_registered = user.registered;
    let old_prefix = user.prefix();

    state.set_nick(user_id, nick);

    if was_registered {
        // everyone sharing a channel learns the new name, and so does the
        // user itself
        let line = relay_nick(&old_prefix, nick);
        for peer in state.peers_of(user_id) {
            state.send_line(peer, line.clone());
        }
        state.send_line(user_id, line);
    } else {
        try_register(state, user_id);
    }
}

pub fn handle_user(state: &mut ServerState, user_id: UserId, username: String, realname: String) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    if user.registered {
        let nick = user.nick_or_star().to_string();
        send_reply(state, user_id, IrcReply::ErrAlreadyRegistered { nick: &nick });
        return;
    }

    if let Some(user) = state.user_mut(user_id) {
        user.username = username;
        user.realname = realname;
    }
    try_register(state, user_id);
}

// Capability negotiation is acknowledged with an empty list and otherwise
// inert; clients fall through to the PASS/NICK/USER handshake.
pub fn handle_cap(state: &mut ServerState, user_id: UserId) {
    send_reply(state, user_id, IrcReply::CapLs);
}

pub fn handle_quit(state: &mut ServerState, user_id: UserId, reason: Option<&str>) {
    state.remove_user(user_id, reason.unwrap_or("Client quit"));
}

/// Flips the connection to registered once the password (when one is
/// configured), nickname and username are all in place, then sends the
/// welcome burst and the MOTD.
pub(crate) fn try_register(state: &mut ServerState, user_id: UserId) {
    let ready = match state.user(user_id) {
        Some(user) => {
            !user.registered
                && !user.nick.is_empty()
                && !user.username.is_empty()
                && (state.password.is_empty() || user.password_accepted)
        }
        None => return,
    };
    if !ready {
        return;
    }

    if let Some(user) = state.user_mut(user_id) {
        user.registered = true;
    }
    send_welcome(state, user_id);
}

fn send_welcome(state: &ServerState, user_id: UserId) {
    let Some(user) = state.user(user_id) else {
        return;
    };
    let nick = user.nick.clone();
    let prefix = user.prefix();
    let version = state.version().to_string();

    send_reply(
        state,
        user_id,
        IrcReply::Welcome {
            nick: &nick,
            prefix: &prefix,
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::YourHost {
            nick: &nick,
            version: &version,
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::Created {
            nick: &nick,
            date: &state.created,
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::MyInfo {
            nick: &nick,
            version: &version,
        },
    );
    send_motd(state, user_id);
    info!("user {nick} registered");
}

pub fn send_motd(state: &ServerState, user_id: UserId) {
    let nick = nick_or_star(state, user_id);
    let motd = state.config.server.motd.clone();

    if motd.is_empty() {
        send_reply(state, user_id, IrcReply::ErrNoMotd { nick: &nick });
        return;
    }

    send_reply(state, user_id, IrcReply::MotdStart { nick: &nick });
    for line in motd.lines() {
        send_reply(state, user_id, IrcReply::Motd { nick: &nick, line });
    }
    send_reply(state, user_id, IrcReply::EndOfMotd { nick: &nick });
}

#[cfg(test)]
mod tests {
    use super::super::harness::*;

    #[test]
    fn wrong_password_rejected_connection_stays_open() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        send(&mut state, &client, "PASS wrong");
        send(&mut state, &client, "NICK alice");
        send(&mut state, &client, "USER a 0 * :A");

        let lines = client.lines();
        assert!(
            lines.contains(&":ircd.local 464 * :Password incorrect".to_string()),
            "got: {lines:?}"
        );
        // no welcome burst, but the user record is still there
        assert!(!lines.iter().any(|l| l.contains(" 001 ")));
        let user = state.user(client.id).unwrap();
        assert!(!user.registered);
    }

    #[test]
    fn welcome_burst_in_numeric_order() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        send(&mut state, &client, "PASS secret");
        send(&mut state, &client, "NICK alice");
        send(&mut state, &client, "USER a 0 * :Alice");

        let codes = client.codes();
        assert!(codes.len() >= 7, "got: {codes:?}");
        assert_eq!(&codes[..5], &[1, 2, 3, 4, 375]);
        assert!(codes[5..codes.len() - 1].iter().all(|&c| c == 372));
        assert_eq!(*codes.last().unwrap(), 376);
        assert!(state.user(client.id).unwrap().registered);
    }

    #[test]
    fn registration_without_server_password() {
        let mut state = test_state("");
        let mut client = connect(&mut state);
        send(&mut state, &client, "NICK alice");
        send(&mut state, &client, "USER a 0 * :Alice");
        assert_eq!(client.codes()[0], 1);
    }

    #[test]
    fn pass_and_user_after_registration_get_462() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        register(&mut state, &mut client, "alice");

        send(&mut state, &client, "PASS secret");
        send(&mut state, &client, "USER a 0 * :Alice");
        assert_eq!(client.codes(), vec![462, 462]);
    }

    #[test]
    fn reserved_nickname_rejected_with_432() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        send(&mut state, &client, "PASS secret");
        send(&mut state, &client, "NICK root");
        assert_eq!(
            client.lines(),
            vec![":ircd.local 432 * root :Erroneous nickname"]
        );
    }

    #[test]
    fn nick_collision_is_case_insensitive() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        register(&mut state, &mut alice, "alice");

        let mut imposter = connect(&mut state);
        send(&mut state, &imposter, "PASS secret");
        send(&mut state, &imposter, "NICK ALICE");
        assert_eq!(
            imposter.lines(),
            vec![":ircd.local 433 * ALICE :Nickname is already in use"]
        );
    }

    #[test]
    fn nick_change_is_broadcast_to_channel_peers() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        let mut bob = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        register(&mut state, &mut bob, "bob");
        send(&mut state, &alice, "JOIN #x");
        send(&mut state, &bob, "JOIN #x");
        alice.lines();
        bob.lines();

        send(&mut state, &alice, "NICK alicia");
        let expected = ":alice!a@127.0.0.1 NICK :alicia".to_string();
        assert_eq!(alice.lines(), vec![expected.clone()]);
        assert_eq!(bob.lines(), vec![expected]);
        assert_eq!(state.user_by_nick("alicia"), Some(alice.id));
        assert_eq!(state.user_by_nick("alice"), None);
    }

    #[test]
    fn nick_round_trip_restores_lookup() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        send(&mut state, &alice, "NICK bruce");
        send(&mut state, &alice, "NICK alice");
        assert_eq!(state.user_by_nick("alice"), Some(alice.id));
        assert_eq!(state.nicks.len(), 1);
    }

    #[test]
    fn cap_ls_is_acknowledged_and_inert() {
        let mut state = test_state("secret");
        let mut client = connect(&mut state);
        send(&mut state, &client, "CAP LS 302");
        assert_eq!(client.lines(), vec![":ircd.local CAP * LS :"]);
        assert!(!state.user(client.id).unwrap().registered);
    }
}
