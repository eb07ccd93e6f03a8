use super::{nick_or_star, send_reply};
use crate::replies::IrcReply;
use crate::state::ServerState;
use crate::users::UserId;

// 3.7.2 Ping message
//
//    When a PING message is received, the appropriate PONG message MUST be
//    sent as reply to <server1> as soon as possible.

pub fn handle_ping(state: &ServerState, user_id: UserId, token: &str) {
    send_reply(state, user_id, IrcReply::Pong { token });
}

// 4.5 Who query / 3.6.2 Whois query. The server tracks no hop counts and
// no away state, so every user shows up as "H" at distance 0.

pub fn handle_who(state: &ServerState, user_id: UserId, mask: Option<&str>) {
    let nick = nick_or_star(state, user_id);
    let mask = mask.unwrap_or("*");

    if let Some(channel) = state.channels.get(mask) {
        let mut member_ids: Vec<UserId> = channel.members.iter().copied().collect();
        member_ids.sort_unstable();
        for member_id in member_ids {
            let Some(member) = state.user(member_id) else {
                continue;
            };
            let flags = if channel.is_operator(member_id) {
                "H@"
            } else {
                "H"
            };
            send_reply(
                state,
                user_id,
                IrcReply::WhoReply {
                    nick: &nick,
                    channel: mask,
                    username: &member.username,
                    host: &member.hostname,
                    target: &member.nick,
                    flags,
                    realname: &member.realname,
                },
            );
        }
    }
    send_reply(state, user_id, IrcReply::EndOfWho { nick: &nick, mask });
}

pub fn handle_whois(state: &ServerState, user_id: UserId, target: &str) {
    let nick = nick_or_star(state, user_id);

    let Some(target_id) = state.user_by_nick(target) else {
        send_reply(
            state,
            user_id,
            IrcReply::ErrNoSuchNick {
                nick: &nick,
                target,
            },
        );
        send_reply(
            state,
            user_id,
            IrcReply::EndOfWhois {
                nick: &nick,
                target,
            },
        );
        return;
    };
    let Some(found) = state.user(target_id) else {
        return;
    };

    send_reply(
        state,
        user_id,
        IrcReply::WhoisUser {
            nick: &nick,
            target: &found.nick,
            username: &found.username,
            host: &found.hostname,
            realname: &found.realname,
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::WhoisServer {
            nick: &nick,
            target: &found.nick,
            info: state.version(),
        },
    );

    let mut channel_names: Vec<&String> = found.channels.iter().collect();
    channel_names.sort_unstable();
    let mut joined = String::new();
    for name in channel_names {
        if !joined.is_empty() {
            joined.push(' ');
        }
        if state
            .channels
            .get(name.as_str())
            .is_some_and(|c| c.is_operator(target_id))
        {
            joined.push('@');
        }
        joined.push_str(name);
    }
    if !joined.is_empty() {
        send_reply(
            state,
            user_id,
            IrcReply::WhoisChannels {
                nick: &nick,
                target: &found.nick,
                channels: &joined,
            },
        );
    }

    send_reply(
        state,
        user_id,
        IrcReply::WhoisIdle {
            nick: &nick,
            target: &found.nick,
            idle: found.idle_seconds(),
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::EndOfWhois {
            nick: &nick,
            target: &found.nick,
        },
    );
}

// Static server information verbs.

pub fn handle_version(state: &ServerState, user_id: UserId) {
    let nick = nick_or_star(state, user_id);
    send_reply(
        state,
        user_id,
        IrcReply::Version {
            nick: &nick,
            version: state.version(),
        },
    );
}

pub fn handle_time(state: &ServerState, user_id: UserId) {
    let nick = nick_or_star(state, user_id);
    let time = chrono::Local::now()
        .format("%A %B %e %Y -- %H:%M %Z")
        .to_string();
    send_reply(state, user_id, IrcReply::Time { nick: &nick, time: &time });
}

pub fn handle_info(state: &ServerState, user_id: UserId) {
    let nick = nick_or_star(state, user_id);
    let first = format!("{} ({})", state.server_name(), state.version());
    send_reply(
        state,
        user_id,
        IrcReply::Info {
            nick: &nick,
            line: &first,
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::Info {
            nick: &nick,
            line: "A single-writer IRC daemon written in Rust",
        },
    );
    send_reply(state, user_id, IrcReply::EndOfInfo { nick: &nick });
}

pub fn handle_admin(state: &ServerState, user_id: UserId) {
    let nick = nick_or_star(state, user_id);
    send_reply(state, user_id, IrcReply::AdminMe { nick: &nick });
    send_reply(
        state,
        user_id,
        IrcReply::AdminLoc1 {
            nick: &nick,
            line: state.server_name(),
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::AdminLoc2 {
            nick: &nick,
            line: "Contact the server operator",
        },
    );
    send_reply(
        state,
        user_id,
        IrcReply::AdminEmail {
            nick: &nick,
            email: &state.config.server.admin_email,
        },
    );
}

pub fn handle_stats(state: &ServerState, user_id: UserId) {
    let nick = nick_or_star(state, user_id);
    let uptime = format_uptime(state.started.elapsed().as_secs());
    send_reply(
        state,
        user_id,
        IrcReply::StatsUptime {
            nick: &nick,
            uptime: &uptime,
        },
    );
    send_reply(state, user_id, IrcReply::EndOfStats { nick: &nick });
}

fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("Server Up {days} days {hours}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use super::format_uptime;

    #[test]
    fn pong_reply() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        send(&mut state, &alice, "PING :token123");
        assert_eq!(
            alice.lines(),
            vec![":ircd.local PONG ircd.local :token123"]
        );
    }

    #[test]
    fn ping_without_origin_gets_409() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        send(&mut state, &alice, "PING");
        assert_eq!(
            alice.lines(),
            vec![":ircd.local 409 alice :No origin specified"]
        );
    }

    #[test]
    fn who_lists_channel_members_with_op_flag() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        let mut bob = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        register(&mut state, &mut bob, "bob");
        send(&mut state, &alice, "JOIN #x");
        send(&mut state, &bob, "JOIN #x");
        alice.lines();
        bob.lines();

        send(&mut state, &bob, "WHO #x");
        let lines = bob.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            ":ircd.local 352 bob #x a 127.0.0.1 ircd.local alice H@ :0 alice realname"
        );
        assert_eq!(
            lines[1],
            ":ircd.local 352 bob #x b 127.0.0.1 ircd.local bob H :0 bob realname"
        );
        assert_eq!(lines[2], ":ircd.local 315 bob #x :End of /WHO list");
    }

    #[test]
    fn who_with_unknown_mask_just_ends() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        send(&mut state, &alice, "WHO #nowhere");
        assert_eq!(
            alice.lines(),
            vec![":ircd.local 315 alice #nowhere :End of /WHO list"]
        );
    }

    #[test]
    fn whois_reports_identity_channels_and_idle() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        let mut bob = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        register(&mut state, &mut bob, "bob");
        send(&mut state, &bob, "JOIN #x");
        bob.lines();

        send(&mut state, &alice, "WHOIS bob");
        let lines = alice.lines();
        assert_eq!(
            lines[0],
            ":ircd.local 311 alice bob b 127.0.0.1 * :bob realname"
        );
        assert!(lines[1].starts_with(":ircd.local 312 alice bob ircd.local :"));
        assert_eq!(lines[2], ":ircd.local 319 alice bob :@#x");
        assert!(lines[3].starts_with(":ircd.local 317 alice bob 0 :seconds idle"));
        assert_eq!(lines[4], ":ircd.local 318 alice bob :End of /WHOIS list");
    }

    #[test]
    fn whois_unknown_nick() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        register(&mut state, &mut alice, "alice");
        send(&mut state, &alice, "WHOIS ghost");
        let codes = alice.codes();
        assert_eq!(codes, vec![401, 318]);
    }

    #[test]
    fn server_info_verbs_emit_static_replies() {
        let mut state = test_state("secret");
        let mut alice = connect(&mut state);
        register(&mut state, &mut alice, "alice");

        send(&mut state, &alice, "VERSION");
        assert_eq!(alice.codes(), vec![351]);
        send(&mut state, &alice, "TIME");
        assert_eq!(alice.codes(), vec![391]);
        send(&mut state, &alice, "INFO");
        assert_eq!(alice.codes(), vec![371, 371, 374]);
        send(&mut state, &alice, "ADMIN");
        assert_eq!(alice.codes(), vec![256, 257, 258, 259]);
        send(&mut state, &alice, "STATS");
        assert_eq!(alice.codes(), vec![242, 219]);
        send(&mut state, &alice, "MOTD");
        let codes = alice.codes();
        assert_eq!(codes.first(), Some(&375));
        assert_eq!(codes.last(), Some(&376));
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(0), "Server Up 0 days 0:00:00");
        assert_eq!(format_uptime(90_061), "Server Up 1 days 1:01:01");
    }
}
