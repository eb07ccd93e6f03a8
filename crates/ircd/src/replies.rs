use crate::constants::*;

// Server-originated numerics are formatted as
//
//     :<servername> <3-digit 0-padded code> <nick|*> <payload>
//
// where `*` stands in for a recipient that has not registered yet. Relayed
// commands instead carry the originating user's prefix and are built by the
// `relay_*` helpers below. CRLF is appended at the socket boundary
// (wire::OutboundLine), never here.

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum IrcReply<'a> {
    // Connection registration
    Welcome {
        nick: &'a str,
        prefix: &'a str,
    },
    YourHost {
        nick: &'a str,
        version: &'a str,
    },
    Created {
        nick: &'a str,
        date: &'a str,
    },
    MyInfo {
        nick: &'a str,
        version: &'a str,
    },
    CapLs,
    Pong {
        token: &'a str,
    },

    // MOTD
    MotdStart {
        nick: &'a str,
    },
    Motd {
        nick: &'a str,
        line: &'a str,
    },
    EndOfMotd {
        nick: &'a str,
    },
    ErrNoMotd {
        nick: &'a str,
    },

    // Channel state
    ChannelModeIs {
        nick: &'a str,
        channel: &'a str,
        modes: &'a str,
    },
    NoTopic {
        nick: &'a str,
        channel: &'a str,
    },
    Topic {
        nick: &'a str,
        channel: &'a str,
        topic: &'a str,
    },
    Inviting {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    NamReply {
        nick: &'a str,
        channel: &'a str,
        names: &'a str,
    },
    EndOfNames {
        nick: &'a str,
        channel: &'a str,
    },
    ListStart {
        nick: &'a str,
    },
    List {
        nick: &'a str,
        channel: &'a str,
        visible: usize,
        topic: &'a str,
    },
    ListEnd {
        nick: &'a str,
    },

    // WHO / WHOIS
    WhoReply {
        nick: &'a str,
        channel: &'a str,
        username: &'a str,
        host: &'a str,
        target: &'a str,
        flags: &'a str,
        realname: &'a str,
    },
    EndOfWho {
        nick: &'a str,
        mask: &'a str,
    },
    WhoisUser {
        nick: &'a str,
        target: &'a str,
        username: &'a str,
        host: &'a str,
        realname: &'a str,
    },
    WhoisServer {
        nick: &'a str,
        target: &'a str,
        info: &'a str,
    },
    WhoisIdle {
        nick: &'a str,
        target: &'a str,
        idle: u64,
    },
    WhoisChannels {
        nick: &'a str,
        target: &'a str,
        channels: &'a str,
    },
    EndOfWhois {
        nick: &'a str,
        target: &'a str,
    },

    // Server info
    Version {
        nick: &'a str,
        version: &'a str,
    },
    Time {
        nick: &'a str,
        time: &'a str,
    },
    Info {
        nick: &'a str,
        line: &'a str,
    },
    EndOfInfo {
        nick: &'a str,
    },
    AdminMe {
        nick: &'a str,
    },
    AdminLoc1 {
        nick: &'a str,
        line: &'a str,
    },
    AdminLoc2 {
        nick: &'a str,
        line: &'a str,
    },
    AdminEmail {
        nick: &'a str,
        email: &'a str,
    },
    StatsUptime {
        nick: &'a str,
        uptime: &'a str,
    },
    EndOfStats {
        nick: &'a str,
    },

    // Errors
    ErrNoSuchNick {
        nick: &'a str,
        target: &'a str,
    },
    ErrNoSuchChannel {
        nick: &'a str,
        channel: &'a str,
    },
    ErrCannotSendToChan {
        nick: &'a str,
        channel: &'a str,
    },
    ErrTooManyChannels {
        nick: &'a str,
        channel: &'a str,
    },
    ErrNoOrigin {
        nick: &'a str,
    },
    ErrNoRecipient {
        nick: &'a str,
        command: &'a str,
    },
    ErrNoTextToSend {
        nick: &'a str,
    },
    ErrUnknownCommand {
        nick: &'a str,
        command: &'a str,
    },
    ErrNoNicknameGiven {
        nick: &'a str,
    },
    ErrErroneusNickname {
        nick: &'a str,
        attempted: &'a str,
    },
    ErrNicknameInUse {
        nick: &'a str,
        attempted: &'a str,
    },
    ErrUserNotInChannel {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    ErrNotOnChannel {
        nick: &'a str,
        channel: &'a str,
    },
    ErrUserOnChannel {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    ErrNotRegistered {
        nick: &'a str,
    },
    ErrNeedMoreParams {
        nick: &'a str,
        command: &'a str,
    },
    ErrAlreadyRegistered {
        nick: &'a str,
    },
    ErrPasswdMismatch {
        nick: &'a str,
    },
    ErrChannelIsFull {
        nick: &'a str,
        channel: &'a str,
    },
    ErrUnknownMode {
        nick: &'a str,
        mode: char,
    },
    ErrInviteOnlyChan {
        nick: &'a str,
        channel: &'a str,
    },
    ErrBannedFromChan {
        nick: &'a str,
        channel: &'a str,
    },
    ErrBadChannelKey {
        nick: &'a str,
        channel: &'a str,
    },
    ErrChanOPrivsNeeded {
        nick: &'a str,
        channel: &'a str,
    },
    ErrUsersDontMatch {
        nick: &'a str,
    },
}

impl<'a> IrcReply<'a> {
    pub fn format(&self, server: &str) -> String {
        match self {
            IrcReply::Welcome { nick, prefix } => format!(
                ":{server} {RPL_WELCOME_NB:03} {nick} :Welcome to the {server} Network {prefix}"
            ),
            IrcReply::YourHost { nick, version } => format!(
                ":{server} {RPL_YOURHOST_NB:03} {nick} :Your host is {server}, running version {version}"
            ),
            IrcReply::Created { nick, date } => format!(
                ":{server} {RPL_CREATED_NB:03} {nick} :This server was created {date}"
            ),
            IrcReply::MyInfo { nick, version } => {
                format!(":{server} {RPL_MYINFO_NB:03} {nick} {server} {version} o itkol")
            }
            IrcReply::CapLs => format!(":{server} CAP * LS :"),
            IrcReply::Pong { token } => format!(":{server} PONG {server} :{token}"),

            IrcReply::MotdStart { nick } => format!(
                ":{server} {RPL_MOTDSTART_NB:03} {nick} :- {server} Message of the day -"
            ),
            IrcReply::Motd { nick, line } => {
                format!(":{server} {RPL_MOTD_NB:03} {nick} :- {line}")
            }
            IrcReply::EndOfMotd { nick } => {
                format!(":{server} {RPL_ENDOFMOTD_NB:03} {nick} :{RPL_ENDOFMOTD_STR}")
            }
            IrcReply::ErrNoMotd { nick } => {
                format!(":{server} {ERR_NOMOTD_NB:03} {nick} :{ERR_NOMOTD_STR}")
            }

            IrcReply::ChannelModeIs {
                nick,
                channel,
                modes,
            } => format!(":{server} {RPL_CHANNELMODEIS_NB:03} {nick} {channel} {modes}"),
            IrcReply::NoTopic { nick, channel } => {
                format!(":{server} {RPL_NOTOPIC_NB:03} {nick} {channel} :{RPL_NOTOPIC_STR}")
            }
            IrcReply::Topic {
                nick,
                channel,
                topic,
            } => format!(":{server} {RPL_TOPIC_NB:03} {nick} {channel} :{topic}"),
            IrcReply::Inviting {
                nick,
                target,
                channel,
            } => format!(":{server} {RPL_INVITING_NB:03} {nick} {target} {channel}"),
            IrcReply::NamReply {
                nick,
                channel,
                names,
            } => format!(":{server} {RPL_NAMREPLY_NB:03} {nick} = {channel} :{names}"),
            IrcReply::EndOfNames { nick, channel } => {
                format!(":{server} {RPL_ENDOFNAMES_NB:03} {nick} {channel} :{RPL_ENDOFNAMES_STR}")
            }
            IrcReply::ListStart { nick } => {
                format!(":{server} {RPL_LISTSTART_NB:03} {nick} {RPL_LISTSTART_STR}")
            }
            IrcReply::List {
                nick,
                channel,
                visible,
                topic,
            } => format!(":{server} {RPL_LIST_NB:03} {nick} {channel} {visible} :{topic}"),
            IrcReply::ListEnd { nick } => {
                format!(":{server} {RPL_LISTEND_NB:03} {nick} :{RPL_LISTEND_STR}")
            }

            IrcReply::WhoReply {
                nick,
                channel,
                username,
                host,
                target,
                flags,
                realname,
            } => format!(
                ":{server} {RPL_WHOREPLY_NB:03} {nick} {channel} {username} {host} {server} {target} {flags} :0 {realname}"
            ),
            IrcReply::EndOfWho { nick, mask } => {
                format!(":{server} {RPL_ENDOFWHO_NB:03} {nick} {mask} :{RPL_ENDOFWHO_STR}")
            }
            IrcReply::WhoisUser {
                nick,
                target,
                username,
                host,
                realname,
            } => format!(
                ":{server} {RPL_WHOISUSER_NB:03} {nick} {target} {username} {host} * :{realname}"
            ),
            IrcReply::WhoisServer { nick, target, info } => {
                format!(":{server} {RPL_WHOISSERVER_NB:03} {nick} {target} {server} :{info}")
            }
            IrcReply::WhoisIdle { nick, target, idle } => format!(
                ":{server} {RPL_WHOISIDLE_NB:03} {nick} {target} {idle} :{RPL_WHOISIDLE_STR}"
            ),
            IrcReply::WhoisChannels {
                nick,
                target,
                channels,
            } => format!(":{server} {RPL_WHOISCHANNELS_NB:03} {nick} {target} :{channels}"),
            IrcReply::EndOfWhois { nick, target } => {
                format!(":{server} {RPL_ENDOFWHOIS_NB:03} {nick} {target} :{RPL_ENDOFWHOIS_STR}")
            }

            IrcReply::Version { nick, version } => {
                format!(":{server} {RPL_VERSION_NB:03} {nick} {version} {server} :single-writer IRC daemon")
            }
            IrcReply::Time { nick, time } => {
                format!(":{server} {RPL_TIME_NB:03} {nick} {server} :{time}")
            }
            IrcReply::Info { nick, line } => {
                format!(":{server} {RPL_INFO_NB:03} {nick} :{line}")
            }
            IrcReply::EndOfInfo { nick } => {
                format!(":{server} {RPL_ENDOFINFO_NB:03} {nick} :{RPL_ENDOFINFO_STR}")
            }
            IrcReply::AdminMe { nick } => {
                format!(":{server} {RPL_ADMINME_NB:03} {nick} {server} :{RPL_ADMINME_STR}")
            }
            IrcReply::AdminLoc1 { nick, line } => {
                format!(":{server} {RPL_ADMINLOC1_NB:03} {nick} :{line}")
            }
            IrcReply::AdminLoc2 { nick, line } => {
                format!(":{server} {RPL_ADMINLOC2_NB:03} {nick} :{line}")
            }
            IrcReply::AdminEmail { nick, email } => {
                format!(":{server} {RPL_ADMINEMAIL_NB:03} {nick} :{email}")
            }
            IrcReply::StatsUptime { nick, uptime } => {
                format!(":{server} {RPL_STATSUPTIME_NB:03} {nick} :{uptime}")
            }
            IrcReply::EndOfStats { nick } => {
                format!(":{server} {RPL_ENDOFSTATS_NB:03} {nick} * :{RPL_ENDOFSTATS_STR}")
            }

            IrcReply::ErrNoSuchNick { nick, target } => {
                format!(":{server} {ERR_NOSUCHNICK_NB:03} {nick} {target} :{ERR_NOSUCHNICK_STR}")
            }
            IrcReply::ErrNoSuchChannel { nick, channel } => format!(
                ":{server} {ERR_NOSUCHCHANNEL_NB:03} {nick} {channel} :{ERR_NOSUCHCHANNEL_STR}"
            ),
            IrcReply::ErrCannotSendToChan { nick, channel } => format!(
                ":{server} {ERR_CANNOTSENDTOCHAN_NB:03} {nick} {channel} :{ERR_CANNOTSENDTOCHAN_STR}"
            ),
            IrcReply::ErrTooManyChannels { nick, channel } => format!(
                ":{server} {ERR_TOOMANYCHANNELS_NB:03} {nick} {channel} :{ERR_TOOMANYCHANNELS_STR}"
            ),
            IrcReply::ErrNoOrigin { nick } => {
                format!(":{server} {ERR_NOORIGIN_NB:03} {nick} :{ERR_NOORIGIN_STR}")
            }
            IrcReply::ErrNoRecipient { nick, command } => format!(
                ":{server} {ERR_NORECIPIENT_NB:03} {nick} :No recipient given ({command})"
            ),
            IrcReply::ErrNoTextToSend { nick } => {
                format!(":{server} {ERR_NOTEXTTOSEND_NB:03} {nick} :{ERR_NOTEXTTOSEND_STR}")
            }
            IrcReply::ErrUnknownCommand { nick, command } => format!(
                ":{server} {ERR_UNKNOWNCOMMAND_NB:03} {nick} {command} :{ERR_UNKNOWNCOMMAND_STR}"
            ),
            IrcReply::ErrNoNicknameGiven { nick } => format!(
                ":{server} {ERR_NONICKNAMEGIVEN_NB:03} {nick} :{ERR_NONICKNAMEGIVEN_STR}"
            ),
            IrcReply::ErrErroneusNickname { nick, attempted } => format!(
                ":{server} {ERR_ERRONEUSNICKNAME_NB:03} {nick} {attempted} :{ERR_ERRONEUSNICKNAME_STR}"
            ),
            IrcReply::ErrNicknameInUse { nick, attempted } => format!(
                ":{server} {ERR_NICKNAMEINUSE_NB:03} {nick} {attempted} :{ERR_NICKNAMEINUSE_STR}"
            ),
            IrcReply::ErrUserNotInChannel {
                nick,
                target,
                channel,
            } => format!(
                ":{server} {ERR_USERNOTINCHANNEL_NB:03} {nick} {target} {channel} :{ERR_USERNOTINCHANNEL_STR}"
            ),
            IrcReply::ErrNotOnChannel { nick, channel } => format!(
                ":{server} {ERR_NOTONCHANNEL_NB:03} {nick} {channel} :{ERR_NOTONCHANNEL_STR}"
            ),
            IrcReply::ErrUserOnChannel {
                nick,
                target,
                channel,
            } => format!(
                ":{server} {ERR_USERONCHANNEL_NB:03} {nick} {target} {channel} :{ERR_USERONCHANNEL_STR}"
            ),
            IrcReply::ErrNotRegistered { nick } => {
                format!(":{server} {ERR_NOTREGISTERED_NB:03} {nick} :{ERR_NOTREGISTERED_STR}")
            }
            IrcReply::ErrNeedMoreParams { nick, command } => format!(
                ":{server} {ERR_NEEDMOREPARAMS_NB:03} {nick} {command} :{ERR_NEEDMOREPARAMS_STR}"
            ),
            IrcReply::ErrAlreadyRegistered { nick } => format!(
                ":{server} {ERR_ALREADYREGISTRED_NB:03} {nick} :{ERR_ALREADYREGISTRED_STR}"
            ),
            IrcReply::ErrPasswdMismatch { nick } => format!(
                ":{server} {ERR_PASSWDMISMATCH_NB:03} {nick} :{ERR_PASSWDMISMATCH_STR}"
            ),
            IrcReply::ErrChannelIsFull { nick, channel } => format!(
                ":{server} {ERR_CHANNELISFULL_NB:03} {nick} {channel} :{ERR_CHANNELISFULL_STR}"
            ),
            IrcReply::ErrUnknownMode { nick, mode } => {
                format!(":{server} {ERR_UNKNOWNMODE_NB:03} {nick} {mode} :{ERR_UNKNOWNMODE_STR}")
            }
            IrcReply::ErrInviteOnlyChan { nick, channel } => format!(
                ":{server} {ERR_INVITEONLYCHAN_NB:03} {nick} {channel} :{ERR_INVITEONLYCHAN_STR}"
            ),
            IrcReply::ErrBannedFromChan { nick, channel } => format!(
                ":{server} {ERR_BANNEDFROMCHAN_NB:03} {nick} {channel} :{ERR_BANNEDFROMCHAN_STR}"
            ),
            IrcReply::ErrBadChannelKey { nick, channel } => format!(
                ":{server} {ERR_BADCHANNELKEY_NB:03} {nick} {channel} :{ERR_BADCHANNELKEY_STR}"
            ),
            IrcReply::ErrChanOPrivsNeeded { nick, channel } => format!(
                ":{server} {ERR_CHANOPRIVSNEEDED_NB:03} {nick} {channel} :{ERR_CHANOPRIVSNEEDED_STR}"
            ),
            IrcReply::ErrUsersDontMatch { nick } => format!(
                ":{server} {ERR_USERSDONTMATCH_NB:03} {nick} :{ERR_USERSDONTMATCH_STR}"
            ),
        }
    }
}

// Relayed commands: `:<nick>!<user>@<host> <VERB> <params...>`

pub fn relay_join(prefix: &str, channel: &str) -> String {
    format!(":{prefix} JOIN :{channel}")
}

pub fn relay_part(prefix: &str, channel: &str, reason: &str) -> String {
    format!(":{prefix} PART {channel} :{reason}")
}

pub fn relay_quit(prefix: &str, reason: &str) -> String {
    format!(":{prefix} QUIT :{reason}")
}

pub fn relay_nick(prefix: &str, new_nick: &str) -> String {
    format!(":{prefix} NICK :{new_nick}")
}

pub fn relay_message(prefix: &str, verb: &str, target: &str, text: &str) -> String {
    format!(":{prefix} {verb} {target} :{text}")
}

pub fn relay_kick(prefix: &str, channel: &str, victim: &str, reason: &str) -> String {
    format!(":{prefix} KICK {channel} {victim} :{reason}")
}

pub fn relay_invite(prefix: &str, target: &str, channel: &str) -> String {
    format!(":{prefix} INVITE {target} :{channel}")
}

pub fn relay_topic(prefix: &str, channel: &str, topic: &str) -> String {
    format!(":{prefix} TOPIC {channel} :{topic}")
}

pub fn relay_mode(prefix: &str, channel: &str, changes: &str) -> String {
    format!(":{prefix} MODE {channel} {changes}")
}
