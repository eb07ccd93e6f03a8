use std::collections::{HashMap, HashSet};
use std::time::Instant;

use log::{debug, info};
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;

use crate::channels::{Channel, ChannelName};
use crate::config::Config;
use crate::parsers::casefold;
use crate::replies::relay_quit;
use crate::users::{User, UserId};
use crate::wire::OutboundLine;

/// The registry: every user, every channel, and the two lookup indices.
/// Exactly one task (the broker) ever holds `&mut ServerState`, so the maps
/// need no interior locking; the invariants of the user↔channel graph are
/// maintained by the methods below and nowhere else.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub password: String,
    /// Human-readable creation date, sent in RPL_CREATED.
    pub created: String,
    pub started: Instant,
    pub users: HashMap<UserId, User>,
    /// Nickname index, keyed by the RFC 1459 casefold of the nick.
    pub nicks: HashMap<String, UserId>,
    pub channels: HashMap<ChannelName, Channel>,
}

impl ServerState {
    pub fn new(config: Config, password: String) -> Self {
        ServerState {
            config,
            password,
            created: chrono::Local::now()
                .format("%a %b %e %H:%M:%S %Y")
                .to_string(),
            started: Instant::now(),
            users: HashMap::new(),
            nicks: HashMap::new(),
            channels: HashMap::new(),
        }
    }

    pub fn server_name(&self) -> &str {
        &self.config.server.name
    }

    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    // --- user lifecycle ---------------------------------------------------

    pub fn add_user(&mut self, hostname: String, tx_outbound: Sender<OutboundLine>) -> UserId {
        let user = User::new(hostname, tx_outbound);
        let user_id = user.user_id;
        self.users.insert(user_id, user);
        user_id
    }

    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    pub fn user_mut(&mut self, user_id: UserId) -> Option<&mut User> {
        self.users.get_mut(&user_id)
    }

    pub fn user_by_nick(&self, nick: &str) -> Option<UserId> {
        self.nicks.get(&casefold(nick)).copied()
    }

    pub fn touch(&mut self, user_id: UserId) {
        if let Some(user) = self.users.get_mut(&user_id) {
            user.touch();
        }
    }

    /// Installs or replaces a nickname, keeping the case-insensitive index
    /// in step. Uniqueness must have been checked by the caller.
    pub fn set_nick(&mut self, user_id: UserId, nick: &str) {
        let Some(user) = self.users.get_mut(&user_id) else {
            return;
        };
        if !user.nick.is_empty() {
            self.nicks.remove(&casefold(&user.nick));
        }
        user.nick = nick.to_string();
        self.nicks.insert(casefold(nick), user_id);
    }

    /// Tears a user down: QUIT is broadcast once to every peer sharing a
    /// channel, then the user leaves every channel (promoting a new
    /// operator where needed) before the record itself is dropped. The
    /// dropped outbound sender closes the connection task.
    pub fn remove_user(&mut self, user_id: UserId, reason: &str) {
        let Some(user) = self.users.get(&user_id) else {
            return;
        };
        let prefix = user.prefix();
        let nick = user.nick_or_star().to_string();
        let channel_names: Vec<ChannelName> = user.channels.iter().cloned().collect();

        let quit_line = relay_quit(&prefix, reason);
        for peer in self.peers_of(user_id) {
            self.send_line(peer, quit_line.clone());
        }

        for name in &channel_names {
            self.detach_member(user_id, name);
        }
        // invites may be pending in channels the user never joined
        for channel in self.channels.values_mut() {
            channel.invited.remove(&user_id);
        }

        if let Some(user) = self.users.remove(&user_id) {
            if !user.nick.is_empty() {
                self.nicks.remove(&casefold(&user.nick));
            }
        }
        info!("client {nick} disconnected: {reason}");
    }

    /// Every user sharing at least one channel with `user_id`, excluding
    /// the user itself. Each peer appears once no matter how many channels
    /// are shared.
    pub fn peers_of(&self, user_id: UserId) -> HashSet<UserId> {
        let mut peers = HashSet::new();
        if let Some(user) = self.users.get(&user_id) {
            for name in &user.channels {
                if let Some(channel) = self.channels.get(name) {
                    peers.extend(channel.members.iter().copied());
                }
            }
        }
        peers.remove(&user_id);
        peers
    }

    // --- channel graph ----------------------------------------------------

    /// Adds a member, creating the channel on first JOIN. The creator
    /// becomes operator; a pending invite is consumed.
    pub fn join_channel(&mut self, user_id: UserId, name: &str) {
        let channel = self.channels.entry(name.to_string()).or_insert_with(|| {
            info!("channel created: {name}");
            Channel::new(name.to_string())
        });
        let first = channel.members.is_empty();
        channel.members.insert(user_id);
        if first {
            channel.operators.insert(user_id);
        }
        channel.invited.remove(&user_id);

        if let Some(user) = self.users.get_mut(&user_id) {
            user.channels.insert(name.to_string());
        }
    }

    /// Removes a member from one channel (PART, KICK, or teardown), keeping
    /// the operator invariant and reaping the channel if it emptied.
    pub fn part_channel(&mut self, user_id: UserId, name: &str) {
        if let Some(user) = self.users.get_mut(&user_id) {
            user.channels.remove(name);
        }
        self.detach_member(user_id, name);
    }

    fn detach_member(&mut self, user_id: UserId, name: &str) {
        let mut emptied = false;
        if let Some(channel) = self.channels.get_mut(name) {
            channel.members.remove(&user_id);
            channel.operators.remove(&user_id);
            channel.invited.remove(&user_id);
            if channel.members.is_empty() {
                emptied = true;
            } else if channel.operators.is_empty() {
                // last operator left: promote the longest-connected member
                if let Some(&next) = channel.members.iter().min() {
                    channel.operators.insert(next);
                }
            }
        }
        if emptied {
            self.channels.remove(name);
            info!("empty channel removed: {name}");
        }
    }

    /// Maintenance sweep; membership changes already reap eagerly, this
    /// catches anything that slipped through a teardown path.
    pub fn reap_empty_channels(&mut self) {
        let empty: Vec<ChannelName> = self
            .channels
            .iter()
            .filter(|(_, channel)| channel.members.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        for name in empty {
            self.channels.remove(&name);
            info!("empty channel removed: {name}");
        }
    }

    /// NAMES payload for one channel: nicks in join order, operators
    /// prefixed with `@`.
    pub fn names_reply(&self, channel: &Channel) -> String {
        let mut member_ids: Vec<UserId> = channel.members.iter().copied().collect();
        member_ids.sort_unstable();

        let mut names = String::new();
        for member_id in member_ids {
            let Some(member) = self.users.get(&member_id) else {
                continue;
            };
            if !names.is_empty() {
                names.push(' ');
            }
            if channel.operators.contains(&member_id) {
                names.push('@');
            }
            names.push_str(&member.nick);
        }
        names
    }

    // --- delivery ---------------------------------------------------------

    /// Queues one frame for a client. Best-effort: a full queue means the
    /// client is not draining its socket, and the frame is dropped rather
    /// than blocking the broker.
    pub fn send_line(&self, user_id: UserId, line: String) {
        let Some(user) = self.users.get(&user_id) else {
            return;
        };
        match user.tx_outbound.try_send(OutboundLine::new(line)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!("[{user_id}] outbound queue full, dropping frame");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Fans one frame out to every channel member, optionally excluding the
    /// originator.
    pub fn send_to_channel(&self, name: &str, line: &str, exclude: Option<UserId>) {
        let Some(channel) = self.channels.get(name) else {
            return;
        };
        for &member_id in &channel.members {
            if Some(member_id) == exclude {
                continue;
            }
            self.send_line(member_id, line.to_string());
        }
    }

    /// Graceful teardown: every connected client gets a final ERROR frame,
    /// then all records are dropped, which closes every socket.
    pub fn shutdown(&mut self) {
        info!("shutting down, disconnecting {} clients", self.users.len());
        for user_id in self.users.keys().copied().collect::<Vec<_>>() {
            self.send_line(user_id, "ERROR :Server shutting down".to_string());
        }
        self.channels.clear();
        self.nicks.clear();
        self.users.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, Receiver};

    fn state() -> ServerState {
        ServerState::new(Config::default(), "secret".to_string())
    }

    fn add_user(state: &mut ServerState, nick: &str) -> (UserId, Receiver<OutboundLine>) {
        let (tx, rx) = mpsc::channel(64);
        let user_id = state.add_user("127.0.0.1".to_string(), tx);
        state.set_nick(user_id, nick);
        if let Some(user) = state.user_mut(user_id) {
            user.username = nick.chars().take(1).collect();
            user.registered = true;
        }
        (user_id, rx)
    }

    fn drain(rx: &mut Receiver<OutboundLine>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line.raw.trim_end().to_string());
        }
        lines
    }

    fn assert_symmetric(state: &ServerState) {
        for (name, channel) in &state.channels {
            for member_id in &channel.members {
                let user = state.user(*member_id).expect("member exists");
                assert!(user.channels.contains(name), "membership must be symmetric");
            }
            assert!(
                channel.operators.is_subset(&channel.members),
                "operators must be members"
            );
            assert!(!channel.members.is_empty(), "no empty channel in registry");
            assert!(!channel.operators.is_empty(), "members imply operators");
        }
        for (user_id, user) in &state.users {
            for name in &user.channels {
                let channel = state.channels.get(name).expect("channel exists");
                assert!(channel.members.contains(user_id));
            }
        }
    }

    #[test]
    fn first_joiner_becomes_operator() {
        let mut state = state();
        let (alice, _rx) = add_user(&mut state, "alice");
        state.join_channel(alice, "#x");
        assert!(state.channels["#x"].is_operator(alice));
        assert_symmetric(&state);
    }

    #[test]
    fn join_then_part_restores_registry_counts() {
        let mut state = state();
        let (alice, _rx) = add_user(&mut state, "alice");
        let users_before = state.users.len();

        state.join_channel(alice, "#x");
        assert_eq!(state.channels.len(), 1);
        state.part_channel(alice, "#x");
        assert_eq!(state.channels.len(), 0, "emptied channel is reaped");
        assert_eq!(state.users.len(), users_before);
        assert_symmetric(&state);
    }

    #[test]
    fn operator_auto_promotion_on_last_op_leaving() {
        let mut state = state();
        let (alice, _ra) = add_user(&mut state, "alice");
        let (bob, _rb) = add_user(&mut state, "bob");
        state.join_channel(alice, "#x");
        state.join_channel(bob, "#x");
        assert!(!state.channels["#x"].is_operator(bob));

        state.part_channel(alice, "#x");
        assert!(state.channels["#x"].is_operator(bob), "bob promoted");
        assert_symmetric(&state);
    }

    #[test]
    fn nick_lookup_is_case_insensitive_and_restorable() {
        let mut state = state();
        let (alice, _rx) = add_user(&mut state, "alice");
        assert_eq!(state.user_by_nick("ALICE"), Some(alice));
        assert_eq!(state.user_by_nick("[x]"), None);

        state.set_nick(alice, "bob");
        assert_eq!(state.user_by_nick("alice"), None);
        assert_eq!(state.user_by_nick("BOB"), Some(alice));

        state.set_nick(alice, "alice");
        assert_eq!(state.user_by_nick("Alice"), Some(alice));
        assert_eq!(state.nicks.len(), 1);
    }

    #[test]
    fn rfc1459_equivalent_nicks_share_an_index_slot() {
        let mut state = state();
        let (alice, _rx) = add_user(&mut state, "n[1]");
        assert_eq!(state.user_by_nick("n{1}"), Some(alice));
    }

    #[test]
    fn quit_is_broadcast_once_per_peer() {
        let mut state = state();
        let (alice, mut rx_alice) = add_user(&mut state, "alice");
        let (bob, _rx_bob) = add_user(&mut state, "bob");
        // two shared channels, one QUIT expected on alice's side
        state.join_channel(alice, "#x");
        state.join_channel(bob, "#x");
        state.join_channel(alice, "#y");
        state.join_channel(bob, "#y");
        drain(&mut rx_alice);

        state.remove_user(bob, "Client quit");
        let lines = drain(&mut rx_alice);
        assert_eq!(lines, vec![":bob!b@127.0.0.1 QUIT :Client quit"]);
        assert!(state.user(bob).is_none());
        assert_eq!(state.user_by_nick("bob"), None);
        assert_symmetric(&state);
    }

    #[test]
    fn remove_user_reaps_solo_channels() {
        let mut state = state();
        let (bob, _rx) = add_user(&mut state, "bob");
        state.join_channel(bob, "#y");
        state.remove_user(bob, "Connection error");
        assert!(state.channels.is_empty());
    }

    #[test]
    fn maintenance_reap_removes_empty_channels() {
        let mut state = state();
        state
            .channels
            .insert("#ghost".to_string(), Channel::new("#ghost".to_string()));
        state.reap_empty_channels();
        assert!(state.channels.is_empty());
    }

    #[test]
    fn names_reply_prefixes_operators() {
        let mut state = state();
        let (alice, _ra) = add_user(&mut state, "alice");
        let (bob, _rb) = add_user(&mut state, "bob");
        state.join_channel(alice, "#x");
        state.join_channel(bob, "#x");
        let names = state.names_reply(&state.channels["#x"]);
        assert_eq!(names, "@alice bob");
    }

    #[test]
    fn broadcast_can_exclude_the_sender() {
        let mut state = state();
        let (alice, mut rx_alice) = add_user(&mut state, "alice");
        let (bob, mut rx_bob) = add_user(&mut state, "bob");
        state.join_channel(alice, "#x");
        state.join_channel(bob, "#x");

        state.send_to_channel("#x", "hello", Some(alice));
        assert!(drain(&mut rx_alice).is_empty());
        assert_eq!(drain(&mut rx_bob), vec!["hello"]);
    }
}
