use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Instant, SystemTime};
use tokio::sync::mpsc::Sender;

use crate::channels::ChannelName;
use crate::wire::OutboundLine;

pub type UserId = usize;

static NEXT_USER_ID: AtomicUsize = AtomicUsize::new(1);

fn next_user_id() -> UserId {
    NEXT_USER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Per-connection identity and registration state. All fields are mutated
/// from the broker only; the outbound sender is the one handle the rest of
/// the process holds.
#[derive(Debug)]
pub struct User {
    pub user_id: UserId,
    /// Empty until a NICK command succeeds.
    pub nick: String,
    /// Empty until a USER command succeeds.
    pub username: String,
    pub realname: String,
    /// Dotted-quad string captured at accept time.
    pub hostname: String,
    pub password_accepted: bool,
    pub registered: bool,
    pub channels: HashSet<ChannelName>,
    pub connected_at: SystemTime,
    pub last_activity: Instant,
    pub tx_outbound: Sender<OutboundLine>,
}

impl User {
    pub fn new(hostname: String, tx_outbound: Sender<OutboundLine>) -> Self {
        Self {
            user_id: next_user_id(),
            nick: String::new(),
            username: String::new(),
            realname: String::new(),
            hostname,
            password_accepted: false,
            registered: false,
            channels: HashSet::new(),
            connected_at: SystemTime::now(),
            last_activity: Instant::now(),
            tx_outbound,
        }
    }

    /// Source prefix for relayed commands: `nick!user@host`. Falls back to
    /// the hostname while the nickname is still unset.
    pub fn prefix(&self) -> String {
        if self.nick.is_empty() {
            return self.hostname.clone();
        }
        let mut prefix = self.nick.clone();
        if !self.username.is_empty() {
            prefix.push('!');
            prefix.push_str(&self.username);
        }
        if !self.hostname.is_empty() {
            prefix.push('@');
            prefix.push_str(&self.hostname);
        }
        prefix
    }

    /// Recipient field of a numeric reply: the nickname, or `*` before one
    /// is set.
    pub fn nick_or_star(&self) -> &str {
        if self.nick.is_empty() { "*" } else { &self.nick }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_seconds(&self) -> u64 {
        self.last_activity.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn test_user() -> User {
        let (tx, _rx) = mpsc::channel(8);
        User::new("203.0.113.7".to_string(), tx)
    }

    #[test]
    fn user_ids_are_unique_and_increasing() {
        let a = test_user();
        let b = test_user();
        assert!(b.user_id > a.user_id);
    }

    #[test]
    fn prefix_before_and_after_identity() {
        let mut user = test_user();
        assert_eq!(user.prefix(), "203.0.113.7");
        assert_eq!(user.nick_or_star(), "*");

        user.nick = "alice".to_string();
        user.username = "a".to_string();
        assert_eq!(user.prefix(), "alice!a@203.0.113.7");
        assert_eq!(user.nick_or_star(), "alice");
    }
}
