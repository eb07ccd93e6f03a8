use std::collections::HashSet;
use std::time::SystemTime;

use crate::constants::{MAX_TOPIC_LENGTH, MAX_USER_LIMIT};
use crate::parsers::truncate_key;
use crate::users::UserId;

pub type ChannelName = String;

/// One-letter channel flags plus the parameterized key and user limit.
/// Topic restriction and no-external-messages start enabled, matching what
/// clients expect from a freshly created channel.
#[derive(Debug, Clone)]
pub struct ChannelModes {
    pub invite_only: bool,      // +i
    pub topic_restricted: bool, // +t
    pub moderated: bool,        // +m
    pub no_external: bool,      // +n
    pub secret: bool,           // +s
    pub private: bool,          // +p
    pub key: Option<String>,    // +k <key>
    /// 0 means unset, otherwise 1..=999.
    pub user_limit: usize, // +l <count>
}

impl Default for ChannelModes {
    fn default() -> Self {
        Self {
            invite_only: false,
            topic_restricted: true,
            moderated: false,
            no_external: true,
            secret: false,
            private: false,
            key: None,
            user_limit: 0,
        }
    }
}

/// Why a JOIN attempt was turned away, in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejection {
    Banned,
    Full,
    InviteOnly,
    BadKey,
}

#[derive(Debug)]
pub struct Channel {
    pub name: ChannelName,
    /// Empty string means "no topic set".
    pub topic: String,
    pub topic_set_by: String,
    pub topic_set_at: Option<SystemTime>,
    pub members: HashSet<UserId>,
    pub operators: HashSet<UserId>,
    pub invited: HashSet<UserId>,
    pub banned: HashSet<UserId>,
    pub modes: ChannelModes,
    pub created_at: SystemTime,
}

impl Channel {
    pub fn new(name: ChannelName) -> Self {
        Self {
            name,
            topic: String::new(),
            topic_set_by: String::new(),
            topic_set_at: None,
            members: HashSet::new(),
            operators: HashSet::new(),
            invited: HashSet::new(),
            banned: HashSet::new(),
            modes: ChannelModes::default(),
            created_at: SystemTime::now(),
        }
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    pub fn is_operator(&self, user_id: UserId) -> bool {
        self.operators.contains(&user_id)
    }

    pub fn is_invited(&self, user_id: UserId) -> bool {
        self.invited.contains(&user_id)
    }

    pub fn is_banned(&self, user_id: UserId) -> bool {
        self.banned.contains(&user_id)
    }

    /// Admission check for an existing channel, applied after the caller's
    /// per-user checks (membership, channel count, name validity).
    pub fn check_join(&self, user_id: UserId, key: Option<&str>) -> Result<(), JoinRejection> {
        if self.is_banned(user_id) {
            return Err(JoinRejection::Banned);
        }
        if self.modes.user_limit > 0 && self.members.len() >= self.modes.user_limit {
            return Err(JoinRejection::Full);
        }
        if self.modes.invite_only && !self.is_invited(user_id) {
            return Err(JoinRejection::InviteOnly);
        }
        if let Some(channel_key) = &self.modes.key {
            if key != Some(channel_key.as_str()) {
                return Err(JoinRejection::BadKey);
            }
        }
        Ok(())
    }

    pub fn set_key(&mut self, key: &str) {
        self.modes.key = Some(truncate_key(key).to_string());
    }

    /// Clamps to 1..=999; 0 clears the limit.
    pub fn set_user_limit(&mut self, limit: usize) {
        self.modes.user_limit = limit.min(MAX_USER_LIMIT);
    }

    pub fn set_topic(&mut self, topic: &str, set_by: String) {
        let trimmed = if topic.len() > MAX_TOPIC_LENGTH {
            let mut end = MAX_TOPIC_LENGTH;
            while !topic.is_char_boundary(end) {
                end -= 1;
            }
            &topic[..end]
        } else {
            topic
        };
        self.topic = trimmed.to_string();
        self.topic_set_by = set_by;
        self.topic_set_at = Some(SystemTime::now());
    }

    /// Current modes as `+` followed by flag letters, with the key and the
    /// limit appended as parameters in that order.
    pub fn mode_string(&self) -> String {
        let mut modes = String::from("+");
        let mut params = String::new();

        if self.modes.invite_only {
            modes.push('i');
        }
        if self.modes.topic_restricted {
            modes.push('t');
        }
        if self.modes.moderated {
            modes.push('m');
        }
        if self.modes.no_external {
            modes.push('n');
        }
        if self.modes.secret {
            modes.push('s');
        }
        if self.modes.private {
            modes.push('p');
        }
        if let Some(key) = &self.modes.key {
            modes.push('k');
            params.push(' ');
            params.push_str(key);
        }
        if self.modes.user_limit > 0 {
            modes.push('l');
            params.push_str(&format!(" {}", self.modes.user_limit));
        }

        modes + &params
    }

    /// Visible in LIST/NAMES output? Secret and private channels only show
    /// up for their own members.
    pub fn visible_to(&self, user_id: UserId) -> bool {
        if self.modes.secret || self.modes.private {
            self.is_member(user_id)
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_channel_defaults_to_plus_tn() {
        let channel = Channel::new("#x".to_string());
        assert_eq!(channel.mode_string(), "+tn");
    }

    #[test]
    fn mode_string_appends_key_then_limit() {
        let mut channel = Channel::new("#x".to_string());
        channel.set_key("s3cr3t");
        channel.set_user_limit(10);
        channel.modes.invite_only = true;
        assert_eq!(channel.mode_string(), "+itnkl s3cr3t 10");
    }

    #[test]
    fn check_join_order_is_ban_limit_invite_key() {
        let mut channel = Channel::new("#x".to_string());
        channel.members.insert(1);
        channel.modes.user_limit = 1;
        channel.modes.invite_only = true;
        channel.set_key("k");
        channel.banned.insert(9);

        // banned wins over everything else
        assert_eq!(channel.check_join(9, None), Err(JoinRejection::Banned));
        // then the limit
        assert_eq!(channel.check_join(2, None), Err(JoinRejection::Full));
        // then invite-only
        channel.set_user_limit(5);
        assert_eq!(channel.check_join(2, Some("k")), Err(JoinRejection::InviteOnly));
        // then the key
        channel.invited.insert(2);
        assert_eq!(channel.check_join(2, Some("bad")), Err(JoinRejection::BadKey));
        assert_eq!(channel.check_join(2, None), Err(JoinRejection::BadKey));
        assert_eq!(channel.check_join(2, Some("k")), Ok(()));
    }

    #[test]
    fn user_limit_clamps_to_999() {
        let mut channel = Channel::new("#x".to_string());
        channel.set_user_limit(1000);
        assert_eq!(channel.modes.user_limit, 999);
    }

    #[test]
    fn key_set_then_removed() {
        let mut channel = Channel::new("#x".to_string());
        channel.set_key("abc");
        assert_eq!(channel.modes.key.as_deref(), Some("abc"));
        channel.modes.key = None;
        assert_eq!(channel.mode_string(), "+tn");
    }

    #[test]
    fn topic_is_trimmed_to_307() {
        let mut channel = Channel::new("#x".to_string());
        let long = "t".repeat(400);
        channel.set_topic(&long, "alice!a@host".to_string());
        assert_eq!(channel.topic.len(), 307);
        assert_eq!(channel.topic_set_by, "alice!a@host");
        assert!(channel.topic_set_at.is_some());
    }

    #[test]
    fn secret_channels_hidden_from_outsiders() {
        let mut channel = Channel::new("#x".to_string());
        channel.members.insert(1);
        assert!(channel.visible_to(2));
        channel.modes.secret = true;
        assert!(channel.visible_to(1));
        assert!(!channel.visible_to(2));
    }
}
