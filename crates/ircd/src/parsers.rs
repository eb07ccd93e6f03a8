use nom::{
    IResult, Parser,
    bytes::complete::take_while,
    character::complete::{one_of, satisfy},
    combinator::{recognize, verify},
    sequence::pair,
};

use crate::constants::{MAX_CHANNEL_NAME_LENGTH, MAX_KEY_LENGTH, MAX_NICKNAME_LENGTH};

// The grammar below is the subset of RFC 2812 section 2.3.1 the server
// actually validates, with the nickname alphabet widened the way most
// deployed servers do (leading '_' and the bracket specials).

// 11.  nickname   =  ( letter / special ) *8( letter / digit / special / "-" )
//      special    =  %x5B-60 / %x7B-7D
//                    ; "[", "]", "\", "`", "_", "^", "{", "|", "}"
fn is_nickname_first_char(c: char) -> bool {
    c.is_ascii_alphabetic() || "_[]{}\\|".contains(c)
}

fn is_nickname_tail_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-[]{}\\|".contains(c)
}

pub fn nickname_parser(input: &str) -> IResult<&str, &str> {
    let parser = recognize(pair(
        satisfy(is_nickname_first_char),
        take_while(is_nickname_tail_char),
    ));
    verify(parser, |s: &str| s.len() <= MAX_NICKNAME_LENGTH).parse(input)
}

/// Nicknames clients may never claim, matched case-insensitively. The
/// service pseudo-users are included so a client cannot impersonate them.
pub const RESERVED_NICKNAMES: [&str; 18] = [
    "root",
    "admin",
    "administrator",
    "op",
    "oper",
    "operator",
    "server",
    "service",
    "chanserv",
    "nickserv",
    "memoserv",
    "operserv",
    "hostserv",
    "bot",
    "guest",
    "anonymous",
    "null",
    "nobody",
];

pub fn is_reserved_nickname(nick: &str) -> bool {
    let lowered = nick.to_ascii_lowercase();
    RESERVED_NICKNAMES.contains(&lowered.as_str())
}

pub fn is_valid_nickname(nick: &str) -> bool {
    matches!(nickname_parser(nick), Ok(("", _)))
}

// 13.  chanstring =  any octet except NUL, BELL, CR, LF, " " and ","
fn is_chan_char(c: char) -> bool {
    !matches!(c, '\0' | '\u{0007}' | '\r' | '\n' | ' ' | ',')
}

// 03.  channel    =  ( "#" / "&" ) chanstring
pub fn channel_parser(input: &str) -> IResult<&str, &str> {
    let parser = recognize(pair(one_of("#&"), take_while(is_chan_char)));
    verify(parser, |s: &str| s.len() <= MAX_CHANNEL_NAME_LENGTH).parse(input)
}

pub fn is_valid_channel_name(name: &str) -> bool {
    matches!(channel_parser(name), Ok(("", _)))
}

// 16.  key        =  any 7-bit US_ASCII character except NUL, CR, LF,
//                    BELL, "," and " "; at most 23 octets
fn is_key_char(c: char) -> bool {
    c.is_ascii() && !matches!(c, '\0' | '\u{0007}' | '\r' | '\n' | ' ' | ',')
}

pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

pub fn truncate_key(key: &str) -> &str {
    if key.len() > MAX_KEY_LENGTH {
        let mut end = MAX_KEY_LENGTH;
        while !key.is_char_boundary(end) {
            end -= 1;
        }
        &key[..end]
    } else {
        key
    }
}

/// RFC 1459 case folding: `{`, `}`, `|` and `^` are the lower-case forms of
/// `[`, `]`, `\` and `~`. Nickname lookups always go through this fold.
pub fn casefold(nick: &str) -> String {
    nick.chars()
        .map(|c| match c {
            '[' => '{',
            ']' => '}',
            '\\' => '|',
            '~' => '^',
            _ => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_nicknames() {
        let cases = ["a", "alice", "Wiz", "_under", "[box]", "{curly}", "a-b-c", "n1ck2", "\\back", "x234567_9"];
        for &case in &cases {
            assert!(is_valid_nickname(case), "should accept: {case}");
        }
    }

    #[test]
    fn invalid_nicknames() {
        let cases = [
            "",            // empty
            "1abc",        // cannot start with a digit
            "-dash",       // cannot start with '-'
            "toolongnick", // 11 chars
            "with space",
            "bad!char",
            "café",
        ];
        for &case in &cases {
            assert!(!is_valid_nickname(case), "should reject: {case}");
        }
    }

    #[test]
    fn reserved_nicknames_are_case_insensitive() {
        assert!(is_reserved_nickname("root"));
        assert!(is_reserved_nickname("NickServ"));
        assert!(is_reserved_nickname("ADMIN"));
        assert!(!is_reserved_nickname("alice"));
        // reserved but not syntactically invalid
        assert!(is_valid_nickname("root"));
    }

    #[test]
    fn valid_channel_names() {
        for &case in &["#x", "&local", "#general", "#", "#a.b'c"] {
            assert!(is_valid_channel_name(case), "should accept: {case}");
        }
    }

    #[test]
    fn invalid_channel_names() {
        let too_long = format!("#{}", "a".repeat(50));
        let cases = [
            "x",         // missing prefix
            "",
            "#with space",
            "#comma,",
            "#bel\u{0007}",
            "#line\nfeed",
            too_long.as_str(),
        ];
        for &case in &cases {
            assert!(!is_valid_channel_name(case), "should reject: {case:?}");
        }
    }

    #[test]
    fn keys_reject_separator_characters() {
        assert!(is_valid_key("s3cr3t"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("with space"));
        assert!(!is_valid_key("a,b"));
        assert!(!is_valid_key("bel\u{0007}"));
    }

    #[test]
    fn overlong_key_is_truncated_to_23() {
        let key = "abcdefghijklmnopqrstuvwxyz"; // 26 chars
        assert_eq!(truncate_key(key), "abcdefghijklmnopqrstuvw");
        assert_eq!(truncate_key(key).len(), 23);
        assert_eq!(truncate_key("short"), "short");
    }

    #[test]
    fn casefold_pins_rfc1459_mapping() {
        assert_eq!(casefold("Alice"), "alice");
        assert_eq!(casefold("[a]\\~"), "{a}|^");
        assert_eq!(casefold("nick[1]"), "nick{1}");
        // already-lower forms are fixed points
        assert_eq!(casefold("{a}|^"), "{a}|^");
    }
}
