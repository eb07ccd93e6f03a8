use thiserror::Error;

use crate::constants::{MAX_INPUT_BUFFER, MAX_MESSAGE_LENGTH};

// 2.3 Messages
//
//    IRC messages are always lines of characters terminated with a CR-LF
//    (Carriage Return - Line Feed) pair, and these messages SHALL NOT
//    exceed 512 characters in length, counting all characters including
//    the trailing CR-LF.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// The accumulator filled up without a single complete line showing up.
    #[error("input buffer exceeded {MAX_INPUT_BUFFER} bytes without a complete line")]
    ExcessFlood,
}

/// Splits the inbound byte stream into protocol messages. Bytes after the
/// last terminator stay buffered until the next read.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly read bytes and drains every complete message.
    ///
    /// Messages are terminated by `\n` with an optional preceding `\r`.
    /// Empty lines are discarded, and a message whose wire length would
    /// exceed 512 bytes (content plus CRLF) is dropped without a reply.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<String>, FramingError> {
        self.buffer.extend_from_slice(data);

        let mut messages = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop(); // the '\n'
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if !line.is_empty() && line.len() + 2 <= MAX_MESSAGE_LENGTH {
                messages.push(String::from_utf8_lossy(&line).into_owned());
            }
        }

        if self.buffer.len() > MAX_INPUT_BUFFER {
            self.buffer.clear();
            return Err(FramingError::ExcessFlood);
        }

        Ok(messages)
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

/// One frame queued for a client socket. Every outbound line is normalized
/// to end with CRLF exactly once.
#[derive(Debug, Clone)]
pub struct OutboundLine {
    pub raw: String,
}

impl OutboundLine {
    pub fn new(line: String) -> Self {
        let raw = if line.ends_with("\r\n") {
            line
        } else {
            format!("{line}\r\n")
        };
        OutboundLine { raw }
    }
}
