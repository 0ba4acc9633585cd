//! Turns a polled byte stream into complete input lines.

use std::io;

use tickline_types::error::{ConsoleError, Result};

use crate::stream::{InputStream, READ_CHUNK};

/// Outcome of one [`LineAssembler::drain_one_line`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drained {
    /// A complete line, terminator removed and whitespace trimmed.
    Line(String),
    /// A non-blocking source ran dry mid-line. The partial line is kept.
    Pending,
    /// The stream has ended and everything before it has been delivered.
    Closed,
}

/// Accumulates bytes from an [`InputStream`] until a `\n` arrives.
pub struct LineAssembler<S> {
    stream: S,
    /// The line in progress. Never holds a terminator.
    buffer: Vec<u8>,
    /// Bytes read past the last terminator, served before the stream.
    carry: Vec<u8>,
    max_line_len: usize,
    /// Set after an overlong line until its terminator shows up.
    discarding: bool,
    eof: bool,
}

impl<S: InputStream> LineAssembler<S> {
    /// Wrap `stream`, dropping lines longer than `max_line_len` bytes.
    pub fn new(stream: S, max_line_len: usize) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(256),
            carry: Vec::new(),
            max_line_len,
            discarding: false,
            eof: false,
        }
    }

    /// Whether input is waiting. Never blocks and never consumes bytes.
    pub fn poll_line_ready(&mut self) -> Result<bool> {
        if !self.carry.is_empty() {
            return Ok(true);
        }
        if self.eof {
            return Ok(true);
        }
        self.stream.poll_readable()
    }

    /// Assemble the next line.
    ///
    /// Lines already sitting in the carry buffer are returned without
    /// touching the stream. Otherwise chunks are read until a terminator
    /// arrives; once a line is underway this blocks on a blocking stream
    /// rather than spin.
    pub fn drain_one_line(&mut self) -> Result<Drained> {
        loop {
            if let Some(line) = self.take_line_from_carry() {
                return Ok(Drained::Line(line));
            }

            if self.eof {
                return Ok(self.finish());
            }

            let mut chunk = [0u8; READ_CHUNK];
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    log::debug!("input stream reached end of stream");
                    self.eof = true;
                },
                Ok(n) => self.carry.extend_from_slice(&chunk[..n]),
                Err(ConsoleError::Io(ref e)) if e.kind() == io::ErrorKind::WouldBlock => {
                    return Ok(Drained::Pending);
                },
                Err(ConsoleError::Io(ref e)) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) => return Err(e),
            }
        }
    }

    /// Move carry bytes into the line buffer up to the next kept line.
    ///
    /// Lines dropped by the length cap are skipped, so every terminator in
    /// the carry is consumed before the stream is read again.
    fn take_line_from_carry(&mut self) -> Option<String> {
        while let Some(pos) = self.carry.iter().position(|&b| b == b'\n') {
            let rest = self.carry.split_off(pos + 1);
            let mut head = std::mem::replace(&mut self.carry, rest);
            head.pop();
            self.absorb(&head);

            if self.discarding {
                self.discarding = false;
                self.buffer.clear();
                continue;
            }
            return Some(self.take_buffer());
        }

        if !self.carry.is_empty() {
            let rest = std::mem::take(&mut self.carry);
            self.absorb(&rest);
        }
        None
    }

    /// Append terminator-free bytes to the line buffer, enforcing the cap.
    fn absorb(&mut self, bytes: &[u8]) {
        if self.discarding {
            return;
        }
        self.buffer.extend_from_slice(bytes);
        if self.buffer.len() > self.max_line_len {
            log::warn!(
                "input line exceeded {} bytes; discarding it",
                self.max_line_len
            );
            self.buffer.clear();
            self.discarding = true;
        }
    }

    /// End of stream: deliver any unterminated tail once, then report closed.
    fn finish(&mut self) -> Drained {
        self.discarding = false;
        if self.buffer.is_empty() {
            return Drained::Closed;
        }
        let line = self.take_buffer();
        if line.is_empty() {
            Drained::Closed
        } else {
            Drained::Line(line)
        }
    }

    fn take_buffer(&mut self) -> String {
        let raw = std::mem::take(&mut self.buffer);
        trim_line(&String::from_utf8_lossy(&raw)).to_string()
    }

    /// Bytes of the line currently being assembled.
    pub fn partial_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the stream has reported end of stream.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// The wrapped stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// The wrapped stream, mutably.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Close the wrapped stream.
    pub fn close(&mut self) -> Result<()> {
        self.buffer.clear();
        self.carry.clear();
        self.eof = true;
        self.stream.close()
    }
}

/// Strip the whitespace a terminal line may carry around it, including a
/// trailing `\r` from CRLF input.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}
