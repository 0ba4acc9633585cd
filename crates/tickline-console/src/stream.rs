//! Byte input sources the console reads from.
//!
//! The console never blocks while it is merely checking for input: it asks
//! [`InputStream::poll_readable`] first and only calls
//! [`InputStream::read`] once a line is underway.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tickline_types::error::Result;

/// Chunk size used by the background reader and by line assembly.
pub const READ_CHUNK: usize = 512;

/// A readable byte source with a non-blocking readiness check.
pub trait InputStream {
    /// Whether a `read` would return without blocking (data or end of
    /// stream). Must not consume bytes.
    fn poll_readable(&mut self) -> Result<bool>;

    /// Read up to `buf.len()` bytes. May block. `Ok(0)` means end of
    /// stream. Non-blocking sources report an empty queue as
    /// [`io::ErrorKind::WouldBlock`].
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Release the underlying source.
    fn close(&mut self) -> Result<()>;
}

/// Message sent from the reader thread.
enum Chunk {
    Data(Vec<u8>),
    Eof,
    Failed(io::Error),
}

/// Wraps a blocking reader (stdin) in a dedicated thread that forwards
/// chunks over a channel, turning it into a pollable [`InputStream`].
pub struct ChannelStream {
    rx: Option<Receiver<Chunk>>,
    pending: VecDeque<u8>,
    eof: bool,
    error: Option<io::Error>,
}

impl ChannelStream {
    /// Spawn the reader thread for `reader`.
    pub fn spawn<R>(reader: R) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("tickline-input".to_string())
            .spawn(move || pump(reader, tx))?;
        Ok(Self {
            rx: Some(rx),
            pending: VecDeque::new(),
            eof: false,
            error: None,
        })
    }

    /// A stream over the process's standard input.
    pub fn stdin() -> Result<Self> {
        Self::spawn(io::stdin())
    }

    fn accept(&mut self, chunk: Chunk) {
        match chunk {
            Chunk::Data(bytes) => self.pending.extend(bytes),
            Chunk::Eof => self.eof = true,
            Chunk::Failed(e) => self.error = Some(e),
        }
    }

    fn has_news(&self) -> bool {
        !self.pending.is_empty() || self.eof || self.error.is_some()
    }
}

fn pump<R: Read>(mut reader: R, tx: mpsc::Sender<Chunk>) {
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let msg = match reader.read(&mut buf) {
            Ok(0) => Chunk::Eof,
            Ok(n) => Chunk::Data(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => Chunk::Failed(e),
        };
        let last = !matches!(msg, Chunk::Data(_));
        if tx.send(msg).is_err() || last {
            return;
        }
    }
}

impl InputStream for ChannelStream {
    fn poll_readable(&mut self) -> Result<bool> {
        while !self.has_news() {
            let Some(rx) = self.rx.as_ref() else {
                return Ok(true);
            };
            match rx.try_recv() {
                Ok(chunk) => self.accept(chunk),
                Err(TryRecvError::Empty) => return Ok(false),
                Err(TryRecvError::Disconnected) => self.eof = true,
            }
        }
        Ok(true)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.pending.is_empty() {
            if let Some(e) = self.error.take() {
                return Err(e.into());
            }
            if self.eof {
                return Ok(0);
            }
            let Some(rx) = self.rx.as_ref() else {
                return Ok(0);
            };
            match rx.recv() {
                Ok(chunk) => self.accept(chunk),
                Err(_) => self.eof = true,
            }
            return self.read(buf);
        }
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn close(&mut self) -> Result<()> {
        // The reader thread stays parked on its blocking read; dropping the
        // receiver makes its next send fail and the thread exit.
        self.rx = None;
        self.pending.clear();
        self.eof = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    bytes: VecDeque<u8>,
    closed: bool,
}

/// In-memory stream for scripted input and tests.
///
/// Clones share the same queue, so one handle can feed bytes while the
/// console owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStream {
    /// An empty, open stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// An open stream pre-loaded with `bytes`.
    pub fn with_input(bytes: &[u8]) -> Self {
        let stream = Self::new();
        stream.push(bytes);
        stream
    }

    /// Append bytes for the reader.
    pub fn push(&self, bytes: &[u8]) {
        self.inner.borrow_mut().bytes.extend(bytes);
    }

    /// Mark end of stream; queued bytes remain readable.
    pub fn close_input(&self) {
        self.inner.borrow_mut().closed = true;
    }

    /// Bytes queued but not yet read.
    pub fn pending(&self) -> usize {
        self.inner.borrow().bytes.len()
    }

    /// Whether end of stream was signalled.
    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }
}

impl InputStream for MemoryStream {
    fn poll_readable(&mut self) -> Result<bool> {
        let inner = self.inner.borrow();
        Ok(!inner.bytes.is_empty() || inner.closed)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.borrow_mut();
        if inner.bytes.is_empty() {
            if inner.closed {
                return Ok(0);
            }
            return Err(io::Error::from(io::ErrorKind::WouldBlock).into());
        }
        let n = buf.len().min(inner.bytes.len());
        for (slot, byte) in buf.iter_mut().zip(inner.bytes.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn close(&mut self) -> Result<()> {
        self.close_input();
        Ok(())
    }
}
