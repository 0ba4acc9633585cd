//! Interactive line-oriented command console.
//!
//! A [`Console`] polls an [`InputStream`] without blocking, assembles bytes
//! into lines, tokenizes each line with quote grouping, and hands the result
//! to a [`CommandHandler`]. A tick hook runs once per loop iteration at a
//! fixed cadence whether or not input arrived.

mod assembler;
mod console;
mod handler;
mod registry;
mod stream;
mod tokenizer;

/// Outcome of draining the input for one line.
pub use assembler::Drained;
/// Assembles polled bytes into trimmed lines.
pub use assembler::LineAssembler;
/// The console and its tick loop.
pub use console::{Console, ConsoleContext, ExitReason, RunState};
/// The dispatch hook contract and the empty default handler.
pub use handler::{CommandHandler, NoCommands};
/// Name-keyed command registry.
pub use registry::{Command, CommandRegistry, TickHook};
/// Input sources.
pub use stream::{ChannelStream, InputStream, MemoryStream};
/// Quote-aware tokenizer.
pub use tokenizer::{command_name, tokenize};

pub use tickline_types::{ConsoleConfig, ConsoleError, Result};
