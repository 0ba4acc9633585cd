//! The dispatch hook contract.

use crate::console::ConsoleContext;

/// Receives every command line and every tick from a [`Console`].
///
/// [`Console`]: crate::Console
pub trait CommandHandler {
    /// Handle one command line.
    ///
    /// `name` is the first token upper-cased; `tokens` is the whole line,
    /// command word included. Return `false` if the command is unknown and
    /// the console will report it.
    fn dispatch(&mut self, name: &str, tokens: &[String], ctx: &mut ConsoleContext) -> bool;

    /// Called once per loop iteration, after input handling.
    fn on_tick(&mut self, ctx: &mut ConsoleContext) {
        ctx.reset_ticks();
    }
}

/// A handler that knows no commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommands;

impl CommandHandler for NoCommands {
    fn dispatch(&mut self, _name: &str, _tokens: &[String], _ctx: &mut ConsoleContext) -> bool {
        false
    }
}
