//! The console: input polling, dispatch, and the fixed-cadence tick loop.
//!
//! One control flow drives everything. Each iteration checks for input,
//! dispatches at most one line, bumps the tick counter, runs the tick hook
//! and sleeps. Hooks run synchronously, so there is never more than one
//! active at a time.

mod context;

pub use context::{ConsoleContext, RunState};

use std::io::Write;
use std::time::Duration;

use tickline_types::config::ConsoleConfig;
use tickline_types::error::Result;

use crate::assembler::{Drained, LineAssembler};
use crate::handler::CommandHandler;
use crate::stream::InputStream;
use crate::tokenizer::{command_name, tokenize};

/// Why [`Console::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A hook or the owner called terminate.
    Requested,
    /// The input stream ended and `terminate_on_eof` is set.
    EndOfInput,
}

/// Interactive line console over an [`InputStream`].
pub struct Console<S: InputStream, H: CommandHandler> {
    input: LineAssembler<S>,
    handler: H,
    ctx: ConsoleContext,
    tick_interval: Duration,
    terminate_on_eof: bool,
    exit_reason: ExitReason,
    /// Set once the assembler has reported `Drained::Closed`.
    input_closed: bool,
    shut_down: bool,
}

impl<S: InputStream, H: CommandHandler> Console<S, H> {
    /// Build a console and print the first prompt.
    pub fn new(config: &ConsoleConfig, stream: S, handler: H, out: Box<dyn Write>) -> Self {
        let mut ctx = ConsoleContext::new(config.shortname.clone(), out);
        ctx.render_prompt();
        log::debug!(
            "console \"{}\" ready (tick {} ms)",
            config.shortname,
            config.tick_interval_ms
        );
        Self {
            input: LineAssembler::new(stream, config.max_line_len),
            handler,
            ctx,
            tick_interval: config.tick_interval(),
            terminate_on_eof: config.terminate_on_eof,
            exit_reason: ExitReason::Requested,
            input_closed: false,
            shut_down: false,
        }
    }

    /// Run until terminated.
    ///
    /// On return the stream is closed and the prompt erased. Stream errors
    /// end the loop the same way before being returned.
    pub fn run(&mut self) -> Result<ExitReason> {
        while self.ctx.state() == RunState::Running {
            if let Err(e) = self.step() {
                log::warn!("console stopping on input error: {e}");
                if let Err(close_err) = self.shutdown() {
                    log::warn!("closing input after error failed: {close_err}");
                }
                return Err(e);
            }
            if self.ctx.is_terminated() {
                break;
            }
            std::thread::sleep(self.tick_interval);
        }
        self.shutdown()?;
        Ok(self.exit_reason)
    }

    /// One loop iteration without the trailing sleep.
    pub fn step(&mut self) -> Result<RunState> {
        if self.ctx.is_terminated() {
            return Ok(RunState::Terminated);
        }

        if self.ctx.is_listening() && !self.input_closed && self.input.poll_line_ready()? {
            self.handle_input()?;
            if self.ctx.is_terminated() {
                return Ok(RunState::Terminated);
            }
        }

        self.ctx.count_tick();
        self.handler.on_tick(&mut self.ctx);
        Ok(self.ctx.state())
    }

    fn handle_input(&mut self) -> Result<()> {
        match self.input.drain_one_line()? {
            Drained::Line(line) => self.handle_line(&line),
            Drained::Pending => {},
            Drained::Closed => {
                self.input_closed = true;
                if self.terminate_on_eof {
                    log::info!("input closed; terminating console");
                    self.exit_reason = ExitReason::EndOfInput;
                    self.ctx.terminate();
                } else {
                    log::info!("input closed; console keeps ticking");
                }
            },
        }
        Ok(())
    }

    /// Tokenize and dispatch one line, then redraw the prompt.
    ///
    /// Blank lines skip dispatch.
    pub fn handle_line(&mut self, line: &str) {
        let tokens = tokenize(line);
        if let Some(name) = command_name(&tokens) {
            log::debug!("dispatching {name} with {} token(s)", tokens.len());
            if !self.handler.dispatch(&name, &tokens, &mut self.ctx) {
                self.ctx.log(&format!("ERROR: Command \"{name}\" not found"));
            }
        }
        if !self.ctx.is_terminated() {
            self.ctx.rerender_prompt();
        }
    }

    /// Stop the loop, close the stream and erase the prompt.
    pub fn terminate(&mut self) -> Result<()> {
        self.ctx.terminate();
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        self.ctx.terminate();
        self.ctx.erase_prompt();
        self.input.close()
    }

    pub fn context(&self) -> &ConsoleContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ConsoleContext {
        &mut self.ctx
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// The input stream being read.
    pub fn stream(&self) -> &S {
        self.input.stream()
    }
}
