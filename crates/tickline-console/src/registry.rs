//! Name-keyed command registry usable as a [`CommandHandler`].

use std::collections::HashMap;

use tickline_types::error::Result;

use crate::console::ConsoleContext;
use crate::handler::CommandHandler;

/// A single executable command.
pub trait Command {
    /// The command word. Matched case-insensitively.
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "say \<text...\>").
    fn usage(&self) -> &str;

    /// Run with the arguments that followed the command word.
    fn execute(&self, args: &[&str], ctx: &mut ConsoleContext) -> Result<()>;
}

/// Periodic work hung off the console's tick.
pub type TickHook = Box<dyn FnMut(&mut ConsoleContext)>;

/// Registry of available commands with dispatch.
///
/// Keys are stored upper-cased, the same form the console passes as the
/// dispatch name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
    tick_hooks: Vec<TickHook>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let key = cmd.name().to_ascii_uppercase();
        if self.commands.insert(key, cmd).is_some() {
            log::debug!("command replaced during registration");
        }
    }

    /// Run `hook` on every tick, in registration order.
    pub fn add_tick_hook(&mut self, hook: impl FnMut(&mut ConsoleContext) + 'static) {
        self.tick_hooks.push(Box::new(hook));
    }

    /// Whether a command answers to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_ascii_uppercase())
    }

    /// Sorted (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<_> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by(|a, b| a.0.cmp(b.0));
        cmds
    }

    /// Command names starting with `partial`, case-insensitive, sorted.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let prefix = partial.to_ascii_uppercase();
        let mut matches: Vec<String> = self
            .commands
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, cmd)| cmd.name().to_string())
            .collect();
        matches.sort();
        matches
    }

    /// Usage line for `name`, if registered.
    pub fn usage(&self, name: &str) -> Option<&str> {
        self.commands
            .get(&name.to_ascii_uppercase())
            .map(|c| c.usage())
    }
}

impl CommandHandler for CommandRegistry {
    fn dispatch(&mut self, name: &str, tokens: &[String], ctx: &mut ConsoleContext) -> bool {
        let Some(cmd) = self.commands.get(&name.to_ascii_uppercase()) else {
            return false;
        };
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        if let Err(e) = cmd.execute(&args, ctx) {
            log::debug!("command {name} failed: {e}");
            ctx.log(&format!("ERROR: {e}"));
        }
        true
    }

    fn on_tick(&mut self, ctx: &mut ConsoleContext) {
        for hook in &mut self.tick_hooks {
            hook(ctx);
        }
        ctx.reset_ticks();
    }
}
