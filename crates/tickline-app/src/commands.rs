//! Demo command set for the stdin console.

use std::cell::Cell;
use std::rc::Rc;

use tickline_console::{
    Command, CommandHandler, CommandRegistry, ConsoleContext, ConsoleError, Result,
};

/// Registry plus the built-ins that need to see the registry itself.
pub struct AppHandler {
    registry: CommandRegistry,
    total_ticks: Rc<Cell<u64>>,
}

impl AppHandler {
    pub fn new() -> Self {
        let total_ticks = Rc::new(Cell::new(0u64));
        let resume_in = Rc::new(Cell::new(0u64));

        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCmd));
        registry.register(Box::new(UptimeCmd {
            total_ticks: Rc::clone(&total_ticks),
        }));
        registry.register(Box::new(PauseCmd {
            resume_in: Rc::clone(&resume_in),
        }));
        registry.register(Box::new(QuitCmd { name: "quit" }));
        registry.register(Box::new(QuitCmd { name: "exit" }));

        let counter = Rc::clone(&total_ticks);
        registry.add_tick_hook(move |_| counter.set(counter.get() + 1));
        registry.add_tick_hook(move |ctx| resume_tick(&resume_in, ctx));

        Self {
            registry,
            total_ticks,
        }
    }

    /// Loop iterations since start.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks.get()
    }

    fn help(&self, args: &[String], ctx: &mut ConsoleContext) {
        if let Some(name) = args.first() {
            match self.registry.usage(name) {
                Some(usage) => ctx.log(&format!("usage: {usage}")),
                None => ctx.log(&format!(
                    "ERROR: Command \"{}\" not found",
                    name.to_ascii_uppercase()
                )),
            }
            return;
        }
        ctx.log("help [command]  Show commands or one command's usage");
        for (name, description) in self.registry.list_commands() {
            ctx.log(&format!("{name:<15} {description}"));
        }
    }
}

impl Default for AppHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for AppHandler {
    fn dispatch(&mut self, name: &str, tokens: &[String], ctx: &mut ConsoleContext) -> bool {
        // Intercept built-ins that need registry access.
        if name == "HELP" {
            self.help(tokens.get(1..).unwrap_or_default(), ctx);
            return true;
        }
        self.registry.dispatch(name, tokens, ctx)
    }

    fn on_tick(&mut self, ctx: &mut ConsoleContext) {
        self.registry.on_tick(ctx);
    }
}

/// Count down a pause and turn input back on when it runs out.
fn resume_tick(resume_in: &Cell<u64>, ctx: &mut ConsoleContext) {
    match resume_in.get() {
        0 => {},
        1 => {
            resume_in.set(0);
            ctx.set_listening(true);
            ctx.log("listening again");
        },
        n => resume_in.set(n - 1),
    }
}

struct EchoCmd;

impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print arguments"
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(&self, args: &[&str], ctx: &mut ConsoleContext) -> Result<()> {
        ctx.log(&args.join(" "));
        Ok(())
    }
}

struct UptimeCmd {
    total_ticks: Rc<Cell<u64>>,
}

impl Command for UptimeCmd {
    fn name(&self) -> &str {
        "uptime"
    }
    fn description(&self) -> &str {
        "Show how many ticks have run"
    }
    fn usage(&self) -> &str {
        "uptime"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ConsoleContext) -> Result<()> {
        ctx.log(&format!("{} ticks", self.total_ticks.get()));
        Ok(())
    }
}

struct PauseCmd {
    resume_in: Rc<Cell<u64>>,
}

impl Command for PauseCmd {
    fn name(&self) -> &str {
        "pause"
    }
    fn description(&self) -> &str {
        "Stop reading input for a number of ticks"
    }
    fn usage(&self) -> &str {
        "pause <ticks>"
    }
    fn execute(&self, args: &[&str], ctx: &mut ConsoleContext) -> Result<()> {
        let ticks = args
            .first()
            .and_then(|t| t.parse::<u64>().ok())
            .filter(|&t| t > 0)
            .ok_or_else(|| ConsoleError::Command(format!("usage: {}", self.usage())))?;
        self.resume_in.set(ticks);
        ctx.set_listening(false);
        ctx.log(&format!("input paused for {ticks} ticks"));
        Ok(())
    }
}

struct QuitCmd {
    name: &'static str,
}

impl Command for QuitCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Close the console"
    }
    fn usage(&self) -> &str {
        self.name
    }
    fn execute(&self, _args: &[&str], ctx: &mut ConsoleContext) -> Result<()> {
        ctx.terminate();
        Ok(())
    }
}
