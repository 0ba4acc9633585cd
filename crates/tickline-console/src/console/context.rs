//! State shared with command handlers during dispatch and tick hooks.

use std::io::Write;

/// Where the loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
}

/// Everything the console owns except the input stream and the handler,
/// split out so hooks can borrow it while the console holds the rest.
pub struct ConsoleContext {
    shortname: String,
    out: Box<dyn Write>,
    listening: bool,
    ticks: u64,
    state: RunState,
}

impl ConsoleContext {
    pub(crate) fn new(shortname: String, out: Box<dyn Write>) -> Self {
        Self {
            shortname,
            out,
            listening: true,
            ticks: 0,
            state: RunState::Running,
        }
    }

    /// The prompt label.
    pub fn shortname(&self) -> &str {
        &self.shortname
    }

    /// Write `"<shortname>> <message>"` as its own output line.
    pub fn log(&mut self, message: &str) {
        let line = format!("{}> {message}\n", self.shortname);
        self.write_out(&line);
    }

    /// Start or stop draining input. Ticks continue either way.
    pub fn set_listening(&mut self, listening: bool) {
        if self.listening != listening {
            log::debug!("console listening: {listening}");
        }
        self.listening = listening;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Loop iterations since the counter was last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset_ticks(&mut self) {
        self.ticks = 0;
    }

    /// Ask the loop to stop once the current hook returns.
    pub fn terminate(&mut self) {
        self.state = RunState::Terminated;
    }

    pub fn is_terminated(&self) -> bool {
        self.state == RunState::Terminated
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn count_tick(&mut self) {
        self.ticks += 1;
    }

    /// Initial prompt, printed once at construction.
    pub(crate) fn render_prompt(&mut self) {
        let prompt = format!("{}> ", self.shortname);
        self.write_out(&prompt);
    }

    /// Redraw the prompt over the start of the current line.
    pub(crate) fn rerender_prompt(&mut self) {
        let prompt = format!("\r{}> ", self.shortname);
        self.write_out(&prompt);
    }

    /// Blank out the prompt on exit.
    pub(crate) fn erase_prompt(&mut self) {
        let blank = format!("\r{}", " ".repeat(self.shortname.chars().count() + 1));
        self.write_out(&blank);
    }

    fn write_out(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            log::warn!("console output failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Sink {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn ctx(shortname: &str) -> (Sink, ConsoleContext) {
        let sink = Sink::default();
        let ctx = ConsoleContext::new(shortname.to_string(), Box::new(sink.clone()));
        (sink, ctx)
    }

    #[test]
    fn log_prefixes_shortname() {
        let (sink, mut ctx) = ctx("srv");
        ctx.log("ready");
        assert_eq!(sink.text(), "srv> ready\n");
    }

    #[test]
    fn prompts() {
        let (sink, mut ctx) = ctx("db");
        ctx.render_prompt();
        ctx.rerender_prompt();
        assert_eq!(sink.text(), "db> \rdb> ");
    }

    #[test]
    fn erase_covers_label_and_marker() {
        let (sink, mut ctx) = ctx("abc");
        ctx.erase_prompt();
        assert_eq!(sink.text(), "\r    ");
    }

    #[test]
    fn ticks_count_and_reset() {
        let (_, mut ctx) = ctx("");
        ctx.count_tick();
        ctx.count_tick();
        assert_eq!(ctx.ticks(), 2);
        ctx.reset_ticks();
        assert_eq!(ctx.ticks(), 0);
    }

    #[test]
    fn terminate_flips_state() {
        let (_, mut ctx) = ctx("");
        assert_eq!(ctx.state(), RunState::Running);
        ctx.terminate();
        assert!(ctx.is_terminated());
    }

    #[test]
    fn listening_defaults_on() {
        let (_, mut ctx) = ctx("");
        assert!(ctx.is_listening());
        ctx.set_listening(false);
        assert!(!ctx.is_listening());
    }

    #[test]
    fn broken_output_does_not_panic() {
        let mut ctx = ConsoleContext::new("x".into(), Box::new(Broken));
        ctx.log("lost");
        ctx.rerender_prompt();
    }
}
