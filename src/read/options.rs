/// Knobs for [`super::read`] (§6). Currently only controls diagnostic
/// verbosity; parsing itself has no optional dialects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Mirrors the CLI `-d`/`--debug` flag: emit `log::debug!` traces of
    /// every token the state machine consumes.
    pub debug: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
