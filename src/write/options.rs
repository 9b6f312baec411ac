/// Knobs for [`super::write`] and [`super::canonicalize`] (§6).
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Mirrors the CLI `-d`/`--debug` flag.
    pub debug: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
