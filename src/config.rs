use crate::error::{value_error, Result};
pub use crate::executor::PanicStrategy;

/// Upper bound on team size.
pub const MAX_THREADS: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: Option<usize>,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    pub pin_workers: bool,
    pub panic_strategy: PanicStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "weft-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            pin_workers: false,
            panic_strategy: PanicStrategy::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n == 0 {
                return Err(value_error().with("num_threads must be > 0"));
            }
            if n > MAX_THREADS {
                return Err(value_error()
                    .with("num_threads too large (max ")
                    .with(MAX_THREADS)
                    .with(")"));
            }
        }

        if self.stack_size == Some(0) {
            return Err(value_error().with("stack_size must be > 0"));
        }

        if self.thread_name_prefix.contains('\0') {
            return Err(value_error().with("thread_name_prefix must not contain nul bytes"));
        }

        Ok(())
    }

    /// Team size: the configured count, or one per logical CPU.
    pub fn worker_threads(&self) -> usize {
        self.num_threads
            .unwrap_or_else(num_cpus::get)
            .clamp(1, MAX_THREADS)
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn pin_workers(mut self, pin: bool) -> Self {
        self.config.pin_workers = pin;
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
