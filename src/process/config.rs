use crate::process::error::SpawnError;

/// Default size of a single read performed by an output monitor.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8192;

/// Default grace period given to output monitors after the child exits.
pub const DEFAULT_DRAIN_TIMEOUT_MS: u64 = 250;

/// Configuration for spawning a child process
///
/// Built with chained setters and checked with [`SpawnConfig::validate`]
/// before any OS resource is created.
///
/// # Examples
///
/// ```rust
/// use tcrm_process::process::config::SpawnConfig;
///
/// let config = SpawnConfig::new("grep -n todo src/lib.rs")
///     .working_dir(".")
///     .env_var("LC_ALL", "C")
///     .monitor_stdout(true);
///
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnConfig {
    /// Command line, split with shell word rules on Unix and handed to
    /// `%COMSPEC% /c` on Windows
    pub command: String,

    /// Working directory for the child
    pub working_dir: Option<String>,

    /// Ordered `KEY=VALUE` entries. When present they replace the inherited
    /// environment entirely.
    pub env: Option<Vec<String>>,

    /// Deliver stdout chunks as events instead of leaving them for manual reads
    pub monitor_stdout: bool,

    /// Deliver stderr chunks as events
    pub monitor_stderr: bool,

    /// Upper bound for a single monitor read
    pub read_chunk_size: usize,

    /// How long monitors may keep draining output after the child exited
    pub drain_timeout_ms: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            command: String::new(),
            working_dir: None,
            env: None,
            monitor_stdout: false,
            monitor_stderr: false,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            drain_timeout_ms: DEFAULT_DRAIN_TIMEOUT_MS,
        }
    }
}

impl SpawnConfig {
    pub fn new(command: impl Into<String>) -> Self {
        SpawnConfig {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replaces the environment with the given `KEY=VALUE` entries.
    pub fn env<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = Some(entries.into_iter().map(Into::into).collect());
        self
    }

    /// Appends one variable to the explicit environment, creating it if needed.
    pub fn env_var(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .get_or_insert_with(Vec::new)
            .push(format!("{}={}", key.as_ref(), value.as_ref()));
        self
    }

    pub fn monitor_stdout(mut self, b: bool) -> Self {
        self.monitor_stdout = b;
        self
    }

    pub fn monitor_stderr(mut self, b: bool) -> Self {
        self.monitor_stderr = b;
        self
    }

    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }

    pub fn drain_timeout_ms(mut self, timeout: u64) -> Self {
        self.drain_timeout_ms = timeout;
        self
    }

    /// Iterates over the explicit environment as `(key, value)` pairs.
    ///
    /// Entries are split at the first `=`; entries without one are skipped,
    /// [`SpawnConfig::validate`] rejects them beforehand.
    pub fn env_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env
            .iter()
            .flatten()
            .filter_map(|entry| entry.split_once('='))
    }

    pub fn validate(&self) -> Result<(), SpawnError> {
        const MAX_COMMAND_LEN: usize = 4096;
        const MAX_WORKING_DIR_LEN: usize = 4096;
        const MAX_ENV_ENTRY_LEN: usize = 8192;

        // Validate command
        if self.command.trim().is_empty() {
            return Err(SpawnError::InvalidConfiguration(
                "Command cannot be empty".to_string(),
            ));
        }
        if self.command.contains('\0') {
            return Err(SpawnError::InvalidConfiguration(
                "Command cannot contain null bytes".to_string(),
            ));
        }
        if self.command.len() > MAX_COMMAND_LEN {
            return Err(SpawnError::InvalidConfiguration(
                "Command length exceeds maximum allowed length".to_string(),
            ));
        }

        // Validate working directory
        if let Some(dir) = &self.working_dir {
            if dir.contains('\0') {
                return Err(SpawnError::InvalidConfiguration(
                    "Working directory cannot contain null bytes".to_string(),
                ));
            }
            if dir.len() > MAX_WORKING_DIR_LEN {
                return Err(SpawnError::InvalidConfiguration(
                    "Working directory path exceeds maximum length".to_string(),
                ));
            }
            let path = std::path::Path::new(dir);
            if !path.exists() {
                return Err(SpawnError::InvalidConfiguration(format!(
                    "Working directory '{}' does not exist",
                    dir
                )));
            }
            if !path.is_dir() {
                return Err(SpawnError::InvalidConfiguration(format!(
                    "Working directory '{}' is not a directory",
                    dir
                )));
            }
        }

        // Validate environment entries
        if let Some(env) = &self.env {
            for entry in env {
                let Some((key, _)) = entry.split_once('=') else {
                    return Err(SpawnError::InvalidConfiguration(format!(
                        "Environment entry '{}' must have the form KEY=VALUE",
                        entry
                    )));
                };
                if key.is_empty() {
                    return Err(SpawnError::InvalidConfiguration(format!(
                        "Environment entry '{}' has an empty key",
                        entry
                    )));
                }
                if entry.contains('\0') {
                    return Err(SpawnError::InvalidConfiguration(format!(
                        "Environment variable '{}' cannot contain null bytes",
                        key
                    )));
                }
                if entry.len() > MAX_ENV_ENTRY_LEN {
                    return Err(SpawnError::InvalidConfiguration(format!(
                        "Environment variable '{}' exceeds maximum length",
                        key
                    )));
                }
            }
        }

        if self.read_chunk_size == 0 {
            return Err(SpawnError::InvalidConfiguration(
                "Read chunk size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Which child output stream a chunk came from.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamSource {
    #[default]
    Stdout = 0,
    Stderr = 1,
}
