use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_OUTPUT_PATH: &str = "capture.txt";
pub const DEFAULT_RESOLVE_TIMEOUT_MS: u64 = 1000;

const ENV_INTERFACE: &str = "PACKET_CAPTURE_INTERFACE";
const ENV_RESOLVE_TIMEOUT_MS: &str = "PACKET_CAPTURE_RESOLVE_TIMEOUT_MS";
const ENV_NO_RESOLVE: &str = "PACKET_CAPTURE_NO_RESOLVE";

/// How endpoint addresses are turned into names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Perform reverse lookups at all
    pub enabled: bool,
    /// Maximum wait per lookup; `None` blocks inline until the lookup returns
    pub timeout: Option<Duration>,
    /// Cache lookup results for this long; `None` disables the cache
    pub cache_ttl: Option<Duration>,
}

impl ResolverConfig {
    /// Never query the name service; every endpoint uses its address.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: resolve_timeout_from_millis(DEFAULT_RESOLVE_TIMEOUT_MS),
            cache_ttl: None,
        }
    }
}

/// Resolve timeout from milliseconds; zero means unbounded inline lookups.
pub fn resolve_timeout_from_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Validated settings for one capture run.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// How long to capture
    pub duration: Duration,
    /// Record log path
    pub output: PathBuf,
    /// Append to an existing log instead of truncating it
    pub append: bool,
    /// Interface to capture on; `None` picks the first suitable one
    pub interface: Option<String>,
    pub resolver: ResolverConfig,
}

impl CaptureConfig {
    /// Create a configuration, rejecting non-positive durations.
    pub fn new(duration_secs: i64, output: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        if duration_secs <= 0 {
            return Err(ConfigError::InvalidDuration(duration_secs));
        }

        Ok(Self {
            duration: Duration::from_secs(duration_secs as u64),
            output: output.into(),
            append: false,
            interface: None,
            resolver: ResolverConfig::default(),
        })
    }

    pub fn with_interface(mut self, interface: Option<String>) -> Self {
        self.interface = interface;
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    /// Apply overrides from `PACKET_CAPTURE_*` environment variables.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_INTERFACE) {
            let val = val.trim();
            if !val.is_empty() {
                self.interface = Some(val.to_string());
            }
        }

        if let Some(val) = lookup(ENV_RESOLVE_TIMEOUT_MS) {
            let ms: u64 = val.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_RESOLVE_TIMEOUT_MS.to_string(),
                value: val.clone(),
            })?;
            self.resolver.timeout = resolve_timeout_from_millis(ms);
        }

        if let Some(val) = lookup(ENV_NO_RESOLVE) {
            match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.resolver.enabled = false,
                "0" | "false" | "no" | "" => {}
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_NO_RESOLVE.to_string(),
                        value: val,
                    })
                }
            }
        }

        Ok(self)
    }

    /// Open the record log for writing.
    pub fn open_sink(&self) -> Result<BufWriter<File>, ConfigError> {
        let mut options = OpenOptions::new();
        options.create(true);
        if self.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options.open(&self.output).map_err(|source| ConfigError::Sink {
            path: self.output.clone(),
            source,
        })?;

        Ok(BufWriter::new(file))
    }
}
