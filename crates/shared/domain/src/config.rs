use serde::Deserialize;
use std::path::PathBuf;

/// Settings for the `formwork` command line tool.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub log: LogConfig,
    pub output: OutputConfig,
}

/// Logging knobs forwarded to the logger builder.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`, `off`.
    pub level: String,
    /// Module directives such as `formwork_contract=trace`.
    pub env_filter: Option<String>,
    pub console: bool,
    /// Rolling log files are written here when set.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

/// Rendering of command results.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

// --- Default ---

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            env_filter: None,
            console: true,
            directory: None,
            json: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}
