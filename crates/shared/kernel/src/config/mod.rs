use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// Default configuration file, looked up without extension in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "formwork";

/// Prefix of environment overrides (`FORMWORK__LOG__LEVEL=debug`).
pub const ENV_PREFIX: &str = "FORMWORK";

/// Custom error type for config loading.
#[formwork_derive::formwork_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file layered under environment overrides.
///
/// 1. **File**: `path` when given (must exist), otherwise an optional
///    `formwork.{toml,json,yaml}` in the working directory.
/// 2. **Environment**: variables prefixed with `FORMWORK__`; nested keys are
///    separated by double underscores (`FORMWORK__LOG__JSON=true` sets `log.json`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is
/// malformed, or the merged values do not fit `T`.
///
/// # Example
/// ```rust
/// use formwork_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     verbose: bool,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local".as_ref())).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = path.map_or_else(
        || File::with_name(DEFAULT_CONFIG_FILE).required(false),
        |p| File::from(p).required(true),
    );

    debug!(
        path = %path.map_or_else(|| DEFAULT_CONFIG_FILE.to_owned(), |p| p.display().to_string()),
        "loading config"
    );

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
