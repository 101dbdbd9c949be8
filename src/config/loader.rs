//! Configuration loader for notify-relay
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, Map};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "NOTIFY_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "NOTIFY_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "NOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Keys parsed as comma-separated lists when given through the environment
const LIST_KEYS: &[&str] = &["line.receivers", "plivo.receivers"];

/// Separator between items of a list given through the environment
const LIST_SEPARATOR: char = ',';

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local overrides (optional)
/// 4. `NOTIFY_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    /// Current application environment
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader from `NOTIFY_CONFIG_DIR`,
    /// `NOTIFY_CONFIG_FILE` and `NOTIFY_APP_ENV`
    ///
    /// # Errors
    ///
    /// Returns an error if both `NOTIFY_CONFIG_DIR` and `NOTIFY_CONFIG_FILE` are set,
    /// as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "NOTIFY_CONFIG_DIR and NOTIFY_CONFIG_FILE cannot both be set. \
                 Use NOTIFY_CONFIG_DIR for layered configuration or \
                 NOTIFY_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Create a loader reading a single file, as given by `--config`
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Override the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` (layered mode) or the single file is not found
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // NOTIFY_LINE__CHANNEL_SECRET -> line.channel_secret
        Self::add_env_source(builder)?
            .build()
            .map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    /// `NOTIFY_` prefixed variables, `__` between nested keys; receiver lists
    /// are comma-separated (`NOTIFY_PLIVO__RECEIVERS=+1555,+1666`)
    ///
    /// Values stay strings: phone numbers and tokens keep their `+` and
    /// leading zeros, and bool/integer fields are converted on deserialize.
    fn add_env_source(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let mut vars: Map<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        let mut builder = builder;

        for key in LIST_KEYS {
            let Some(raw) = vars.remove(&list_env_var(key)) else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            builder = builder.set_override(*key, split_list(&raw))?;
        }

        Ok(builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .source(Some(vars)),
        ))
    }
}

/// `line.receivers` -> `NOTIFY_LINE__RECEIVERS`
fn list_env_var(key: &str) -> String {
    format!(
        "{}_{}",
        ENV_PREFIX,
        key.to_uppercase().replace('.', ENV_SEPARATOR)
    )
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifications::DispatchMode;
    use std::fs;
    use tempfile::TempDir;

    use crate::config::test_env::{self, EnvGuard};

    /// Environment variables read by the loader, cleared before each test
    const LOADER_VARS: &[&str] = &[
        CONFIG_DIR_ENV,
        CONFIG_FILE_ENV,
        AppEnvironment::ENV_VAR,
        "NOTIFY_DISPATCH__MODE",
        "NOTIFY_DISPATCH__TIMEOUT_SECONDS",
        "NOTIFY_LINE__RECEIVERS",
        "NOTIFY_PLIVO__ENABLED",
        "NOTIFY_PLIVO__AUTH_ID",
        "NOTIFY_PLIVO__AUTH_TOKEN",
        "NOTIFY_PLIVO__SOURCE",
        "NOTIFY_PLIVO__RECEIVERS",
    ];

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    fn clean_env() -> EnvGuard {
        let mut env = EnvGuard::new();
        for key in LOADER_VARS {
            env.remove(key);
        }
        env
    }

    const DEFAULT_TOML: &str = r#"
[dispatch]
mode = "concurrent"
timeout_seconds = 15

[line]
enabled = true
channel_secret = "secret"
channel_access_token = "token"
receivers = ["U1"]
"#;

    #[test]
    fn test_new_uses_default_dir() {
        let _lock = test_env::lock();
        let _env = clean_env();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file().is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_mutual_exclusivity_error() {
        let _lock = test_env::lock();
        let mut env = clean_env();
        env.set(CONFIG_DIR_ENV, "/etc/notify");
        env.set(CONFIG_FILE_ENV, "/etc/notify/relay.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("NOTIFY_CONFIG_DIR"));
                assert!(msg.contains("NOTIFY_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _lock = test_env::lock();
        let mut env = clean_env();

        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let result = ConfigLoader::new().unwrap().load();
        match result {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_layered_environment_file_overrides_default() {
        let _lock = test_env::lock();
        let mut env = clean_env();

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", "[dispatch]\nmode = \"sequential\"\n"),
            ("local.toml", "[line]\nreceivers = [\"U9\"]\n"),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");

        assert_eq!(settings.dispatch.mode, DispatchMode::Sequential);
        assert_eq!(settings.dispatch.timeout_seconds, 15);
        assert_eq!(settings.line.receivers, vec!["U9"]);
        assert_eq!(settings.line.channel_secret, "secret");
    }

    #[test]
    fn test_env_vars_have_highest_priority() {
        let _lock = test_env::lock();
        let mut env = clean_env();

        let temp_dir = setup_config_dir(&[("relay.toml", DEFAULT_TOML)]);
        env.set("NOTIFY_DISPATCH__MODE", "sequential");
        env.set("NOTIFY_LINE__RECEIVERS", "U1,U2,U3");

        let settings = ConfigLoader::from_file(temp_dir.path().join("relay.toml"))
            .load()
            .expect("Should load");

        assert_eq!(settings.dispatch.mode, DispatchMode::Sequential);
        assert_eq!(settings.line.receivers, vec!["U1", "U2", "U3"]);
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let _lock = test_env::lock();
        let _env = clean_env();

        let temp_dir = setup_config_dir(&[(
            "relay.toml",
            "[plivo]\nenabled = true\nauth_id = \"MA\"\nauth_token = \"t\"\n",
        )]);

        let result = ConfigLoader::from_file(temp_dir.path().join("relay.toml")).load();
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "plivo.source"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    const PLIVO_TOML: &str = r#"
[plivo]
enabled = false
auth_id = "MA123"
auth_token = "from-file"
source = "+10000000000"
"#;

    #[test]
    fn test_single_phone_receiver_from_env() {
        let _lock = test_env::lock();
        let mut env = clean_env();

        let temp_dir = setup_config_dir(&[("relay.toml", PLIVO_TOML)]);
        env.set("NOTIFY_PLIVO__RECEIVERS", "+14155550100");

        let settings = ConfigLoader::from_file(temp_dir.path().join("relay.toml"))
            .load()
            .expect("Should load");

        assert_eq!(settings.plivo.receivers, vec!["+14155550100"]);
    }

    #[test]
    fn test_numeric_strings_from_env_are_kept_verbatim() {
        let _lock = test_env::lock();
        let mut env = clean_env();

        let temp_dir = setup_config_dir(&[("relay.toml", PLIVO_TOML)]);
        env.set("NOTIFY_PLIVO__SOURCE", "+14155550000");
        env.set("NOTIFY_PLIVO__AUTH_ID", "0042");
        env.set("NOTIFY_PLIVO__AUTH_TOKEN", "00123");
        env.set("NOTIFY_PLIVO__RECEIVERS", "+14155550100,0987");

        let settings = ConfigLoader::from_file(temp_dir.path().join("relay.toml"))
            .load()
            .expect("Should load");

        assert_eq!(settings.plivo.source, "+14155550000");
        assert_eq!(settings.plivo.auth_id, "0042");
        assert_eq!(settings.plivo.auth_token, "00123");
        assert_eq!(settings.plivo.receivers, vec!["+14155550100", "0987"]);
    }

    #[test]
    fn test_bool_and_integer_fields_from_env() {
        let _lock = test_env::lock();
        let mut env = clean_env();

        let temp_dir = setup_config_dir(&[("relay.toml", PLIVO_TOML)]);
        env.set("NOTIFY_PLIVO__ENABLED", "true");
        env.set("NOTIFY_DISPATCH__TIMEOUT_SECONDS", "45");

        let settings = ConfigLoader::from_file(temp_dir.path().join("relay.toml"))
            .load()
            .expect("Should load");

        assert!(settings.plivo.enabled);
        assert_eq!(settings.dispatch.timeout_seconds, 45);
    }

    #[test]
    fn test_list_helpers() {
        assert_eq!(list_env_var("plivo.receivers"), "NOTIFY_PLIVO__RECEIVERS");
        assert_eq!(split_list(" U1, U2,,U3 "), vec!["U1", "U2", "U3"]);
    }

    #[test]
    fn test_from_file_missing() {
        let _lock = test_env::lock();
        let _env = clean_env();
        let result = ConfigLoader::from_file("/nonexistent/relay.toml").load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
