//! Layered settings: built-in defaults, then `vitrina.toml`, then `VITRINA_*`
//! variables, then values given on the command line.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["vitrina.toml", "config/vitrina.toml"];

pub const CURRENCY_SYMBOL_ENV: &[&str] = &["VITRINA_CATALOG_CURRENCY_SYMBOL"];
pub const SEED_ENV: &[&str] = &["VITRINA_CATALOG_SEED"];
pub const LOG_LEVEL_ENV: &[&str] = &["VITRINA_LOGGING_LEVEL", "VITRINA_LOG_LEVEL"];
pub const LOG_FORMAT_ENV: &[&str] = &["VITRINA_LOGGING_FORMAT", "VITRINA_LOG_FORMAT"];

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub currency_symbol: String,
    /// Fixed seed for predefined picks; `None` seeds from the OS.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Values passed explicitly by the caller; they win over every other layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub currency_symbol: Option<String>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// A file named here must exist; without it the default candidates are
    /// searched and skipped when absent.
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file `{0}` does not exist")]
    MissingConfigFile(PathBuf),
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("config file refers to `${{{var}}}` but that variable is not set")]
    UnsetVariable { var: String },
    #[error("config file has a `${{` reference without a closing `}}`")]
    UnterminatedInterpolation,
    #[error("`{key}` has an unusable value `{value}`")]
    InvalidEnvValue { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { currency_symbol: "$".to_string(), seed: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            if !path.is_file() {
                return Err(ConfigError::MissingConfigFile(path));
            }
            config.merge_file(read_file_layer(&path)?);
        }
        config.merge_env()?;
        config.merge_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn merge_file(&mut self, layer: FileLayer) {
        let FileLayer { catalog, logging } = layer;
        if let Some(catalog) = catalog {
            self.catalog.currency_symbol =
                catalog.currency_symbol.unwrap_or_else(|| self.catalog.currency_symbol.clone());
            self.catalog.seed = catalog.seed.or(self.catalog.seed);
        }
        if let Some(logging) = logging {
            self.logging.level = logging.level.unwrap_or_else(|| self.logging.level.clone());
            self.logging.format = logging.format.unwrap_or(self.logging.format);
        }
    }

    fn merge_env(&mut self) -> Result<(), ConfigError> {
        if let Some((_, symbol)) = env_value(CURRENCY_SYMBOL_ENV) {
            self.catalog.currency_symbol = symbol;
        }
        if let Some((key, seed)) = env_value(SEED_ENV) {
            self.catalog.seed = Some(parse_env(key, &seed)?);
        }
        if let Some((_, level)) = env_value(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
        if let Some((key, format)) = env_value(LOG_FORMAT_ENV) {
            self.logging.format = parse_env(key, &format)?;
        }
        Ok(())
    }

    fn merge_overrides(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides { currency_symbol, seed, log_level, log_format } = overrides;
        if let Some(symbol) = currency_symbol {
            self.catalog.currency_symbol = symbol;
        }
        self.catalog.seed = seed.or(self.catalog.seed);
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        self.logging.format = log_format.unwrap_or(self.logging.format);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let symbol = &self.catalog.currency_symbol;
        if symbol.chars().count() > 4 || symbol.chars().any(char::is_control) {
            return Err(ConfigError::Validation(
                "catalog.currency_symbol must be at most 4 printable characters".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join("|")
            )));
        }
        Ok(())
    }
}

/// The file `load` reads: the explicit path when one is given, otherwise the
/// first existing candidate.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => CONFIG_FILE_CANDIDATES.iter().map(PathBuf::from).find(|path| path.is_file()),
    }
}

/// First of `keys` set to a non-blank value, with the key that supplied it.
pub fn env_value(keys: &[&'static str]) -> Option<(&'static str, String)> {
    keys.iter().find_map(|key| {
        env::var(key).ok().filter(|value| !value.trim().is_empty()).map(|value| (*key, value))
    })
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn read_file_layer(path: &Path) -> Result<FileLayer, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    let expanded = expand_env_references(&raw)?;
    toml::from_str(&expanded)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Replaces every `${NAME}` with the value of that variable.
fn expand_env_references(raw: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let reference = &rest[start + 2..];
        let end = reference.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &reference[..end];
        let value =
            env::var(var).map_err(|_| ConfigError::UnsetVariable { var: var.to_string() })?;
        expanded.push_str(&value);
        rest = &reference[end + 1..];
    }
    expanded.push_str(rest);

    Ok(expanded)
}

#[derive(Debug, Default, Deserialize)]
struct FileLayer {
    catalog: Option<CatalogLayer>,
    logging: Option<LoggingLayer>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogLayer {
    currency_symbol: Option<String>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingLayer {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, PoisonError};

    use tempfile::TempDir;

    use super::{
        expand_env_references, AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat,
        CURRENCY_SYMBOL_ENV, LOG_FORMAT_ENV, LOG_LEVEL_ENV, SEED_ENV,
    };

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Runs `body` with only `vars` set among the variables the loader reads.
    fn with_vars<T>(vars: &[(&str, &str)], body: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let managed: Vec<&str> = [CURRENCY_SYMBOL_ENV, SEED_ENV, LOG_LEVEL_ENV, LOG_FORMAT_ENV]
            .concat()
            .into_iter()
            .chain(vars.iter().map(|(key, _)| *key))
            .collect();
        let saved: Vec<_> = managed.iter().map(|key| (*key, env::var(key).ok())).collect();

        for key in &managed {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = body();

        for (key, value) in saved {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
        result
    }

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("vitrina.toml");
        fs::write(&path, contents).expect("config file should be writable");
        path
    }

    fn load_from(path: PathBuf) -> Result<AppConfig, ConfigError> {
        AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = with_vars(&[], || AppConfig::load(LoadOptions::default())).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.catalog.currency_symbol, "$");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn file_values_expand_env_references() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[catalog]
currency_symbol = "${VITRINA_TEST_SYMBOL}"
seed = 42
"#,
        );

        let config = with_vars(&[("VITRINA_TEST_SYMBOL", "€")], || load_from(path)).unwrap();

        assert_eq!(config.catalog.currency_symbol, "€");
        assert_eq!(config.catalog.seed, Some(42));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn unset_reference_names_the_variable() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[logging]\nlevel = \"${VITRINA_TEST_NEVER_SET}\"\n");

        let error = with_vars(&[], || load_from(path)).unwrap_err();

        let ConfigError::UnsetVariable { var } = &error else {
            panic!("expected an unset variable error, got {error:?}");
        };
        assert_eq!(var, "VITRINA_TEST_NEVER_SET");
    }

    #[test]
    fn unterminated_reference_is_rejected() {
        assert!(matches!(
            expand_env_references("symbol = \"${OPEN\""),
            Err(ConfigError::UnterminatedInterpolation)
        ));
        assert_eq!(expand_env_references("no references").unwrap(), "no references");
    }

    #[test]
    fn short_logging_aliases_are_read() {
        let vars = [("VITRINA_LOG_LEVEL", "warn"), ("VITRINA_LOG_FORMAT", "pretty")];
        let config = with_vars(&vars, || AppConfig::load(LoadOptions::default())).unwrap();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn each_layer_beats_the_one_below() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[catalog]
currency_symbol = "€"
seed = 1

[logging]
level = "warn"
format = "json"
"#,
        );
        let options = LoadOptions {
            config_path: Some(path),
            overrides: ConfigOverrides {
                currency_symbol: Some("¥".to_string()),
                log_level: Some("debug".to_string()),
                ..ConfigOverrides::default()
            },
        };

        let config = with_vars(
            &[("VITRINA_CATALOG_SEED", "7"), ("VITRINA_CATALOG_CURRENCY_SYMBOL", "£")],
            || AppConfig::load(options),
        )
        .unwrap();

        assert_eq!(config.catalog.currency_symbol, "¥");
        assert_eq!(config.catalog.seed, Some(7));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn malformed_env_seed_names_the_variable() {
        let error = with_vars(&[("VITRINA_CATALOG_SEED", "not-a-number")], || {
            AppConfig::load(LoadOptions::default())
        })
        .unwrap_err();

        let ConfigError::InvalidEnvValue { key, value } = &error else {
            panic!("expected an invalid env value error, got {error:?}");
        };
        assert_eq!(key, "VITRINA_CATALOG_SEED");
        assert_eq!(value, "not-a-number");
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let options = LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("chatty".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        };

        let error = with_vars(&[], || AppConfig::load(options)).unwrap_err();

        assert!(error.to_string().contains("logging.level must be one of"), "{error}");
    }

    #[test]
    fn long_currency_symbol_fails_validation() {
        let options = LoadOptions {
            overrides: ConfigOverrides {
                currency_symbol: Some("DOLLARS".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        };

        let error = with_vars(&[], || AppConfig::load(options)).unwrap_err();

        assert!(error.to_string().contains("catalog.currency_symbol"), "{error}");
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let error = with_vars(&[], || load_from(path.clone())).unwrap_err();

        assert!(matches!(error, ConfigError::MissingConfigFile(ref missing) if missing == &path));
    }
}
