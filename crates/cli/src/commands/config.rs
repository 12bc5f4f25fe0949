use std::fs;
use std::path::Path;

use toml::Value;
use vitrina_core::config::{
    env_value, resolve_config_path, AppConfig, LoadOptions, CURRENCY_SYMBOL_ENV, LOG_FORMAT_ENV,
    LOG_LEVEL_ENV, SEED_ENV,
};

use crate::commands::CommandResult;

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    CommandResult::ok(describe(&config, &options))
}

pub fn describe(config: &AppConfig, options: &LoadOptions) -> String {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;
    let source = |key_path: &str, flag: Option<&str>, env_keys: &[&'static str]| match flag {
        Some(flag) => format!("flag ({flag})"),
        None => {
            field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
        }
    };

    let seed = config.catalog.seed.map(|seed| seed.to_string());
    let rows = [
        (
            "catalog.currency_symbol",
            config.catalog.currency_symbol.clone(),
            source(
                "catalog.currency_symbol",
                overrides.currency_symbol.as_ref().map(|_| "--currency"),
                CURRENCY_SYMBOL_ENV,
            ),
        ),
        (
            "catalog.seed",
            seed.unwrap_or_else(|| "<unset>".to_string()),
            source("catalog.seed", overrides.seed.map(|_| "--seed"), SEED_ENV),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            source(
                "logging.level",
                overrides.log_level.as_ref().map(|_| "--log-level"),
                LOG_LEVEL_ENV,
            ),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            source("logging.format", overrides.log_format.map(|_| "--log-format"), LOG_FORMAT_ENV),
        ),
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    lines.extend(rows.into_iter().map(|(key, value, source)| render_line(key, &value, source)));
    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&'static str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some((env_key, _)) = env_value(env_keys) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source, render_line};

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: Value = "[catalog]\nseed = 3\n".parse().unwrap();

        assert!(contains_path(&doc, "catalog.seed"));
        assert!(!contains_path(&doc, "catalog.currency_symbol"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_source_is_reported_when_key_present() {
        let doc: Value = "[logging]\nlevel = \"warn\"\n".parse().unwrap();

        let source = field_source("logging.level", &["VITRINA_TEST_UNUSED_KEY"], Some(&doc), None);

        assert_eq!(source, "file (config file)");
        assert_eq!(
            field_source("catalog.seed", &["VITRINA_TEST_UNUSED_KEY"], Some(&doc), None),
            "default"
        );
    }

    #[test]
    fn lines_include_value_and_source() {
        assert_eq!(
            render_line("catalog.seed", "9", "default".to_string()),
            "- catalog.seed = 9 (source: default)"
        );
    }
}
