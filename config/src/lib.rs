//! Load configuration from XDG `config.toml` and project `.env`, then apply it to the
//! process environment with priority: **existing env > .env > XDG**.
//!
//! `hotelier` reads all of its settings (API keys, base URLs, agent options) from
//! the environment, so this crate only has to put the file-based values there
//! before `HotelierConfig::from_env()` runs.

mod dotenv;
mod xdg_toml;

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

pub use xdg_toml::config_file_path;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("unsupported value for {key} in xdg config: only strings, numbers and booleans")]
    XdgValue { key: String },
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Where the applied variables came from. Only names are kept, never values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Keys set from `.env`, sorted.
    pub from_dotenv: Vec<String>,
    /// Keys set from the XDG `config.toml`, sorted.
    pub from_xdg: Vec<String>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.from_dotenv.is_empty() && self.from_xdg.is_empty()
    }
}

/// Source a key's value was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Dotenv,
    Xdg,
}

/// Picks, for every key missing from the environment, the `.env` value over the XDG one.
fn merge_sources(
    is_set: impl Fn(&str) -> bool,
    dotenv: &HashMap<String, String>,
    xdg: &HashMap<String, String>,
) -> Vec<(String, String, Source)> {
    let mut keys: Vec<&String> = dotenv.keys().chain(xdg.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter(|key| !is_set(key))
        .filter_map(|key| {
            dotenv
                .get(key)
                .map(|v| (v, Source::Dotenv))
                .or_else(|| xdg.get(key).map(|v| (v, Source::Xdg)))
                .map(|(v, source)| (key.clone(), v.clone(), source))
        })
        .collect()
}

/// Loads config from XDG `config.toml` and optional project `.env`, then sets environment
/// variables only for keys that are **not** already set.
///
/// * `app_name`: e.g. `"hotelier"`, used for the path `~/.config/<app_name>/config.toml`.
/// * `override_dir`: if `Some`, look for `.env` in this directory instead of the current one.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<LoadReport, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir).map_err(LoadError::DotenvRead)?;

    let mut report = LoadReport::default();
    for (key, value, source) in merge_sources(|k| std::env::var_os(k).is_some(), &dotenv_map, &xdg_map) {
        std::env::set_var(&key, value);
        match source {
            Source::Dotenv => report.from_dotenv.push(key),
            Source::Xdg => report.from_xdg.push(key),
        }
    }
    Ok(report)
}


#[cfg(test)]
mod tests {
    use super::test_env::{lock, restore_var};
    use super::*;
    use std::env;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn merge_prefers_env_then_dotenv_then_xdg() {
        let dotenv = map(&[("MODEL", "gemini-2.5-pro"), ("EXCHANGE_API_KEY", "dot")]);
        let xdg = map(&[("MODEL", "gemini-2.5-flash"), ("AGENT_MAX_STEPS", "6"), ("EXCHANGE_API_KEY", "xdg")]);
        let merged = merge_sources(|k| k == "EXCHANGE_API_KEY", &dotenv, &xdg);
        assert_eq!(
            merged,
            vec![
                ("AGENT_MAX_STEPS".to_string(), "6".to_string(), Source::Xdg),
                ("MODEL".to_string(), "gemini-2.5-pro".to_string(), Source::Dotenv),
            ]
        );
    }

    #[test]
    fn existing_env_wins() {
        let _guard = lock();
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "HOTELIER_CONFIG_TEST_EXISTING=from_dotenv\n",
        )
        .unwrap();
        env::set_var("HOTELIER_CONFIG_TEST_EXISTING", "from_env");

        let report = load_and_apply("config-crate-nonexistent-app-xyz", Some(dotenv_dir.path())).unwrap();
        assert_eq!(env::var("HOTELIER_CONFIG_TEST_EXISTING").as_deref(), Ok("from_env"));
        assert!(report.is_empty());
        env::remove_var("HOTELIER_CONFIG_TEST_EXISTING");
    }

    #[test]
    fn dotenv_overrides_xdg_and_report_names_sources() {
        let _guard = lock();
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join("hotelier");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(
            app_dir.join("config.toml"),
            "[env]\nHOTELIER_CONFIG_TEST_PRIORITY = \"from_xdg\"\nHOTELIER_CONFIG_TEST_XDG_ONLY = 4\n",
        )
        .unwrap();

        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "HOTELIER_CONFIG_TEST_PRIORITY=from_dotenv\n",
        )
        .unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("HOTELIER_CONFIG_TEST_PRIORITY");
        env::remove_var("HOTELIER_CONFIG_TEST_XDG_ONLY");

        let report = load_and_apply("hotelier", Some(dotenv_dir.path())).unwrap();
        let priority = env::var("HOTELIER_CONFIG_TEST_PRIORITY").unwrap();
        let xdg_only = env::var("HOTELIER_CONFIG_TEST_XDG_ONLY").unwrap();
        env::remove_var("HOTELIER_CONFIG_TEST_PRIORITY");
        env::remove_var("HOTELIER_CONFIG_TEST_XDG_ONLY");
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(priority, "from_dotenv");
        assert_eq!(xdg_only, "4");
        assert_eq!(report.from_dotenv, vec!["HOTELIER_CONFIG_TEST_PRIORITY"]);
        assert_eq!(report.from_xdg, vec!["HOTELIER_CONFIG_TEST_XDG_ONLY"]);
    }

    #[test]
    fn load_and_apply_no_config_ok() {
        let _guard = lock();
        let empty_dir = tempfile::tempdir().unwrap();
        let r = load_and_apply("config-crate-nonexistent-app-xyz", Some(empty_dir.path()));
        assert!(r.unwrap().is_empty());
    }

    #[test]
    fn invalid_xdg_toml_fails_with_xdg_parse_error() {
        let _guard = lock();
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join("hotelier");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), "invalid [[[\n").unwrap();

        let prev_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        let result = load_and_apply("hotelier", None);
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }
}
