//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `related.toml` +
//! `related.<env>.toml` + `RELATED_*` env vars. Provides helpers to expand `~`
//! and `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::policy::ErrorPolicy;
use crate::types::{clamp_k, FeatureWeighting};

pub const CONFIG_FILE: &str = "related.toml";
pub const ENV_PREFIX: &str = "RELATED_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Folder scanned in folder mode.
    pub root: String,
    /// Regex a file path must match to be ingested.
    pub pattern: String,
    /// CSV list of posts; switches the run to list mode when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self { root: "input/en".to_string(), pattern: r".*\.html".to_string(), list: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Number of related documents kept per document.
    pub length: i64,
    /// ISO 639-1 code selecting the stopword list.
    pub lang: String,
    pub weighting: FeatureWeighting,
    pub seed: u64,
    /// Worker threads for both phases; 0 lets rayon decide.
    pub threads: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { length: 5, lang: "en".to_string(), weighting: FeatureWeighting::default(), seed: 0, threads: 0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwordSettings {
    /// Directory of `<lang>.txt` lists that extend or replace the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where list mode writes its JSON tree.
    pub path: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { path: "posts.json".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub engine: EngineSettings,
    pub stopwords: StopwordSettings,
    pub errors: ErrorPolicy,
    pub output: OutputSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.engine.length < 0 {
            return Err(Error::InvalidConfig(format!("engine.length must be >= 0, got {}", self.engine.length)));
        }
        regex::Regex::new(&self.input.pattern)?;
        Ok(())
    }

    /// Result list length; a negative value means no results.
    pub fn length(&self) -> usize {
        clamp_k(self.engine.length)
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Defaults, `related.toml`, `related.<RUST_ENV>.toml`, then `extra` when
    /// given, then `RELATED_*` environment variables.
    pub fn load_with(extra: Option<&Path>) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(CONFIG_FILE));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("related.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("related.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("related.test.toml")),
            _ => {}
        }
        if let Some(path) = extra {
            if !path.is_file() {
                return Err(Error::NotFound(format!("config file {}", path.display())));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(Self { figment })
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Extracted but not validated: command-line overrides still have to be
    /// applied before [`Settings::validate`].
    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
