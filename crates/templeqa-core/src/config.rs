//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, so
//! `APP_SERVER__PORT=9000` overrides `server.port`). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against the
//! directory the config files were read from.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::data_processor::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::DistanceMetric;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub document: DocumentSettings,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub llm: LlmSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    pub max_features: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub metric: DistanceMetric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    /// Name of the environment variable holding the API credential.
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            document: DocumentSettings { path: "annavaram.pdf".to_string() },
            chunking: ChunkingConfig::default(),
            embedding: EmbeddingSettings { max_features: 300 },
            retrieval: RetrievalSettings { top_k: 3, metric: DistanceMetric::Euclidean },
            llm: LlmSettings {
                api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                temperature: 0.0,
                api_key_env: "GROQ_API_KEY".to_string(),
            },
            server: ServerSettings { host: "127.0.0.1".to_string(), port: 8085 },
        }
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
    settings: Settings,
}

impl Config {
    /// Load from the current directory, picking the environment from `RUST_ENV`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(dir, &env_name)
    }

    pub fn load_for_env(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let settings: Settings = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        validate(&settings)?;
        Ok(Self { figment, base_dir: dir.to_path_buf(), settings })
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The configured PDF path, expanded and resolved against the config directory.
    pub fn document_path(&self) -> PathBuf {
        resolve_with_base(&self.base_dir, &self.settings.document.path)
    }
}

fn validate(settings: &Settings) -> Result<()> {
    settings.chunking.validate()?;
    if settings.embedding.max_features == 0 {
        return Err(Error::InvalidConfig("embedding.max_features must be > 0".to_string()));
    }
    if settings.retrieval.top_k == 0 {
        return Err(Error::InvalidConfig("retrieval.top_k must be > 0".to_string()));
    }
    if settings.llm.api_key_env.trim().is_empty() {
        return Err(Error::InvalidConfig("llm.api_key_env must name a variable".to_string()));
    }
    Ok(())
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
