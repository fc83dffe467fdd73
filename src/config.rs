//! Configuration management for errorlens using the prefer crate.
//!
//! A config file is discovered by prefer (`errorlens.toml`, `errorlens.yaml`,
//! `errorlens.json`, ... in the usual locations) or given explicitly with
//! `--config`, then parsed with serde by extension. Environment variables
//! override file values, and the result is resolved into [`Settings`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::extract::{ErrorMessageExtractor, DEFAULT_KEYWORDS, DEFAULT_MARKER};
use crate::knowledge::{
    HttpKnowledgeBase, KnowledgeBaseLookup, StaticKnowledgeBase, DEFAULT_THRESHOLD,
};
use crate::ocr::{OcrConfig, TesseractBackend};
use crate::pipeline::ResolutionPipeline;

/// Default listen address, matching the original upload service.
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Default knowledge base request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OCR section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSection {
    /// Path or name of the tesseract executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tesseract_cmd: Option<String>,
    /// Tesseract language spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Knowledge base section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSection {
    /// Remote endpoint returning the answer set as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Local answer set file (JSON, YAML or TOML).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Request timeout in seconds for the remote endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Minimum similarity score (0-100) for an answer to be returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,
    /// User agent for the remote endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Message extraction section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractorSection {
    /// Token preceding `: <message>.` in the dialog text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Phrases to look for when the marker is absent, in priority order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listen address for `serve`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default)]
    pub ocr: OcrSection,
    #[serde(default)]
    pub knowledge: KnowledgeSection,
    #[serde(default)]
    pub extractor: ExtractorSection,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults (with env overrides) when no file is found.
    pub async fn load() -> Self {
        match prefer::load("errorlens").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => Self::default_with_env(),
        }
    }

    /// Create a default config with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;

        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    /// Parse config contents in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, String> {
        match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e)),
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("ERRORLENS_KB_URL") {
            self.knowledge.url = Some(url);
        }
        if let Some(file) = var("ERRORLENS_KB_FILE") {
            self.knowledge.file = Some(file);
        }
        if let Some(cmd) = var("TESSERACT_CMD") {
            self.ocr.tesseract_cmd = Some(cmd);
        }
        if let Some(bind) = var("ERRORLENS_BIND") {
            self.bind = Some(bind);
        }
        self
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Resolve this config into settings, filling in defaults.
    pub fn to_settings(&self) -> Settings {
        let base_dir = self
            .base_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let defaults = OcrConfig::default();
        let ocr = OcrConfig {
            tesseract_cmd: self
                .ocr
                .tesseract_cmd
                .as_deref()
                .map(|cmd| shellexpand::tilde(cmd).into_owned())
                .unwrap_or(defaults.tesseract_cmd),
            language: self.ocr.language.clone().unwrap_or(defaults.language),
        };

        Settings {
            bind: self.bind.clone().unwrap_or_else(|| DEFAULT_BIND.to_string()),
            ocr,
            kb_url: self.knowledge.url.clone(),
            kb_file: self
                .knowledge
                .file
                .as_deref()
                .map(|f| self.resolve_path(f, &base_dir)),
            kb_timeout: Duration::from_secs(
                self.knowledge.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            kb_user_agent: self.knowledge.user_agent.clone(),
            threshold: self
                .knowledge
                .threshold
                .map(|t| t.min(100) as u8)
                .unwrap_or(DEFAULT_THRESHOLD),
            marker: self
                .extractor
                .marker
                .clone()
                .unwrap_or_else(|| DEFAULT_MARKER.to_string()),
            keywords: self
                .extractor
                .keywords
                .clone()
                .unwrap_or_else(|| DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()),
        }
    }
}

/// Application settings, resolved from [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    /// Listen address for the web server.
    pub bind: String,
    /// OCR backend configuration.
    pub ocr: OcrConfig,
    /// Remote knowledge base endpoint (takes priority over `kb_file`).
    pub kb_url: Option<String>,
    /// Local answer set file.
    pub kb_file: Option<PathBuf>,
    /// Remote knowledge base request timeout.
    pub kb_timeout: Duration,
    /// User agent for the remote knowledge base.
    pub kb_user_agent: Option<String>,
    /// Minimum match score.
    pub threshold: u8,
    /// Extraction marker token.
    pub marker: String,
    /// Extraction keywords in priority order.
    pub keywords: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().to_settings()
    }
}

impl Settings {
    /// Build the OCR backend.
    pub fn ocr_backend(&self) -> TesseractBackend {
        TesseractBackend::with_config(self.ocr.clone())
    }

    /// Build the resolution pipeline.
    pub fn pipeline(&self) -> ResolutionPipeline {
        ResolutionPipeline::new(
            ErrorMessageExtractor::new(&self.marker, self.keywords.clone()),
            self.threshold,
        )
    }

    /// Build the knowledge base lookup.
    ///
    /// # Errors
    /// Returns an error when neither a URL nor a file is configured, or when
    /// the configured source cannot be set up.
    pub fn knowledge_base(&self) -> Result<Arc<dyn KnowledgeBaseLookup>, String> {
        if let Some(ref url) = self.kb_url {
            let mut builder = HttpKnowledgeBase::builder(url).timeout(self.kb_timeout);
            if let Some(ref ua) = self.kb_user_agent {
                builder = builder.user_agent(ua);
            }
            return Ok(Arc::new(builder.build()?));
        }

        if let Some(ref file) = self.kb_file {
            let kb = StaticKnowledgeBase::load(file).map_err(|e| {
                format!("Failed to load answer set {}: {}", file.display(), e)
            })?;
            return Ok(Arc::new(kb));
        }

        Err("No knowledge base configured (set knowledge.url or knowledge.file, \
             or ERRORLENS_KB_URL / ERRORLENS_KB_FILE)"
            .to_string())
    }
}

/// Load settings, from `config_path` when given, otherwise by discovery.
/// Returns (Settings, Config) tuple.
pub async fn load_settings(config_path: Option<&Path>) -> anyhow::Result<(Settings, Config)> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)
            .await
            .map_err(anyhow::Error::msg)?,
        None => Config::load().await,
    };

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    Ok((config.to_settings(), config))
}
