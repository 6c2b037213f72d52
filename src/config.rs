use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocmarkError, Result};

/// Default directory name for docmark data.
const DOCMARK_DIR: &str = ".docmark";
/// History store filename.
const HISTORY_FILE: &str = "history.json";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Configuration resolved from a base directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory the data dir lives under.
    pub base_dir: PathBuf,
    /// Path to the `.docmark/` directory.
    pub docmark_dir: PathBuf,
    /// Path to the persisted history store.
    pub history_path: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from .docmark/config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// History store configuration.
    pub history: HistorySettings,
    /// OCR engine configuration.
    pub ocr: OcrSettings,
    /// Output configuration.
    pub output: OutputSettings,
}

/// History-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of documents retained, oldest evicted first.
    pub max_documents: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_documents: 50 }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Tesseract binary name or path.
    pub binary: String,
    /// Recognition language passed to tesseract.
    pub lang: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            binary: "tesseract".into(),
            lang: "eng".into(),
        }
    }
}

/// Output-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format: "minified" (default) or "pretty".
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "minified".into(),
        }
    }
}

impl Config {
    /// Create config for a given base directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let docmark_dir = base_dir.join(DOCMARK_DIR);
        let history_path = docmark_dir.join(HISTORY_FILE);
        let config_path = docmark_dir.join(CONFIG_FILE);

        // Try to load settings from config.toml
        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            base_dir,
            docmark_dir,
            history_path,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| DocmarkError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Load settings from config.toml if it exists.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        toml::from_str(&content).ok()
    }

    /// Save current settings to config.toml.
    pub fn save_settings(&self) -> Result<()> {
        self.ensure_docmark_dir()?;
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| DocmarkError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Ensure the `.docmark/` directory exists.
    pub fn ensure_docmark_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.docmark_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_new_sets_paths() {
        let cfg = Config::new("/tmp/docs");
        assert_eq!(cfg.base_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(cfg.docmark_dir, PathBuf::from("/tmp/docs/.docmark"));
        assert_eq!(
            cfg.history_path,
            PathBuf::from("/tmp/docs/.docmark/history.json")
        );
    }

    #[test]
    fn ensure_docmark_dir_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::new(tmp.path());
        assert!(!cfg.docmark_dir.exists());
        cfg.ensure_docmark_dir().unwrap();
        assert!(cfg.docmark_dir.exists());
    }

    #[test]
    fn default_settings() {
        let settings = UserSettings::default();
        assert_eq!(settings.history.max_documents, 50);
        assert_eq!(settings.ocr.binary, "tesseract");
        assert_eq!(settings.ocr.lang, "eng");
        assert_eq!(settings.output.format, "minified");
    }

    #[test]
    fn save_and_load_settings() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = Config::new(tmp.path());

        cfg.settings.history.max_documents = 10;
        cfg.settings.output.format = "pretty".to_string();
        cfg.save_settings().unwrap();
        assert!(cfg.config_path.exists());

        let cfg2 = Config::new(tmp.path());
        assert_eq!(cfg2.settings.history.max_documents, 10);
        assert_eq!(cfg2.settings.output.format, "pretty");
    }

    #[test]
    fn load_invalid_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".docmark");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "invalid toml {{{{").unwrap();

        let cfg = Config::new(tmp.path());
        assert_eq!(cfg.settings.history.max_documents, 50);
    }
}
