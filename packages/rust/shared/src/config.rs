//! Application configuration for Bookforge.
//!
//! Config is looked up at `--config <path>`, then `./bookforge.toml`, then
//! `~/.bookforge/bookforge.toml`. CLI flags override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BookforgeError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "bookforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".bookforge";

/// Largest chapter number that fits the two-digit filename prefix.
const MAX_TWO_DIGIT_NUMBER: u32 = 99;

// ---------------------------------------------------------------------------
// Config structs (matching bookforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory and file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Chapter numbering and markup settings.
    #[serde(default)]
    pub chapters: ChaptersConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the `.docx` source documents.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory receiving extracted `.txt` files.
    #[serde(default = "default_text_dir")]
    pub text_dir: PathBuf,

    /// Directory holding the generated chapter files.
    #[serde(default = "default_chapters_dir")]
    pub chapters_dir: PathBuf,

    /// Master document that `\input`s the chapters.
    #[serde(default = "default_master_document")]
    pub master_document: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            text_dir: default_text_dir(),
            chapters_dir: default_chapters_dir(),
            master_document: default_master_document(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    "documents".into()
}
fn default_text_dir() -> PathBuf {
    "extracted_texts".into()
}
fn default_chapters_dir() -> PathBuf {
    "chapters".into()
}
fn default_master_document() -> PathBuf {
    "main.tex".into()
}

/// `[chapters]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaptersConfig {
    /// First sequence number handed out; 0 and 1 are front matter by default.
    #[serde(default = "default_start_number")]
    pub start_number: u32,

    /// Chapter file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Path prefix used inside `\input{...}` directives.
    #[serde(default = "default_include_dir")]
    pub include_dir: String,

    /// Sectioning command used for the chapter heading.
    #[serde(default = "default_heading")]
    pub heading: String,
}

impl Default for ChaptersConfig {
    fn default() -> Self {
        Self {
            start_number: default_start_number(),
            extension: default_extension(),
            include_dir: default_include_dir(),
            heading: default_heading(),
        }
    }
}

fn default_start_number() -> u32 {
    2
}
fn default_extension() -> String {
    "tex".into()
}
fn default_include_dir() -> String {
    "chapters".into()
}
fn default_heading() -> String {
    "chapter".into()
}

impl AppConfig {
    /// Reject settings that would produce unusable filenames or markup.
    pub fn validate(&self) -> Result<()> {
        let ext = &self.chapters.extension;
        if ext.is_empty() {
            return Err(BookforgeError::config("chapters.extension must not be empty"));
        }
        if ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(BookforgeError::config(format!(
                "chapters.extension '{ext}' must be a bare extension like 'tex'"
            )));
        }

        let heading = self.chapters.heading.strip_suffix('*').unwrap_or(&self.chapters.heading);
        if heading.is_empty() || !heading.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(BookforgeError::config(format!(
                "chapters.heading '{}' is not a sectioning command name",
                self.chapters.heading
            )));
        }

        if self.chapters.start_number > MAX_TWO_DIGIT_NUMBER {
            tracing::warn!(
                start_number = self.chapters.start_number,
                "start number exceeds two digits, filenames will not sort lexicographically"
            );
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.bookforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BookforgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.bookforge/bookforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolve and load the config.
///
/// An explicit path must exist. Without one, `./bookforge.toml` is preferred
/// over the user config; defaults are used when neither exists.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config = match explicit {
        Some(path) => load_config_from(path)?,
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.is_file() {
                load_config_from(&local)?
            } else {
                match config_file_path() {
                    Ok(user) if user.is_file() => load_config_from(&user)?,
                    _ => {
                        tracing::debug!("no config file found, using defaults");
                        AppConfig::default()
                    }
                }
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BookforgeError::read(path, e))?;
    tracing::debug!(?path, "loaded config file");

    toml::from_str(&content).map_err(|e| {
        BookforgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BookforgeError::write(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| BookforgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BookforgeError::write(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("source_dir"));
        assert!(toml_str.contains("start_number = 2"));
        assert!(toml_str.contains("extension = \"tex\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[paths]
source_dir = "/books/memoir/docs"

[chapters]
start_number = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.paths.source_dir, PathBuf::from("/books/memoir/docs"));
        assert_eq!(config.paths.chapters_dir, PathBuf::from("chapters"));
        assert_eq!(config.chapters.start_number, 5);
        assert_eq!(config.chapters.extension, "tex");
        assert_eq!(config.chapters.heading, "chapter");
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_extension() {
        let mut config = AppConfig::default();
        config.chapters.extension = ".tex".into();
        assert!(config.validate().is_err());

        config.chapters.extension = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn validate_heading() {
        let mut config = AppConfig::default();
        config.chapters.heading = "section*".into();
        assert!(config.validate().is_ok());

        config.chapters.heading = "chap ter".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[chapters]\nextension = \"ltx\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.chapters.extension, "ltx");
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(BookforgeError::Read { .. })));
    }

    #[test]
    fn load_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[chapters\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
