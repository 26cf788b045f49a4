use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-project settings file, at the project root.
pub const PROJECT_SETTINGS_FILE: &str = ".scenewright.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content =
        std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
            config_path: path.to_path_buf(),
            source,
        })?;

    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::ConfigParseError {
            config_path: path.to_path_buf(),
            source,
        })
}

fn write_toml<T: Serialize>(value: &T, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Global configuration: where the screenplay projects live.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub projects_path: PathBuf,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let Some(mut config) = read_toml::<Config>(config_path.as_ref())? else {
            return Ok(None);
        };

        // Expand shell variables and tilde in the loaded config path
        config.projects_path =
            Self::expand_path(&config.projects_path).unwrap_or(config.projects_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        write_toml(self, config_path.as_ref())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/scenewright");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub title: Option<String>,
    pub author: Option<String>,
    pub include_scene_numbers: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            include_scene_numbers: true,
        }
    }
}

/// Vocabulary and export defaults of one screenplay project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Known cast, offered by name completion before any script mentions them.
    pub characters: Vec<String>,
    pub emotions: Vec<String>,
    pub times_of_day: Vec<String>,
    pub export: ExportSettings,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            characters: Vec::new(),
            emotions: ["笑", "哭", "怒", "低声", "冷笑", "惊讶", "犹豫"]
                .map(String::from)
                .to_vec(),
            times_of_day: ["日", "夜", "晨", "黄昏"].map(String::from).to_vec(),
            export: ExportSettings::default(),
        }
    }
}

impl ProjectSettings {
    pub fn settings_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_SETTINGS_FILE)
    }

    /// Settings of the project at `project_root`; defaults when it has none.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        Self::load_from_path(Self::settings_path(project_root))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(read_toml(path.as_ref())?.unwrap_or_default())
    }

    pub fn save_for_project(&self, project_root: &Path) -> anyhow::Result<()> {
        write_toml(self, &Self::settings_path(project_root))
    }
}
