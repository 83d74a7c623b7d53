use crate::domain::{config::ChatConfig, error::{ChatError, ChatResult}};
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

/// Configuration manager
///
/// Layers, lowest precedence first: built-in defaults, the global file
/// `~/.config/linechat/config.toml`, then the nearest `.linechat/config.toml`
/// found walking up from the current directory. Keys missing from a file keep
/// the value of the layer below.
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> Self {
        Self {
            global_config_path: Self::get_global_config_path(),
            project_config_path: Self::find_project_config_path(),
        }
    }

    /// Manager reading from explicit paths instead of the standard locations.
    pub fn with_paths(global: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            global_config_path: global,
            project_config_path: project,
        }
    }

    /// Load configuration from files
    pub fn load_config(&self) -> ChatResult<ChatConfig> {
        let mut merged = Self::defaults()?;

        for path in [&self.global_config_path, &self.project_config_path]
            .into_iter()
            .flatten()
        {
            if path.exists() {
                merge_values(&mut merged, Self::read_value(path)?);
            }
        }

        Self::finish(merged, "merged configuration")
    }

    /// Load configuration from a single file on top of the defaults.
    pub fn load_config_from_path(&self, path: &Path) -> ChatResult<ChatConfig> {
        let mut merged = Self::defaults()?;
        merge_values(&mut merged, Self::read_value(path)?);
        Self::finish(merged, &path.display().to_string())
    }

    fn defaults() -> ChatResult<Value> {
        Value::try_from(ChatConfig::default()).map_err(|e| ChatError::Config {
            message: format!("Failed to serialize default config: {}", e),
        })
    }

    fn read_value(path: &Path) -> ChatResult<Value> {
        let content = fs::read_to_string(path).map_err(|e| ChatError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| ChatError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    fn finish(merged: Value, origin: &str) -> ChatResult<ChatConfig> {
        merged.try_into().map_err(|e| ChatError::Config {
            message: format!("Invalid configuration in {}: {}", origin, e),
        })
    }

    /// Get global configuration path
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("linechat").join("config.toml"))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(".linechat").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
