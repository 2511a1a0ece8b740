//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window and surface placement.
    pub window: WindowConfig,
    /// Scene generation and animation.
    pub scene: SceneConfig,
    /// GPU adapter polling during startup.
    pub startup: StartupConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
///
/// The defaults place a borderless, transparent surface underneath every
/// other window so the starfield behaves like a desktop background.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels (ignored when fullscreen).
    pub width: u32,
    /// Window height in logical pixels (ignored when fullscreen).
    pub height: u32,
    /// Cover the whole monitor with a borderless fullscreen window.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
    /// Request a transparent surface so only the stars are visible.
    pub transparent: bool,
    /// Show window decorations.
    pub decorations: bool,
    /// Keep the window below all other windows.
    pub always_on_bottom: bool,
    /// Let pointer events pass through to whatever is underneath.
    ///
    /// Most platforms stop reporting cursor movement to a window that does
    /// not hit-test, which disables mouse parallax.
    pub click_through: bool,
}

/// Scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed seed for star placement and shooting-star timing.
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Move the camera with the mouse.
    pub mouse_parallax: bool,
}

/// Startup configuration: how GPU adapter acquisition is retried.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StartupConfig {
    /// Delay between adapter requests, in milliseconds.
    pub retry_interval_ms: u64,
    /// Give up after this many failed attempts. `None` retries forever.
    pub max_attempts: Option<u32>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log frame rate every few seconds.
    pub log_frame_stats: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: true,
            vsync: true,
            title: "Starfield".to_string(),
            transparent: true,
            decorations: false,
            always_on_bottom: true,
            click_through: false,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            mouse_parallax: true,
        }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: 100,
            max_attempts: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_frame_stats: false,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Polling interval for adapter acquisition as a [`std::time::Duration`].
    pub fn retry_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.startup.retry_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("retry_interval_ms: 100"));
        assert!(ron_str.contains("always_on_bottom: true"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.scene.seed = Some(7);
        config.startup.max_attempts = Some(50);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), scene: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.startup, StartupConfig::default());
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let ron_str = "(window: (width: 1920, click_through: true))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 1920);
        assert!(config.window.click_through);
        assert_eq!(config.window.height, 720);
        assert!(config.window.transparent);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.fullscreen = false;
        config.scene.seed = Some(1234);
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        match &err {
            ConfigError::Parse { path, .. } => assert_eq!(path, &config_path),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(err.to_string().contains(&config_path.display().to_string()));
    }

    #[test]
    fn test_unwritable_dir_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let err = Config::default().save(&blocker).unwrap_err();
        match &err {
            ConfigError::Write { path, .. } => assert_eq!(path, &blocker),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_interval_defaults_to_100ms() {
        let config = Config::default();
        assert_eq!(config.retry_interval(), std::time::Duration::from_millis(100));
    }

    #[test]
    fn test_retry_interval_never_zero() {
        let mut config = Config::default();
        config.startup.retry_interval_ms = 0;
        assert_eq!(config.retry_interval(), std::time::Duration::from_millis(1));
    }
}
