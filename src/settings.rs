use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_API_URL;

pub const APP_FOLDER_NAME: &str = "MentorAI";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Load sample data when a request fails.
    pub demo_fallback: bool,
    /// Set from the command line; never written to disk.
    #[serde(skip)]
    pub offline: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 120,
            demo_fallback: true,
            offline: false,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UiSettings {
    #[serde(default)]
    pub last_theme: Option<String>,
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,
    #[serde(default)]
    pub last_page: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    pub version: String,
    pub base_path: String,
    pub mode: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub last_email: String,
    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    pub fn defaults_for(base: &Path) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            base_path: base.to_string_lossy().to_string(),
            mode: "gui".to_string(),
            api: ApiConfig::default(),
            last_email: String::new(),
            ui: UiSettings {
                last_theme: Some("midnight".to_string()),
                ..UiSettings::default()
            },
        }
    }

    pub fn exports_dir(&self) -> PathBuf {
        Path::new(&self.base_path).join("exports")
    }
}

pub fn default_base_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    if let Some(dir) = exe_dir {
        return dir.join("data");
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_FOLDER_NAME)
}

pub fn ensure_base_folders(base: &Path) -> io::Result<()> {
    let dirs = [
        base.to_path_buf(),
        base.join("config"),
        base.join("themes"),
        base.join("exports"),
    ];

    for d in dirs {
        if !d.exists() {
            fs::create_dir_all(&d)?;
        }
    }

    Ok(())
}

pub fn settings_path(base: &Path) -> PathBuf {
    base.join("config").join("settings.json")
}

pub fn load_or_init_settings(base: &Path) -> io::Result<Settings> {
    let config_path = settings_path(base);

    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        match serde_json::from_str::<Settings>(&contents) {
            Ok(mut settings) => {
                // Keep base_path in sync with where the file was actually found.
                if settings.base_path != base.to_string_lossy() {
                    settings.base_path = base.to_string_lossy().to_string();
                }
                return Ok(settings);
            }
            Err(e) => {
                log::warn!(
                    target: "settings",
                    "{} is unreadable ({e}); starting from defaults",
                    config_path.display()
                );
            }
        }
    }

    let settings = Settings::defaults_for(base);
    save_settings(&settings, base)?;
    Ok(settings)
}

pub fn save_settings(settings: &Settings, base: &Path) -> io::Result<()> {
    let config_path = settings_path(base);
    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("JSON encode error: {e}")))?;
    fs::write(&config_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        ensure_base_folders(dir.path()).unwrap();
        let settings = load_or_init_settings(dir.path()).unwrap();
        assert_eq!(settings.api.base_url, DEFAULT_API_URL);
        assert!(settings.api.demo_fallback);
        assert!(settings_path(dir.path()).exists());
        assert!(dir.path().join("exports").is_dir());
    }

    #[test]
    fn saved_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = load_or_init_settings(dir.path()).unwrap();
        settings.api.base_url = "https://mentor.example.edu".into();
        settings.last_email = "priya@mentorai.edu".into();
        settings.ui.last_theme = Some("daylight".into());
        save_settings(&settings, dir.path()).unwrap();
        assert_eq!(load_or_init_settings(dir.path()).unwrap(), settings);
    }

    #[test]
    fn old_files_without_api_section_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            settings_path(dir.path()),
            r#"{"version":"0.1.0","base_path":"elsewhere","mode":"cli"}"#,
        )
        .unwrap();
        let settings = load_or_init_settings(dir.path()).unwrap();
        assert_eq!(settings.mode, "cli");
        assert_eq!(settings.api, ApiConfig::default());
        assert_eq!(settings.base_path, dir.path().to_string_lossy());
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(settings_path(dir.path()), "not json").unwrap();
        let settings = load_or_init_settings(dir.path()).unwrap();
        assert_eq!(settings.mode, "gui");
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cfg = ApiConfig {
            timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert_eq!(cfg.timeout(), Duration::from_secs(1));
    }
}
