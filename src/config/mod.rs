use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address of the Canvas Meeting Scheduler backend
    pub server_url: String,
    /// Last email used to sign in, prefilled on the login form
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            email: String::new(),
            font_scale: 1.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.server_url.trim().is_empty()
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("edu", "mentorweb", "meetbox")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Normalized base URL for API requests. Keeps an explicit scheme
    /// (dev backends run over plain http), defaults to https otherwise,
    /// and drops any trailing slashes.
    pub fn base_url(&self) -> String {
        let trimmed = self.server_url.trim().trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_adds_scheme_and_trims() {
        let config = Config {
            server_url: "scheduler.example.edu/".into(),
            ..Config::default()
        };
        assert_eq!(config.base_url(), "https://scheduler.example.edu");
    }

    #[test]
    fn base_url_keeps_explicit_http() {
        let config = Config {
            server_url: "http://localhost:5000".into(),
            ..Config::default()
        };
        assert_eq!(config.base_url(), "http://localhost:5000");
    }

    #[test]
    fn unset_server_is_not_configured() {
        assert!(!Config::default().is_configured());
        let config = Config {
            server_url: "  ".into(),
            ..Config::default()
        };
        assert!(!config.is_configured());
    }
}
