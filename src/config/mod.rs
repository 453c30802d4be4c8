use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::notes::{default_seed_categories, ALL_CATEGORY};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "CategoryNotes";
const APP_NAME: &str = "category-notes";

pub const CONFIG_ENV: &str = "CATEGORY_NOTES_CONFIG";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn from_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Reads the config file when present. Notes never hit disk, and neither
    /// does a generated default config.
    pub fn load_or_default(&self) -> Result<AppConfig> {
        if !self.paths.config_file.exists() {
            tracing::debug!(
                path = %self.paths.config_file.display(),
                "no config file, using defaults"
            );
            let mut cfg = AppConfig::default();
            cfg.post_load();
            return Ok(cfg);
        }
        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var(CONFIG_ENV).ok().map(PathBuf::from);
        if let Some(path) = override_config {
            return Ok(Self::for_file(path));
        }

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;
        let config_dir = project_dirs.config_dir().to_path_buf();
        let config_file = config_dir.join("config.toml");
        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn for_file(path: PathBuf) -> Self {
        if path.is_dir() {
            return Self {
                config_file: path.join("config.toml"),
                config_dir: path,
            };
        }
        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            config_dir,
            config_file: path,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seed_demo_notes: bool,
    pub seed_categories: Vec<String>,
    pub wrap_content: bool,
    pub search: SearchOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_demo_notes: true,
            seed_categories: default_seed_categories(),
            wrap_content: true,
            search: SearchOptions::default(),
        }
    }
}

impl AppConfig {
    fn post_load(&mut self) {
        let mut cleaned: Vec<String> = Vec::with_capacity(self.seed_categories.len() + 1);
        for category in &self.seed_categories {
            let trimmed = category.trim();
            if trimmed.is_empty() || cleaned.iter().any(|existing| existing == trimmed) {
                continue;
            }
            cleaned.push(trimmed.to_string());
        }
        match cleaned.iter().position(|category| category == ALL_CATEGORY) {
            Some(0) => {}
            Some(idx) => {
                let all = cleaned.remove(idx);
                cleaned.insert(0, all);
            }
            None => {
                tracing::warn!("seed categories missing \"All\", inserting it first");
                cleaned.insert(0, ALL_CATEGORY.to_string());
            }
        }
        self.seed_categories = cleaned;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub highlight_matches: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            highlight_matches: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader_with(contents: Option<&str>) -> Result<(TempDir, ConfigLoader)> {
        let temp = TempDir::new().context("creating temp dir")?;
        let file = temp.path().join("config.toml");
        if let Some(contents) = contents {
            fs::write(&file, contents)?;
        }
        Ok((temp, ConfigLoader::from_paths(ConfigPaths::for_file(file))))
    }

    #[test]
    fn missing_file_yields_defaults_without_writing() -> Result<()> {
        let (temp, loader) = loader_with(None)?;
        let cfg = loader.load_or_default()?;
        assert!(cfg.seed_demo_notes);
        assert_eq!(cfg.seed_categories, default_seed_categories());
        assert!(!temp.path().join("config.toml").exists());
        Ok(())
    }

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let (_temp, loader) = loader_with(Some("seed_demo_notes = false\n"))?;
        let cfg = loader.load_or_default()?;
        assert!(!cfg.seed_demo_notes);
        assert!(cfg.wrap_content);
        assert!(cfg.search.highlight_matches);
        Ok(())
    }

    #[test]
    fn seed_categories_are_normalised() -> Result<()> {
        let (_temp, loader) = loader_with(Some(
            "seed_categories = [\"Work\", \" \", \"Travel\", \"Work\", \"All\"]\n",
        ))?;
        let cfg = loader.load_or_default()?;
        assert_eq!(cfg.seed_categories, vec!["All", "Work", "Travel"]);
        Ok(())
    }

    #[test]
    fn all_is_inserted_when_missing() -> Result<()> {
        let (_temp, loader) = loader_with(Some("seed_categories = [\"Inbox\"]\n"))?;
        let cfg = loader.load_or_default()?;
        assert_eq!(cfg.seed_categories, vec!["All", "Inbox"]);
        Ok(())
    }

    #[test]
    fn invalid_toml_is_an_error() -> Result<()> {
        let (_temp, loader) = loader_with(Some("seed_demo_notes = \"maybe\"\n"))?;
        assert!(loader.load_or_default().is_err());
        Ok(())
    }

    #[test]
    fn directory_override_points_at_config_toml() -> Result<()> {
        let temp = TempDir::new()?;
        let paths = ConfigPaths::for_file(temp.path().to_path_buf());
        assert_eq!(paths.config_file, temp.path().join("config.toml"));
        assert_eq!(paths.config_dir, temp.path());
        Ok(())
    }
}
