//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "delib";
const PROJECT_FILES: [&str; 2] = ["delib.toml", ".delib.toml"];
const ENV_PREFIX: &str = "DELIB_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DELIB_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./delib.toml` or `./.delib.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/delib/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path, Self::global_config_path(), Self::project_config_path())
            .extract()
            .map_err(Box::new)
    }

    fn figment(
        explicit: Option<&PathBuf>,
        global: Option<PathBuf>,
        project: Option<PathBuf>,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }
        if let Some(project_path) = project {
            figment = figment.merge(Toml::file(project_path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {ENV_PREFIX}* (sections split by __)");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{mark}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./delib.toml or ./.delib.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{mark}] Global:  {}", path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.orchestration.max_retries, 0);
        assert!(config.logging.log_to_store);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("delib"));
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("delib.toml");
        fs::write(
            &project,
            "[orchestration]\nmax_retries = 2\nbase_delay_ms = 500\n",
        )
        .unwrap();
        let explicit = dir.path().join("override.toml");
        fs::write(&explicit, "[orchestration]\nmax_retries = 5\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(&explicit), None, Some(project))
            .extract()
            .unwrap();

        assert_eq!(config.orchestration.max_retries, 5);
        assert_eq!(config.orchestration.base_delay_ms, 500);
        assert_eq!(config.chat.answer_jitter_max_ms, 2000);
    }

    #[test]
    fn test_project_config_discovery_prefers_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::project_config_in(dir.path()).is_none());

        fs::write(dir.path().join(".delib.toml"), "").unwrap();
        fs::write(dir.path().join("delib.toml"), "").unwrap();

        let found = ConfigLoader::project_config_in(dir.path()).unwrap();
        assert!(found.ends_with("delib.toml"));
        assert!(!found.ends_with(".delib.toml"));
    }

    #[test]
    fn test_missing_global_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config: FileConfig =
            ConfigLoader::figment(None, Some(dir.path().join("absent.toml")), None)
                .extract()
                .unwrap();
        assert_eq!(config, FileConfig::default());
    }
}
