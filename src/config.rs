//! User configuration and on-disk locations.
//!
//! `config.toml` lives in the platform config directory (or `--root`). Every
//! key is optional; flags and environment variables fill the gaps.

use crate::error::{ClaudentError, Result};
use crate::session::DEFAULT_ROLE;
use crate::sidebar::DEFAULT_BREAKPOINT;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const PATIENTS_ENV: &str = "CLAUDENT_PATIENTS";
pub const USER_ENV: &str = "CLAUDENT_USER";

#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Paths {
    pub fn new(root_override: Option<PathBuf>) -> Result<Self> {
        let (root, log_dir) = match root_override {
            Some(path) => {
                let logs = path.join("logs");
                (path, logs)
            }
            None => {
                let dirs = ProjectDirs::from("mx", "ClauDent", "claudent")
                    .ok_or(ClaudentError::MissingHomeDir)?;
                (
                    dirs.config_dir().to_path_buf(),
                    dirs.data_local_dir().join("logs"),
                )
            }
        };

        Ok(Self {
            config_file: root.join("config.toml"),
            log_dir,
            root,
        })
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// JSON file holding the patient index
    pub patients_file: Option<PathBuf>,
    /// Email shown in the header
    pub user_email: Option<String>,
    /// Role label under the email (default "Dentista")
    pub user_role: Option<String>,
    /// Terminal width, in columns, at which the sidebar docks
    pub sidebar_breakpoint: Option<u16>,
    /// Event loop tick in milliseconds
    pub tick_rate_ms: Option<u64>,
    /// tracing filter directive, e.g. "claudent=debug"
    pub log_level: Option<String>,
}

impl UserConfig {
    pub fn load(paths: &Paths) -> Result<Self> {
        let path = &paths.config_file;
        if !path.exists() {
            return Ok(Self::default());
        }
        let origin = path.display().to_string();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ClaudentError::ConfigRead(origin.clone(), e))?;
        Self::parse(&contents, &origin)
    }

    pub fn parse(contents: &str, origin: &str) -> Result<Self> {
        let config: UserConfig =
            toml::from_str(contents).map_err(|e| ClaudentError::ConfigParse(origin.to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sidebar_breakpoint == Some(0) {
            return Err(ClaudentError::InvalidConfig(
                "sidebar_breakpoint must be greater than 0".into(),
            ));
        }
        if self.tick_rate_ms == Some(0) {
            return Err(ClaudentError::InvalidConfig(
                "tick_rate_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// CLI flag, then config file, then `CLAUDENT_PATIENTS`.
    pub fn resolve_patients_file(&self, cli: Option<PathBuf>) -> Option<PathBuf> {
        cli.or_else(|| self.patients_file.clone())
            .or_else(|| std::env::var_os(PATIENTS_ENV).map(PathBuf::from))
    }

    /// CLI flag, then config file, then `CLAUDENT_USER`.
    pub fn resolve_user_email(&self, cli: Option<String>) -> Option<String> {
        cli.or_else(|| self.user_email.clone())
            .or_else(|| std::env::var(USER_ENV).ok())
            .filter(|email| !email.trim().is_empty())
    }

    pub fn user_role(&self) -> &str {
        self.user_role.as_deref().unwrap_or(DEFAULT_ROLE)
    }

    pub fn sidebar_breakpoint(&self) -> u16 {
        self.sidebar_breakpoint.unwrap_or(DEFAULT_BREAKPOINT)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.unwrap_or(50))
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("claudent=info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = Paths::new(Some(dir.path().to_path_buf())).expect("paths");
        let config = UserConfig::load(&paths).expect("defaults");
        assert_eq!(config.sidebar_breakpoint(), DEFAULT_BREAKPOINT);
        assert_eq!(config.tick_rate(), Duration::from_millis(50));
        assert_eq!(config.user_role(), "Dentista");
        assert_eq!(config.log_filter(), "claudent=info");
    }

    #[test]
    fn loads_values_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = Paths::new(Some(dir.path().to_path_buf())).expect("paths");
        std::fs::write(
            &paths.config_file,
            "patients_file = \"/srv/pacientes.json\"\nuser_email = \"dra@claudent.mx\"\nsidebar_breakpoint = 120\n",
        )
        .expect("write config");

        let config = UserConfig::load(&paths).expect("valid config");
        assert_eq!(config.sidebar_breakpoint(), 120);
        assert_eq!(
            config.resolve_patients_file(None),
            Some(PathBuf::from("/srv/pacientes.json"))
        );
        assert_eq!(
            config.resolve_patients_file(Some(PathBuf::from("otro.json"))),
            Some(PathBuf::from("otro.json"))
        );
        assert_eq!(
            config.resolve_user_email(None).as_deref(),
            Some("dra@claudent.mx")
        );
    }

    #[test]
    fn rejects_zero_values() {
        let err = UserConfig::parse("tick_rate_ms = 0", "inline").expect_err("zero tick");
        assert!(matches!(err, ClaudentError::InvalidConfig(_)));
        let err = UserConfig::parse("sidebar_breakpoint = 0", "inline").expect_err("zero bp");
        assert!(matches!(err, ClaudentError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = UserConfig::parse("sidebar_width = 30", "inline").expect_err("unknown key");
        assert!(matches!(err, ClaudentError::ConfigParse(_, _)));
    }
}
