use anyhow::{anyhow, Context, Result};
use common::Error;
use serde::Deserialize;

/// Application configuration loaded from `config.toml`.
///
/// Identity lives in the file, secrets stay in the environment: the
/// config names the variables to read, never the values.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub propreports: PropReportsConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub coach: CoachConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropReportsConfig {
    /// Portal hostname, e.g. `firm.propreports.com`.
    pub domain: String,
    pub account: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Root of the exports tree.
    #[serde(default = "default_export_root")]
    pub root: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root: default_export_root(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoachConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_coach_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_url: default_api_url(),
            timeout_ms: default_coach_timeout_ms(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path))?;
        let cfg: AppConfig = toml::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Required identity fields. Serde accepts `domain = ""`; the
    /// portal client cannot.
    fn validate(&self) -> common::Result<()> {
        if self.propreports.domain.is_empty() {
            return Err(Error::Config("propreports.domain must be set".into()));
        }
        if self.propreports.account.is_empty() {
            return Err(Error::Config("propreports.account must be set".into()));
        }
        Ok(())
    }

    pub fn portal_password(&self) -> Result<String> {
        std::env::var(&self.propreports.password_env).map_err(|_| {
            anyhow!(
                "{} environment variable not set",
                self.propreports.password_env
            )
        })
    }

    pub fn coach_api_key(&self) -> Result<String> {
        std::env::var(&self.coach.api_key_env)
            .map_err(|_| anyhow!("{} environment variable not set", self.coach.api_key_env))
    }
}

fn default_password_env() -> String {
    "PROPREPORTS_PASS".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_export_root() -> String {
    "exports".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_coach_timeout_ms() -> u64 {
    60_000
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [propreports]
            domain = "firm.propreports.com"
            account = "TRADER1"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.propreports.password_env, "PROPREPORTS_PASS");
        assert_eq!(cfg.propreports.timeout_secs, 30);
        assert_eq!(cfg.export.root, "exports");
        assert_eq!(cfg.coach.model, "gpt-4");
        assert_eq!(cfg.coach.api_key_env, "OPENAI_API_KEY");
        assert!(cfg.coach.api_url.starts_with("https://api.openai.com/"));
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [propreports]
            domain = "firm.propreports.com"
            account = "TRADER1"
            timeout_secs = 10

            [export]
            root = "/var/exports"

            [coach]
            model = "gpt-4o"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.propreports.timeout_secs, 10);
        assert_eq!(cfg.export.root, "/var/exports");
        assert_eq!(cfg.coach.model, "gpt-4o");
    }

    #[test]
    fn test_missing_account_is_rejected() {
        let err = toml::from_str::<AppConfig>(
            r#"
            [propreports]
            domain = "firm.propreports.com"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_blank_identity_fields_are_rejected() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [propreports]
            domain = ""
            account = "TRADER1"
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let cfg: AppConfig = toml::from_str(
            r#"
            [propreports]
            domain = "firm.propreports.com"
            account = ""
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_password_env_lookup() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [propreports]
            domain = "firm.propreports.com"
            account = "TRADER1"
            password_env = "PROP_COACH_TEST_PASSWORD"
            "#,
        )
        .unwrap();

        std::env::remove_var("PROP_COACH_TEST_PASSWORD");
        assert!(cfg.portal_password().is_err());

        std::env::set_var("PROP_COACH_TEST_PASSWORD", "hunter2");
        assert_eq!(cfg.portal_password().unwrap(), "hunter2");
        std::env::remove_var("PROP_COACH_TEST_PASSWORD");
    }
}
