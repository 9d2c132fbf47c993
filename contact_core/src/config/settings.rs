use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Port on which SMTP submission expects implicit TLS.
pub const IMPLICIT_TLS_PORT: u16 = 465;

pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Upper bound on one SMTP send. Must stay below the request timeout.
pub const DEFAULT_SMTP_TIMEOUT_SECONDS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    #[serde(skip)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_seconds: u64,
}

/// Mail relay settings, read from the unprefixed `TO_EMAIL` / `SMTP_*`
/// variables the site is deployed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub to_email: Option<String>,
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_user: Option<String>,
    #[serde(default)]
    pub smtp_pass: Option<String>,
    #[serde(default = "default_smtp_timeout")]
    pub smtp_timeout_seconds: u64,
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_smtp_timeout() -> u64 {
    DEFAULT_SMTP_TIMEOUT_SECONDS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            max_age_seconds: 3600,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            to_email: None,
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_user: None,
            smtp_pass: None,
            smtp_timeout_seconds: DEFAULT_SMTP_TIMEOUT_SECONDS,
        }
    }
}

impl MailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Builds the mail settings from `TO_EMAIL` and `SMTP_*` entries, ignoring
    /// every other variable.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let relevant: HashMap<String, String> = vars
            .into_iter()
            .filter(|(key, _)| key == "TO_EMAIL" || key.starts_with("SMTP_"))
            .collect();

        Config::builder()
            .add_source(Environment::default().source(Some(relevant)).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Destination mailbox, treating a blank value as absent.
    pub fn destination(&self) -> Option<&str> {
        non_blank(self.to_email.as_deref())
    }

    pub fn host(&self) -> Option<&str> {
        non_blank(self.smtp_host.as_deref())
    }

    pub fn user(&self) -> Option<&str> {
        non_blank(self.smtp_user.as_deref())
    }

    pub fn uses_implicit_tls(&self) -> bool {
        self.smtp_port == IMPLICIT_TLS_PORT
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_seconds)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.mail = MailConfig::from_env()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.mail.smtp_port == 0 {
            return Err(ConfigError::Message("SMTP port cannot be 0".to_string()));
        }

        if self.mail.smtp_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "SMTP timeout must be greater than 0".to_string(),
            ));
        }

        // A send must fail before the request layer cuts the response off.
        if self.mail.smtp_timeout_seconds >= self.server.request_timeout_seconds {
            return Err(ConfigError::Message(format!(
                "SMTP timeout ({}s) must be shorter than the request timeout ({}s)",
                self.mail.smtp_timeout_seconds, self.server.request_timeout_seconds
            )));
        }

        if self.mail.destination().is_none() {
            tracing::warn!("TO_EMAIL is not set - contact submissions will be rejected");
        }

        if self.mail.host().is_none() {
            tracing::warn!("SMTP_HOST is not set - mail transport cannot be built");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
