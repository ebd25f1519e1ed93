use std::time::Duration;

use dockdemo_core::{ConfigError, ConfigProperties, DemoConfig, LogFormat};

/// Secret shipped in `application.yaml`; only acceptable in debug mode.
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Raw configuration plus the typed [`Settings`] section.
pub type AppConfig = DemoConfig<Settings>;

/// Top-level service settings.
///
/// | Key              | Env              | Default        |
/// |------------------|------------------|----------------|
/// | `app.name`       | `APP_NAME`       | `Dockdemo`     |
/// | `debug`          | `DEBUG`          | `false`        |
/// | `secret.key`     | `SECRET_KEY`     | dev key        |
/// | `host`           | `HOST`           | `0.0.0.0`      |
/// | `port`           | `PORT`           | `8080`         |
/// | `server.timeout` | `SERVER_TIMEOUT` | `30` (seconds) |
/// | `log.format`     | `LOG_FORMAT`     | `pretty`       |
/// | `users.seed`     | `USERS_SEED`     | `true`         |
#[derive(Debug, Clone, garde::Validate)]
pub struct Settings {
    #[garde(length(min = 1, max = 100))]
    pub app_name: String,
    #[garde(skip)]
    pub debug: bool,
    #[garde(length(min = 1))]
    pub secret_key: String,
    #[garde(length(min = 1))]
    pub host: String,
    #[garde(skip)]
    pub port: u16,
    #[garde(custom(positive_duration))]
    pub request_timeout: Duration,
    #[garde(skip)]
    pub log_format: LogFormat,
    #[garde(skip)]
    pub seed_users: bool,
}

fn positive_duration(value: &Duration, _ctx: &()) -> garde::Result {
    if value.is_zero() {
        return Err(garde::Error::new("must be at least one second"));
    }
    Ok(())
}

impl ConfigProperties for Settings {
    fn prefix() -> &'static str {
        ""
    }

    fn from_config(config: &DemoConfig) -> Result<Self, ConfigError> {
        let log_format: String = config.get_or("log.format", "pretty".to_string())?;
        let log_format = log_format
            .parse::<LogFormat>()
            .map_err(|_| ConfigError::TypeMismatch {
                key: "log.format".into(),
                expected: "'pretty' or 'json'",
            })?;

        Ok(Self {
            app_name: config.get_or("app.name", "Dockdemo".to_string())?,
            debug: config.get_or("debug", false)?,
            secret_key: config.get_or("secret.key", DEFAULT_SECRET_KEY.to_string())?,
            host: config.get_or("host", "0.0.0.0".to_string())?,
            port: config.get_or("port", 8080)?,
            request_timeout: config.get_or("server.timeout", Duration::from_secs(30))?,
            log_format,
            seed_users: config.get_or("users.seed", true)?,
        })
    }
}

impl Settings {
    /// `host:port`, ready for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info,tower_http=debug"
        }
    }
}

/// Command-line values that take precedence over every config source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Apply `overrides` on top of `raw` and build the typed configuration.
pub fn resolve(mut raw: DemoConfig, overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    if let Some(host) = &overrides.host {
        raw.set("host", host.as_str());
    }
    if let Some(port) = overrides.port {
        raw.set("port", i64::from(port));
    }
    raw.with_typed::<Settings>()
}
