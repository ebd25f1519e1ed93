use super::{ConfigError, ConfigValidationDetail, DemoConfig};

/// Trait for strongly-typed configuration sections.
///
/// Sections are plain structs that read their keys from a raw
/// [`DemoConfig`] and carry garde rules, checked by
/// [`DemoConfig::with_typed`] right after construction.
///
/// ```ignore
/// #[derive(Clone, Debug, garde::Validate)]
/// pub struct ServerSettings {
///     #[garde(range(min = 1))]
///     pub port: u16,
/// }
///
/// impl ConfigProperties for ServerSettings {
///     fn prefix() -> &'static str { "server" }
///     fn from_config(config: &DemoConfig) -> Result<Self, ConfigError> {
///         Ok(Self { port: config.get_or("server.port", 8080)? })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized + garde::Validate<Context = ()> {
    /// The configuration key prefix (e.g. `"server"`). Empty for top-level keys.
    fn prefix() -> &'static str;

    /// Construct from a raw `DemoConfig` instance.
    fn from_config(config: &DemoConfig) -> Result<Self, ConfigError>;
}

pub(crate) fn validate<C: ConfigProperties>(section: &C) -> Result<(), ConfigError> {
    let Err(report) = section.validate() else {
        return Ok(());
    };
    let prefix = C::prefix();
    let details = report
        .iter()
        .map(|(path, error)| {
            let field = path.to_string();
            let key = match (prefix.is_empty(), field.is_empty()) {
                (true, _) => field,
                (false, true) => prefix.to_string(),
                (false, false) => format!("{prefix}.{field}"),
            };
            ConfigValidationDetail {
                key,
                message: error.message().to_string(),
            }
        })
        .collect();
    Err(ConfigError::Validation(details))
}
