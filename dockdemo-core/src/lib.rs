pub mod builder;
pub mod config;
pub mod error;
pub mod health;
pub mod layers;
pub mod lifecycle;
pub mod plugin;
pub mod plugins;
pub mod request_id;
pub mod secure_headers;
pub mod validation;

pub use builder::{AppBuilder, NoState};
pub use config::{
    ConfigError, ConfigProperties, ConfigValidationDetail, ConfigValue, DemoConfig,
    FromConfigValue,
};
pub use error::{error_response, HttpError};
pub use health::{HealthBuilder, HealthIndicator, HealthStatus};
pub use layers::{catch_panic_layer, default_cors, default_trace, init_tracing, LogFormat};
pub use plugin::Plugin;
pub use plugins::{AdvancedHealth, Cors, ErrorHandling, Health, NormalizePath, RequestTimeout, Tracing};
pub use request_id::{RequestId, RequestIdPlugin};
pub use secure_headers::SecureHeaders;
pub use validation::{FieldError, Validated, ValidationErrorResponse, ValidationRejection};
