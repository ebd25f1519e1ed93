//! Security response headers.
//!
//! Defaults: `X-Content-Type-Options: nosniff`, `X-Frame-Options: DENY`,
//! `Referrer-Policy: strict-origin-when-cross-origin`. HSTS and CSP are
//! opt-in because the demo service usually runs behind plain HTTP.

use axum::http::header::{
    CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::builder::AppBuilder;
use crate::plugin::Plugin;

/// Plugin that stamps a fixed set of headers on every response,
/// replacing any value a handler set.
#[derive(Debug, Clone)]
pub struct SecureHeaders {
    headers: HeaderMap,
}

impl SecureHeaders {
    pub fn builder() -> SecureHeadersBuilder {
        SecureHeadersBuilder::default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl Default for SecureHeaders {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Plugin for SecureHeaders {
    fn install<T: Clone + Send + Sync + 'static>(self, mut app: AppBuilder<T>) -> AppBuilder<T> {
        for (name, value) in &self.headers {
            app = app.with_layer(SetResponseHeaderLayer::overriding(name.clone(), value.clone()));
        }
        app
    }
}

pub struct SecureHeadersBuilder {
    headers: HeaderMap,
}

impl Default for SecureHeadersBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        );
        Self { headers }
    }
}

impl SecureHeadersBuilder {
    pub fn nosniff(mut self, enabled: bool) -> Self {
        if enabled {
            self.headers
                .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        } else {
            self.headers.remove(X_CONTENT_TYPE_OPTIONS);
        }
        self
    }

    /// Set `X-Frame-Options` (e.g. `"SAMEORIGIN"`).
    pub fn frame_options(self, value: impl Into<String>) -> Self {
        self.set(X_FRAME_OPTIONS, value.into())
    }

    pub fn no_frame_options(mut self) -> Self {
        self.headers.remove(X_FRAME_OPTIONS);
        self
    }

    pub fn referrer_policy(self, value: impl Into<String>) -> Self {
        self.set(REFERRER_POLICY, value.into())
    }

    /// Enable `Strict-Transport-Security` with the given `max-age` (seconds).
    pub fn hsts(self, max_age: u64) -> Self {
        self.set(
            STRICT_TRANSPORT_SECURITY,
            format!("max-age={max_age}; includeSubDomains"),
        )
    }

    pub fn content_security_policy(self, value: impl Into<String>) -> Self {
        self.set(CONTENT_SECURITY_POLICY, value.into())
    }

    pub fn build(self) -> SecureHeaders {
        SecureHeaders {
            headers: self.headers,
        }
    }

    /// Values that are not valid header text are skipped with a warning.
    fn set(mut self, name: HeaderName, value: String) -> Self {
        match HeaderValue::from_str(&value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(_) => tracing::warn!(header = %name, %value, "invalid security header value, skipped"),
        }
        self
    }
}
