use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HttpError;

/// A field-level validation error.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

/// Container for validation errors, used as the payload of `HttpError::Validation`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

impl ValidationErrorResponse {
    pub fn from_report(report: &garde::Report) -> Self {
        let errors = report
            .iter()
            .map(|(path, error)| {
                let field = {
                    let s = path.to_string();
                    if s.is_empty() { "value".to_string() } else { s }
                };
                FieldError {
                    field,
                    message: error.message().to_string(),
                    code: "validation".to_string(),
                }
            })
            .collect();
        Self { errors }
    }
}

/// Why a [`Validated`] extractor rejected the request.
///
/// Handlers that want their own wording for body problems can take
/// `Result<Validated<T>, ValidationRejection>` and match on it.
#[derive(Debug)]
pub enum ValidationRejection {
    /// The body was missing, not JSON, or did not match the target shape.
    Json(JsonRejection),
    /// The body deserialized but failed its garde rules.
    Invalid(ValidationErrorResponse),
}

impl From<ValidationRejection> for HttpError {
    fn from(rejection: ValidationRejection) -> Self {
        match rejection {
            ValidationRejection::Json(r) => {
                HttpError::BadRequest(format!("Invalid JSON body: {}", r.body_text()))
            }
            ValidationRejection::Invalid(resp) => HttpError::Validation(resp),
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        HttpError::from(self).into_response()
    }
}

/// An Axum extractor that deserializes JSON and validates it using `garde::Validate`.
///
/// Drop-in replacement for `Json<T>`. Returns a structured 400 response
/// when validation fails.
///
/// ```ignore
/// async fn create(Validated(body): Validated<CreateUserRequest>) -> Json<User> {
///     // body passed its garde rules
/// }
/// ```
pub struct Validated<T>(pub T);

impl<T, S> FromRequest<S> for Validated<T>
where
    T: DeserializeOwned + garde::Validate + 'static,
    T::Context: Default,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;

        value
            .validate()
            .map_err(|report| ValidationRejection::Invalid(ValidationErrorResponse::from_report(&report)))?;

        Ok(Validated(value))
    }
}
