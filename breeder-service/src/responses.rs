//! HTTP response builders with correct status codes
//!
//! - **200 OK** with a `Link` header - [`WithLinks`]
//! - **200 OK** confirmation message - [`Message`]
//! - **201 Created** with `Location` and `Link` headers - [`Created`]
//! - **202 Accepted** with a `Link` header to the status resource - [`Accepted`]
//! - **422 Unprocessable Entity** with field errors - [`ValidationError`]

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

fn insert_header(response: &mut Response, name: header::HeaderName, value: Option<String>) {
    if let Some(value) = value {
        match HeaderValue::from_str(&value) {
            Ok(header_value) => {
                response.headers_mut().insert(name, header_value);
            }
            Err(e) => tracing::warn!(header = %name, "Dropping invalid header value: {}", e),
        }
    }
}

// ============================================================================
// 200 OK
// ============================================================================

/// HTTP 200 response whose body is accompanied by a `Link` header
#[derive(Debug)]
pub struct WithLinks<T> {
    data: T,
    link: Option<String>,
}

impl<T> WithLinks<T> {
    /// Create a new 200 response
    pub fn new(data: T) -> Self {
        Self { data, link: None }
    }

    /// Set the `Link` header value
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl<T: Serialize> IntoResponse for WithLinks<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(&self.data)).into_response();
        insert_header(&mut response, header::LINK, self.link);
        response
    }
}

/// Plain confirmation body: `{"message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// ============================================================================
// 201 Created
// ============================================================================

/// HTTP 201 Created response
///
/// Optionally includes a `Location` header pointing to the new resource and a
/// `Link` header advertising its related resources.
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
    link: Option<String>,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
            link: None,
        }
    }

    /// Add a Location header pointing to the created resource
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the `Link` header value
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();
        insert_header(&mut response, header::LOCATION, self.location);
        insert_header(&mut response, header::LINK, self.link);
        response
    }
}

// ============================================================================
// 202 Accepted
// ============================================================================

/// HTTP 202 Accepted response
///
/// Used when a request has been accepted for processing but processing has
/// not completed. The `Link` header normally points at the status resource.
#[derive(Debug)]
pub struct Accepted<T> {
    data: T,
    link: Option<String>,
}

impl<T> Accepted<T> {
    /// Create a new 202 Accepted response
    pub fn new(data: T) -> Self {
        Self { data, link: None }
    }

    /// Set the `Link` header value
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Accepted<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::ACCEPTED, Json(&self.data)).into_response();
        insert_header(&mut response, header::LINK, self.link);
        response
    }
}

// ============================================================================
// 422 Unprocessable Entity (Validation Errors)
// ============================================================================

/// Field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error code (e.g., "REQUIRED", "TOO_LONG")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// HTTP 422 Unprocessable Entity response
///
/// Used when the request is well-formed but contains semantic errors.
///
/// ```rust
/// use breeder_service::responses::ValidationError;
///
/// let mut errors = ValidationError::new("Validation failed");
/// errors.add_field_error("name", "REQUIRED", "name must not be empty");
/// assert!(errors.has_errors());
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationError {
    error: String,
    code: String,
    status: u16,
    /// Field-level validation errors
    pub errors: HashMap<String, Vec<FieldError>>,
}

impl ValidationError {
    /// Create a new validation error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: "VALIDATION_ERROR".to_string(),
            status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            errors: HashMap::new(),
        }
    }

    /// Add a field-level error
    pub fn add_field_error(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        let field = field.into();
        let error = FieldError {
            field: field.clone(),
            code: code.into(),
            message: message.into(),
        };

        self.errors.entry(field).or_default().push(error);
    }

    /// Check if there are any validation errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of field errors
    pub fn error_count(&self) -> usize {
        self.errors.values().map(|v| v.len()).sum()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} field errors)", self.error, self.error_count())
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}
