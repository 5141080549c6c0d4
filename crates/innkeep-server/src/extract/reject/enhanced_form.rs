use axum::extract::rejection::FormRejection;
use axum::extract::{Form as AxumForm, FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Tracing target for form extraction.
const TRACING_TARGET: &str = "innkeep_server::extract::form";

/// URL-encoded form extractor with readable rejections.
///
/// Used by the OAuth2 password flow at `/token`, which posts
/// `application/x-www-form-urlencoded` bodies.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    /// Creates a new [`Form`] wrapper around the provided form data.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes the wrapper and returns the inner form data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumForm::<T>::from_request(req, state).await {
            Ok(AxumForm(form)) => Ok(Form(form)),
            Err(rejection) => Err(enhance_form_error(rejection)),
        }
    }
}

/// Converts a form rejection into an error naming the offending field.
fn enhance_form_error(rejection: FormRejection) -> Error<'static> {
    tracing::debug!(
        target: TRACING_TARGET,
        error = %rejection,
        "form data parsing failed"
    );

    match rejection {
        FormRejection::FailedToDeserializeForm(err) => {
            let error_message = err.body_text();

            if error_message.contains("missing field") {
                let field_name = extract_field_name_from_error(&error_message);
                ErrorKind::BadRequest.with_message(format!(
                    "The form field '{}' is required but was not provided",
                    field_name.unwrap_or("unknown")
                ))
            } else if error_message.contains("duplicate field") {
                let field_name = extract_field_name_from_error(&error_message);
                ErrorKind::BadRequest.with_message(format!(
                    "The form field '{}' was provided more than once",
                    field_name.unwrap_or("unknown")
                ))
            } else {
                ErrorKind::BadRequest
                    .with_message("Invalid form data")
                    .with_context(error_message)
            }
        }
        FormRejection::InvalidFormContentType(_) => ErrorKind::BadRequest
            .with_message("Expected 'application/x-www-form-urlencoded' content type"),
        FormRejection::BytesRejection(err) => ErrorKind::BadRequest
            .with_message("Failed to read form data")
            .with_context(err.to_string()),
        _ => ErrorKind::BadRequest.with_message("Invalid form submission"),
    }
}

/// Extracts the field name from a serde error message, best effort.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    if let Some(start) = error_message.find('`')
        && let Some(end) = error_message[start + 1..].find('`')
    {
        return Some(&error_message[start + 1..start + 1 + end]);
    }

    ["missing field ", "duplicate field "]
        .iter()
        .find_map(|pattern| {
            let start = error_message.find(pattern)? + pattern.len();
            let field_part = &error_message[start..];
            Some(field_part.split(' ').next().unwrap_or(field_part).trim())
        })
}

impl<T> aide::OperationInput for Form<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumForm::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumForm::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_field_name_patterns() {
        assert_eq!(
            extract_field_name_from_error("missing field `username`"),
            Some("username")
        );
        assert_eq!(
            extract_field_name_from_error("missing field password at line 1"),
            Some("password")
        );
        assert_eq!(
            extract_field_name_from_error("duplicate field password"),
            Some("password")
        );
        assert_eq!(extract_field_name_from_error("some other error"), None);
    }

    #[test]
    fn form_deref() {
        let form = Form::new("guest@example.com".to_string());
        assert_eq!(*form, "guest@example.com");
        assert_eq!(form.into_inner(), "guest@example.com");
    }
}
