//! Request extractors that reject with [`ErrorResponse`] bodies.
//!
//! Drop-in replacements for their axum counterparts: same extraction, but a
//! failure becomes a [`handler::Error`] with a readable message instead of a
//! plain-text rejection.
//!
//! [`ErrorResponse`]: crate::handler::response::ErrorResponse
//! [`handler::Error`]: crate::handler::Error

mod enhanced_form;
mod enhanced_json;
mod enhanced_path;
mod validated_json;

pub use self::enhanced_form::Form;
pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::validated_json::ValidateJson;

/// Keeps the first lines of an error message, capped at `max_chars`.
fn sanitize_error_message(message: &str, max_lines: usize, max_chars: usize) -> String {
    message
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sanitize_error_message;

    #[test]
    fn sanitize_truncates_lines_and_length() {
        let message = "first line\nsecond line\nthird line";
        assert_eq!(sanitize_error_message(message, 2, 200), "first line second line");
        assert_eq!(sanitize_error_message(message, 3, 5), "first");
    }
}
