// Terminal views
//
// Each view renders store or backend data to a String. Commands decide
// whether to print the text or serialize the data instead.

pub mod cameras;
pub mod dashboard;
pub mod facilities;
pub mod stream;
pub mod violations;

use sitewatch_core::{ClientError, FormError, StoreError};

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Message shown for a failed action.
///
/// Backend rejections carry their own message; transport and decode
/// failures fall back to `fallback`. Local store errors describe themselves.
pub fn store_error_message(err: &StoreError, fallback: &str) -> String {
    match err.as_client_error() {
        Some(e @ ClientError::Api { .. }) => e.to_string(),
        Some(_) => fallback.to_string(),
        None => err.to_string(),
    }
}

/// Message shown for a failed form submission
pub fn form_error_message(err: &FormError, fallback: &str) -> String {
    match err {
        FormError::Store(e) => store_error_message(e, fallback),
        FormError::Invalid(fields) => fields
            .iter()
            .map(|f| format!("  {}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
