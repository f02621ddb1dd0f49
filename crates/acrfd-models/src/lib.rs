//! Data models for ACRFD.
//!
//! Records as returned by the public API. Every field other than the
//! identifier is optional; the backend omits whatever it does not know.
//! Fields that only exist once a record has been populated by the
//! application service (documents, current comment period, decision,
//! features) are skipped when absent.

mod application;
mod comment_period;
mod decision;
mod document;
mod feature;
mod organization;

pub use application::*;
pub use comment_period::*;
pub use decision::*;
pub use document::*;
pub use feature::*;
pub use organization::*;

/// Replace escaped newlines (`\n` as two characters, as stored by the API)
/// with real newlines.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Apply [`unescape_newlines`] to an optional text field in place.
pub fn unescape_field(field: &mut Option<String>) {
    if let Some(text) = field.as_mut() {
        if text.contains("\\n") {
            *text = unescape_newlines(text);
        }
    }
}
