//! Classification of verification failures.
//!
//! Explorers report failures as free text, so classification is a
//! case-insensitive substring match. Swap the classifier on the retrier if a
//! backend exposes structured error codes.

/// How a verification failure should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Source is already published; treated as success.
    AlreadyVerified,
    /// Retry after backing off.
    RateLimited,
    /// Give up immediately.
    Other,
}

/// Signature of a pluggable classifier.
pub type Classifier = fn(&str) -> FailureClass;

/// Default classifier for explorer error messages.
///
/// "already verified" takes precedence over the rate-limit markers.
pub fn classify_failure(message: &str) -> FailureClass {
    let message = message.to_lowercase();
    if message.contains("already verified") {
        FailureClass::AlreadyVerified
    } else if message.contains("too many requests") || message.contains("429") {
        FailureClass::RateLimited
    } else {
        FailureClass::Other
    }
}
