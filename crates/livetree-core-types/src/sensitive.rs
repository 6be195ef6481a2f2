//! Sensitive data marker for automatic redaction
//!
//! Document text belongs to the user. `Sensitive<T>` lets the reconciler
//! log *that* content was supplied, and how much of it, without ever
//! writing the content itself.

use std::fmt;

/// Wrapper that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use livetree_core_types::Sensitive;
///
/// let text = Sensitive::new("Dear diary");
/// assert_eq!(format!("{:?}", text), "***REDACTED***");
/// assert_eq!(format!("{}", text), "***REDACTED***");
/// assert_eq!(text.expose(), &"Dear diary");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<str>> Sensitive<T> {
    /// Length in bytes of the wrapped text, safe to log
    pub fn redacted_len(&self) -> usize {
        self.0.as_ref().len()
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}
