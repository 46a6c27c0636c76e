//! Secure container for resolved credentials.

use zeroize::Zeroizing;

/// A credential value whose memory is zeroed on drop and whose `Debug` and
/// `Display` renderings are always masked.
///
/// # Example
/// ```rust
/// use portcheck_core::Secret;
///
/// let secret = Secret::new("hunter2".to_string());
/// assert_eq!(format!("{secret:?}"), "\"****\"");
/// assert_eq!(secret.expose(), "hunter2");
/// ```
#[derive(Clone)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Wraps a resolved credential value
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    /// Gets the underlying value.
    ///
    /// Call sites are the audit surface: the only non-test caller is the
    /// probe handing the password to the database driver.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"****\"")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "****")
    }
}
