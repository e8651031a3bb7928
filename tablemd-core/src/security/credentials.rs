//! Secure credential container with automatic memory zeroing.
//!
//! # Security
//! - Username and password live in `Zeroizing` containers
//! - Memory is cleared when the credentials go out of scope
//! - `Debug` output never includes the password

use zeroize::{Zeroize, Zeroizing};

/// Database login with automatic memory zeroing on drop.
///
/// # Example
///
/// ```rust
/// use tablemd_core::security::Credentials;
///
/// let creds = Credentials::new("scott".to_string(), Some("tiger".to_string()));
/// assert_eq!(creds.username(), "scott");
/// assert!(creds.has_password());
/// assert!(!format!("{creds:?}").contains("tiger"));
/// ```
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Credentials {
    username: Zeroizing<String>,
    password: Zeroizing<Option<String>>,
}

impl Credentials {
    /// Creates new credentials with automatic memory zeroing.
    pub fn new(username: String, password: Option<String>) -> Self {
        Self {
            username: Zeroizing::new(username),
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Gets the password, or an empty string when none was configured.
    ///
    /// Only drivers should call this; never log the result.
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or("")
    }

    /// Checks if a password is present without exposing it.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Replaces the password, e.g. with one read from the terminal.
    pub fn set_password(&mut self, password: String) {
        self.password = Zeroizing::new(Some(password));
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username.as_str())
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}
