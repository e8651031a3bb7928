//! Credential handling.
//!
//! Passwords read from the properties file (or the terminal) are moved into
//! [`Credentials`] immediately and only handed to the database driver at
//! connect time.

mod credentials;

pub use credentials::Credentials;
