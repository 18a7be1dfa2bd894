//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A recipient's display name (e.g., alice).
pub type MemberName = String;

/// An external identity handle, such as a GitHub username.
pub type Handle = String;
