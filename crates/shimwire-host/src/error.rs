//! Error types for the host boundary.

/// A fault raised by the host runtime when a member is applied.
///
/// These are the host's own complaints: the symbol layer above wraps them
/// into its `InvocationError` together with the version and member name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostFault {
    /// The member is private and its reflective view was not opened.
    #[error("illegal access to private member {member}")]
    IllegalAccess { member: String },

    /// A value or argument does not match the member's declared shape.
    #[error("type mismatch on {member}: expected {expected}, got {actual}")]
    TypeMismatch {
        member: String,
        expected: String,
        actual: String,
    },

    /// Wrong number of arguments for a method or constructor.
    #[error("{member} takes {expected} argument(s), got {actual}")]
    ArityMismatch {
        member: String,
        expected: usize,
        actual: usize,
    },

    /// The target object is not an instance of the member's declaring class.
    #[error("{target} is not an instance of {owner}")]
    WrongTarget { target: String, owner: String },

    /// Host code itself raised while running a method or constructor body.
    #[error("host raised: {0}")]
    Raised(String),
}
