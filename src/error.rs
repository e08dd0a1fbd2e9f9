use thiserror::Error;

/// Errors returned by the accessor surface of the registries and values.
///
/// Rendering itself never fails; these only come from lookups and typed
/// access that a caller asked for explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    /// No rule is registered under the requested key
    #[error("no render rule registered for {0}")]
    KeyNotFound(String),
    /// The value is not of the requested type
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },
    /// An array slot outside the array's fixed length was addressed
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
