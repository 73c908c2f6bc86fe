//! Result type alias for bxconfig

use super::errors::SdkError;

/// Result type alias for bxconfig operations
///
/// # Examples
///
/// ```
/// use bxconfig::domain::result::Result;
/// use bxconfig::domain::errors::SdkError;
///
/// fn failing_function() -> Result<()> {
///     Err(SdkError::Decode("unexpected end of input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SdkError>;
