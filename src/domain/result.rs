//! Result type alias for the repository
//!
//! This module provides a convenient Result type alias that uses RepoError
//! as the error type.

use super::errors::RepoError;

/// Result type alias for repository operations
///
/// # Examples
///
/// ```
/// use cosmos_repo::domain::result::Result;
/// use cosmos_repo::domain::errors::RepoError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RepoError::Format("not-a-guid".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RepoError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(RepoError::Disposed);
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
