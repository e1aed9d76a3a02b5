//! Status code policy
//!
//! Any status outside 200-299 becomes a [`CosmosClientError`] naming the
//! operation and the status.

use crate::domain::{CosmosClientError, RepoError, Result};

/// Whether `status` is in the 2xx range
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Fails with [`RepoError::Client`] unless `status` is 2xx
///
/// # Examples
///
/// ```
/// use cosmos_repo::repository::status::ensure_success;
///
/// assert!(ensure_success(201, "insert element").is_ok());
///
/// let err = ensure_success(412, "update element").unwrap_err();
/// assert_eq!(err.to_string(), "Cannot update element response code 412");
/// assert_eq!(err.status(), Some(412));
/// ```
pub fn ensure_success(status: u16, operation: &str) -> Result<()> {
    if is_success_status(status) {
        return Ok(());
    }

    tracing::warn!(status, operation, "Operation returned non-success status");
    Err(RepoError::Client(CosmosClientError::from_status(
        operation, status,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(200, true)]
    #[test_case(201, true)]
    #[test_case(204, true)]
    #[test_case(299, true)]
    #[test_case(199, false)]
    #[test_case(300, false)]
    #[test_case(404, false)]
    #[test_case(503, false)]
    fn test_is_success_status(status: u16, expected: bool) {
        assert_eq!(is_success_status(status), expected);
    }

    #[test]
    fn test_ensure_success_carries_status() {
        match ensure_success(503, "delete element") {
            Err(RepoError::Client(e)) => {
                assert_eq!(e.status(), Some(503));
                assert!(e.message().contains("delete element"));
            }
            other => panic!("Expected client error, got {other:?}"),
        }
    }
}
