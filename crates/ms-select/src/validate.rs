//! Collapse model failures into one collection-level error

use ms_models::ModelError;

use crate::error::{Result, SelectError};

/// Run `computation`, turning any [`ModelError`] into
/// [`SelectError::InvalidModelCollection`].
///
/// The message is the same whatever went wrong; the underlying error stays
/// available through `source()` and is logged.
pub fn run_guarded<T, F>(computation: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, ModelError>,
{
    computation().map_err(|err| {
        tracing::warn!(error = %err, "model collection operation failed");
        SelectError::InvalidModelCollection { source: Some(err) }
    })
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_success_passes_through() {
        assert_eq!(run_guarded(|| Ok(42)).unwrap(), 42);
    }

    #[test]
    fn test_failure_keeps_cause() {
        let err = run_guarded::<(), _>(|| {
            Err(ModelError::Unsupported {
                operation: "anova".to_string(),
                model: "test".to_string(),
            })
        })
        .unwrap_err();

        assert!(matches!(err, SelectError::InvalidModelCollection { .. }));
        assert!(err.to_string().contains("valid fitted model objects"));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("anova is not supported"));
    }
}
