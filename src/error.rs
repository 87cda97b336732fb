//! Error kinds raised by the statistics engine and its collaborators.

use thiserror::Error;

/// Failure of a single statistic, a record check, or the out-of-band lookup.
///
/// Every variant is fatal to the report being built: the assembler never
/// substitutes a default for a failed statistic.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("no records available to compute '{stat}'")]
    EmptyInput { stat: &'static str },
    #[error("comment '{id}' could not be found")]
    NotFound { id: String },
    #[error("malformed record '{record}': {reason}")]
    MalformedRecord { record: String, reason: String },
    #[error("comment lookup failed: {0}")]
    Lookup(String),
}

impl StatsError {
    pub fn empty(stat: &'static str) -> Self {
        StatsError::EmptyInput { stat }
    }

    pub fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        StatsError::MalformedRecord {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

pub type StatsResult<T> = Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StatsError::empty("best_post").to_string(),
            "no records available to compute 'best_post'"
        );
        assert_eq!(
            StatsError::malformed("c1", "missing parent prefix").to_string(),
            "malformed record 'c1': missing parent prefix"
        );
        let not_found = StatsError::NotFound {
            id: "abc".to_string(),
        };
        assert!(not_found.to_string().contains("abc"));
    }
}
