use thiserror::Error;

/// All errors produced by the job dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The database query or connection failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A timestamp column held a value that matched no recognised format.
    #[error("Invalid timestamp in column '{column}': {value}")]
    TimestampParse { column: &'static str, value: String },

    /// A required timestamp column was null.
    #[error("Missing value in timestamp column '{0}'")]
    MissingTimestamp(&'static str),

    /// The salary histogram has no input values to work with.
    #[error("No salary data in the filtered set")]
    EmptySalaryData,

    /// A default filter bound was requested but no records are loaded.
    #[error("No job records loaded")]
    EmptyDataset,

    /// The configured table name is not a plain `schema.table` identifier.
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = DashboardError::TimestampParse {
            column: "created",
            value: "yesterday-ish".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp in column 'created': yesterday-ish"
        );
    }

    #[test]
    fn test_error_display_missing_timestamp() {
        let err = DashboardError::MissingTimestamp("created");
        assert_eq!(err.to_string(), "Missing value in timestamp column 'created'");
    }

    #[test]
    fn test_error_display_empty_salary() {
        let err = DashboardError::EmptySalaryData;
        assert_eq!(err.to_string(), "No salary data in the filtered set");
    }

    #[test]
    fn test_error_display_invalid_table() {
        let err = DashboardError::InvalidTableName("jobs; drop".to_string());
        assert_eq!(err.to_string(), "Invalid table name: jobs; drop");
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("DB_URL is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: DB_URL is not set");
    }

    #[test]
    fn test_error_from_sqlx() {
        let err: DashboardError = sqlx::Error::RowNotFound.into();
        assert!(err.to_string().starts_with("Database error:"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
