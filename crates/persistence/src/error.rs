// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested row was not found.
    NotFound(String),
    /// A guarded update matched no row: the booking's status changed
    /// between read and write.
    StaleStatus {
        /// The booking identifier.
        booking_id: i64,
        /// The status the update required.
        expected: String,
    },
    /// A stored row cannot be mapped back into domain types.
    CorruptRow {
        /// The table the row came from.
        table: String,
        /// Description of the mapping failure.
        reason: String,
    },
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// Initialization error.
    InitializationError(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::StaleStatus {
                booking_id,
                expected,
            } => {
                write!(
                    f,
                    "Booking {booking_id} is no longer '{expected}': not updated"
                )
            }
            Self::CorruptRow { table, reason } => {
                write!(f, "Corrupt row in '{table}': {reason}")
            }
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound(err.to_string()),
            _ => Self::QueryFailed(err.to_string()),
        }
    }
}
