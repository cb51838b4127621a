use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{book::BookId, user::UserId};

/// Failures reported by catalog lending and lookup operations.
///
/// Every variant is an expected, recoverable outcome. A failed operation
/// leaves the catalog exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No user is registered under the given identifier
    #[error("User with ID {0} not found")]
    UserNotFound(UserId),
    /// No book is registered under the given identifier
    #[error("Book with ID {0} not found")]
    BookNotFound(BookId),
    /// The user already holds the maximum number of books
    #[error("User {user_id} cannot borrow more than {limit} books")]
    BorrowLimitExceeded {
        /// User that attempted the borrow
        user_id: UserId,
        /// Active borrow limit
        limit: usize,
    },
    /// The book is already checked out, possibly by the same user
    #[error("Book {book_id} is currently borrowed by user {holder}")]
    BookUnavailable {
        /// Requested book
        book_id: BookId,
        /// Current holder of the book
        holder: UserId,
    },
    /// The user has no active loan for the book
    #[error("User {user_id} does not have book {book_id} borrowed")]
    LoanNotFound {
        /// User attempting the return
        user_id: UserId,
        /// Book being returned
        book_id: BookId,
    },
    /// The loan period pushes the due date past the representable range
    #[error("Cannot compute a due date for book {book_id} from {borrowed_at}")]
    DueDateOutOfRange {
        /// Requested book
        book_id: BookId,
        /// Time of the borrow attempt
        borrowed_at: DateTime<Utc>,
    },
    /// Book holders and user loan lists disagree
    #[error("Catalog is inconsistent: {0}")]
    Inconsistent(String),
}

/// Failures while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path that was read
        path: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for [`crate::config::Config`]
    #[error("Failed to parse config from {origin}: {source}")]
    Parse {
        /// Where the JSON came from
        origin: String,
        /// Underlying parse failure
        source: serde_json::Error,
    },
    /// A value parsed but is outside its allowed range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// A user type string that is neither `member` nor `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown user type '{0}', expected member or admin")]
pub struct ParseRoleError(pub String);
