//! In-memory library catalog tracking users, books and the loans between them.
//!
//! The [`LibraryCatalog`] owns every user and book and is the only way to
//! open or close a loan. A book is held by at most one user, a user holds at
//! most a fixed number of books, and every loan carries a due date fixed at
//! borrow time. The [`menu`] module provides the interactive text front end.

pub mod book;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod menu;
pub mod observers;
pub mod report;
pub mod user;

pub use book::{Book, BookId, BookStatus};
pub use catalog::{LibraryCatalog, OverdueEntry};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, LoanPolicy, LogFormat, LoggingConfig};
pub use error::{CatalogError, ConfigError};
pub use events::{LoanEvent, LoanTransition};
pub use menu::Menu;
pub use observers::{DueDateReminder, LoanLogger, LoanObserver};
pub use report::CatalogReport;
pub use user::{Loan, Role, User, UserId};
