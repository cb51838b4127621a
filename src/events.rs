use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    book::{BookId, BookStatus},
    user::UserId,
};

/// Events that open or close a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanEvent {
    /// A user took a book out
    Borrowed {
        /// Borrowing user
        user_id: UserId,
        /// Borrowed book
        book_id: BookId,
        /// When the book must be back
        due_date: DateTime<Utc>,
    },
    /// A user brought a book back
    Returned {
        /// Returning user
        user_id: UserId,
        /// Returned book
        book_id: BookId,
        /// Due date of the loan that was closed
        due_date: DateTime<Utc>,
    },
}

impl LoanEvent {
    /// User who borrowed or returned
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Borrowed { user_id, .. } | Self::Returned { user_id, .. } => *user_id,
        }
    }

    /// Book that changed hands
    #[must_use]
    pub fn book_id(&self) -> BookId {
        match self {
            Self::Borrowed { book_id, .. } | Self::Returned { book_id, .. } => *book_id,
        }
    }

    /// Due date of the loan this event opened or closed
    #[must_use]
    pub fn due_date(&self) -> DateTime<Utc> {
        match self {
            Self::Borrowed { due_date, .. } | Self::Returned { due_date, .. } => *due_date,
        }
    }
}

impl fmt::Display for LoanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed { user_id, book_id, due_date } => write!(
                f,
                "book {book_id} borrowed by user {user_id}, due {}",
                due_date.date_naive()
            ),
            Self::Returned { user_id, book_id, .. } => {
                write!(f, "book {book_id} returned by user {user_id}")
            }
        }
    }
}

/// Represents a loan transition recorded by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanTransition {
    /// The book status before the transition
    pub from: BookStatus,
    /// The book status after the transition
    pub to: BookStatus,
    /// The event that triggered the transition
    pub event: LoanEvent,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl LoanTransition {
    /// A return recorded after the loan's due date
    #[must_use]
    pub fn is_late_return(&self) -> bool {
        matches!(self.event, LoanEvent::Returned { due_date, .. } if due_date < self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    /// Due date shared by the fixtures
    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 18, 30, 0).single().unwrap_or_default()
    }

    /// A return transition recorded at `returned_at`
    fn returned(returned_at: DateTime<Utc>) -> LoanTransition {
        LoanTransition {
            from: BookStatus::CheckedOut(UserId(1)),
            to: BookStatus::Available,
            event: LoanEvent::Returned { user_id: UserId(1), book_id: BookId(4), due_date: due() },
            timestamp: returned_at,
        }
    }

    #[test]
    fn test_event_accessors_and_display() {
        let event = LoanEvent::Borrowed { user_id: UserId(2), book_id: BookId(5), due_date: due() };
        assert_eq!(event.user_id(), UserId(2));
        assert_eq!(event.book_id(), BookId(5));
        assert_eq!(event.to_string(), "book 5 borrowed by user 2, due 2026-02-10");

        let event = LoanEvent::Returned { user_id: UserId(2), book_id: BookId(5), due_date: due() };
        assert_eq!(event.to_string(), "book 5 returned by user 2");
        assert_eq!(event.due_date(), due());
    }

    #[test]
    fn test_late_return_detection() {
        assert!(!returned(due()).is_late_return());
        assert!(!returned(due() - TimeDelta::days(1)).is_late_return());
        assert!(returned(due() + TimeDelta::minutes(1)).is_late_return());
    }
}
