use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::{
    book::BookId,
    error::{CatalogError, ParseRoleError},
};

/// Identifier assigned to a user by the catalog, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role label stored with a user. Not used for any access checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// Regular library member
    #[default]
    Member,
    /// Library administrator
    Admin,
}

impl Role {
    /// Lowercase label used in menus and reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(s.trim().to_string())),
        }
    }
}

/// An active loan: which book is held and when it must come back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loan {
    /// The borrowed book
    pub book_id: BookId,
    /// Moment after which the loan counts as overdue
    pub due_date: DateTime<Utc>,
}

impl Loan {
    /// A loan is overdue only once `now` is strictly past the due date
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}

/// A registered library user and the loans they currently hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Catalog-assigned identifier
    id: UserId,
    /// Display name
    name: String,
    /// Contact email, stored as given
    email: String,
    /// Stored role label
    role: Role,
    /// Active loans in borrow order
    loans: Vec<Loan>,
}

impl User {
    /// Create a user with no loans
    pub(crate) fn new(id: UserId, name: String, email: String, role: Role) -> Self {
        Self { id, name, email, role, loans: Vec::new() }
    }

    /// Catalog-assigned identifier
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email as entered
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Stored role label
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Active loans in the order they were taken out
    #[must_use]
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Number of books currently held
    #[must_use]
    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }

    /// Whether this user currently holds the book
    #[must_use]
    pub fn holds(&self, book_id: BookId) -> bool {
        self.loan_for(book_id).is_some()
    }

    /// The active loan for a book, if this user holds it
    #[must_use]
    pub fn loan_for(&self, book_id: BookId) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.book_id == book_id)
    }

    /// Append a loan unless the user is already at `limit`
    pub(crate) fn add_loan(&mut self, loan: Loan, limit: usize) -> Result<(), CatalogError> {
        if self.loans.len() >= limit {
            return Err(CatalogError::BorrowLimitExceeded { user_id: self.id, limit });
        }
        self.loans.push(loan);
        Ok(())
    }

    /// Remove and return the loan for a book, if present
    pub(crate) fn remove_loan(&mut self, book_id: BookId) -> Option<Loan> {
        let pos = self.loans.iter().position(|loan| loan.book_id == book_id)?;
        Some(self.loans.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    /// Fixed reference time for loan due dates
    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).single().unwrap_or_default()
    }

    /// Build a loan for the given book id
    fn loan(book: u32) -> Loan {
        Loan { book_id: BookId(book), due_date: due() }
    }

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" member ".parse::<Role>(), Ok(Role::Member));
        assert_eq!("guest".parse::<Role>(), Err(ParseRoleError("guest".to_string())));
        assert_eq!(Role::default(), Role::Member);
    }

    #[test]
    fn test_add_loan_respects_limit() {
        let mut user =
            User::new(UserId(1), "Alice".into(), "alice@example.com".into(), Role::Member);

        assert!(user.add_loan(loan(1), 2).is_ok());
        assert!(user.add_loan(loan(2), 2).is_ok());
        assert_eq!(
            user.add_loan(loan(3), 2),
            Err(CatalogError::BorrowLimitExceeded { user_id: UserId(1), limit: 2 })
        );
        assert_eq!(user.loan_count(), 2);
        assert!(!user.holds(BookId(3)));
    }

    #[test]
    fn test_remove_loan_keeps_order_of_the_rest() {
        let mut user =
            User::new(UserId(1), "Alice".into(), "alice@example.com".into(), Role::Admin);
        for book in 1..=3 {
            assert!(user.add_loan(loan(book), 5).is_ok());
        }

        assert_eq!(user.remove_loan(BookId(2)), Some(loan(2)));
        assert_eq!(user.remove_loan(BookId(2)), None);

        let remaining: Vec<BookId> = user.loans().iter().map(|l| l.book_id).collect();
        assert_eq!(remaining, vec![BookId(1), BookId(3)]);
    }

    #[test]
    fn test_overdue_boundary_is_strict() {
        let loan = loan(1);
        assert!(!loan.is_overdue_at(due()));
        assert!(!loan.is_overdue_at(due() - TimeDelta::seconds(1)));
        assert!(loan.is_overdue_at(due() + TimeDelta::seconds(1)));
    }
}
