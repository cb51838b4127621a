//! Plain-text rendering of catalog query results.

use crate::{
    book::Book,
    catalog::OverdueEntry,
    events::LoanTransition,
    user::User,
};

/// Text views over catalog query results
#[derive(Debug)]
pub struct CatalogReport;

impl CatalogReport {
    /// Lines listing keyword search results
    #[must_use]
    pub fn search_results(keyword: &str, books: &[&Book]) -> String {
        if books.is_empty() {
            return format!("No books found for '{keyword}'");
        }
        let mut lines = vec![format!("Books found for '{keyword}':")];
        lines.extend(books.iter().map(ToString::to_string));
        lines.join("\n")
    }

    /// One line per active loan: overdue, or the date it is due
    #[must_use]
    pub fn overdue(entries: &[OverdueEntry<'_>]) -> String {
        if entries.is_empty() {
            return "No books are currently on loan.".to_string();
        }
        entries.iter().map(Self::loan_line).collect::<Vec<_>>().join("\n")
    }

    /// A user's loans, headed by who they are
    #[must_use]
    pub fn user_loans(user: &User, entries: &[OverdueEntry<'_>]) -> String {
        let header = format!(
            "{} ({}, {}) has {} book(s) on loan",
            user.name(),
            user.email(),
            user.role(),
            entries.len()
        );
        let mut lines = vec![header];
        lines.extend(entries.iter().map(Self::loan_line));
        lines.join("\n")
    }

    /// Numbered loan transitions, oldest first
    #[allow(clippy::arithmetic_side_effects)]
    #[must_use]
    pub fn history(transitions: &[LoanTransition]) -> String {
        if transitions.is_empty() {
            return "No loan activity yet.".to_string();
        }
        let mut lines = vec!["Loan History:".to_string()];
        for (i, transition) in transitions.iter().enumerate() {
            lines.push(format!(
                "{}. [{}] {:?} --({})--> {:?}",
                i + 1,
                transition.timestamp.format("%Y-%m-%d %H:%M"),
                transition.from,
                transition.event,
                transition.to
            ));
        }
        lines.join("\n")
    }

    /// Render one classified loan
    fn loan_line(entry: &OverdueEntry<'_>) -> String {
        if entry.is_overdue {
            format!(
                "{} is overdue! (borrowed by {}, was due {})",
                entry.book.title(),
                entry.user.name(),
                entry.due_date.date_naive()
            )
        } else {
            format!(
                "{} is due on {} (borrowed by {})",
                entry.book.title(),
                entry.due_date.date_naive(),
                entry.user.name()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, TimeZone, Utc};

    use super::*;
    use crate::{
        book::BookId,
        catalog::LibraryCatalog,
        clock::FixedClock,
        config::LoanPolicy,
        error::CatalogError,
        user::{Role, UserId},
    };

    #[test]
    fn test_search_results_text() {
        let mut catalog = LibraryCatalog::new();
        catalog.add_book("Dune", "Frank Herbert", "isbn", "sf");

        let found = catalog.find_books_by_keyword("dune");
        assert_eq!(
            CatalogReport::search_results("dune", &found),
            "Books found for 'dune':\n1: Dune by Frank Herbert"
        );
        assert_eq!(CatalogReport::search_results("xyz", &[]), "No books found for 'xyz'");
    }

    #[test]
    fn test_overdue_and_history_text() -> Result<(), CatalogError> {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).single().unwrap_or_default();
        let clock = Arc::new(FixedClock::new(start));
        let mut catalog = LibraryCatalog::with_clock(
            LoanPolicy::default(),
            Arc::<FixedClock>::clone(&clock),
        );
        let alice = catalog.add_user("Alice", "alice@example.com", Role::Member);
        catalog.add_book("Dune", "Frank Herbert", "isbn", "sf");
        catalog.add_book("Emma", "Jane Austen", "isbn", "classic");

        assert_eq!(
            CatalogReport::overdue(&catalog.report_overdue()),
            "No books are currently on loan."
        );

        catalog.borrow_book(alice, BookId(1))?;
        clock.advance(TimeDelta::days(20));
        catalog.borrow_book(alice, BookId(2))?;

        assert_eq!(
            CatalogReport::overdue(&catalog.report_overdue()),
            "Dune is overdue! (borrowed by Alice, was due 2026-05-15)\n\
             Emma is due on 2026-06-04 (borrowed by Alice)"
        );

        let user = catalog.get_user_by_id(UserId(1))?;
        let text = CatalogReport::user_loans(user, &catalog.loans_for_user(alice)?);
        assert!(text.starts_with("Alice (alice@example.com, member) has 2 book(s) on loan"));

        let history = CatalogReport::history(catalog.loan_history());
        assert!(history.starts_with("Loan History:\n1. [2026-05-01 10:00] Available"));
        assert!(history.contains("2. [2026-05-21 10:00]"));
        Ok(())
    }
}
