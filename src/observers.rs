use tracing::{info, warn};

use crate::events::{LoanEvent, LoanTransition};

/// Trait for loan transition observation
pub trait LoanObserver {
    /// Called after a borrow or return has been fully applied
    fn on_loan_event(&self, transition: &LoanTransition);
}

/// Logs all transitions that occur in the catalog
#[derive(Debug)]
pub struct LoanLogger;

impl LoanObserver for LoanLogger {
    fn on_loan_event(&self, transition: &LoanTransition) {
        info!(
            user_id = %transition.event.user_id(),
            book_id = %transition.event.book_id(),
            from = ?transition.from,
            to = ?transition.to,
            "loan transition: {}",
            transition.event
        );
    }
}

/// Reports due dates on checkout and flags late returns
#[derive(Debug)]
pub struct DueDateReminder;

impl LoanObserver for DueDateReminder {
    fn on_loan_event(&self, transition: &LoanTransition) {
        match transition.event {
            LoanEvent::Borrowed { book_id, due_date, .. } => {
                info!(%book_id, due = %due_date.date_naive(), "book checked out");
            }
            LoanEvent::Returned { user_id, book_id, due_date } if transition.is_late_return() => {
                warn!(
                    %user_id,
                    %book_id,
                    due = %due_date.date_naive(),
                    "book returned after its due date"
                );
            }
            LoanEvent::Returned { .. } => {}
        }
    }
}
