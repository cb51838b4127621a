use std::{collections::BTreeMap, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    book::{Book, BookId, BookStatus},
    clock::{Clock, SystemClock},
    config::LoanPolicy,
    error::CatalogError,
    events::{LoanEvent, LoanTransition},
    observers::LoanObserver,
    user::{Loan, Role, User, UserId},
};

/// One active loan, classified against the time of the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueEntry<'a> {
    /// Holder of the loan
    pub user: &'a User,
    /// Borrowed book
    pub book: &'a Book,
    /// When the book is due back
    pub due_date: DateTime<Utc>,
    /// `due_date` is strictly before the time of the query
    pub is_overdue: bool,
}

/// The library catalog: owns every user and book and arbitrates every loan
pub struct LibraryCatalog {
    /// Registered users keyed by id, iterated in registration order
    users: BTreeMap<UserId, User>,
    /// Registered books keyed by id, iterated in registration order
    books: BTreeMap<BookId, Book>,
    /// Next user id to hand out
    next_user_id: u32,
    /// Next book id to hand out
    next_book_id: u32,
    /// Lending rules
    policy: LoanPolicy,
    /// Time source for due dates and overdue checks
    clock: Arc<dyn Clock>,
    /// Recent successful loan transitions, oldest first
    history: Vec<LoanTransition>,
    /// Registered loan observers
    observers: Vec<Box<dyn LoanObserver>>,
}

// Manual implementation of Debug for LibraryCatalog
impl fmt::Debug for LibraryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryCatalog")
            .field("users", &self.users)
            .field("books", &self.books)
            .field("next_user_id", &self.next_user_id)
            .field("next_book_id", &self.next_book_id)
            .field("policy", &self.policy)
            .field("history", &self.history)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for LibraryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryCatalog {
    /// Create an empty catalog with the standard policy and the wall clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoanPolicy::default())
    }

    /// Create an empty catalog with a custom policy and the wall clock
    #[must_use]
    pub fn with_config(policy: LoanPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Create an empty catalog with a custom policy and time source
    #[must_use]
    pub fn with_clock(policy: LoanPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: BTreeMap::new(),
            books: BTreeMap::new(),
            next_user_id: 1,
            next_book_id: 1,
            policy,
            clock,
            history: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of loan transitions
    pub fn register_observer(&mut self, observer: Box<dyn LoanObserver>) {
        self.observers.push(observer);
    }

    /// Lending rules in effect
    #[must_use]
    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    /// Register a user and return the id assigned to them
    pub fn add_user(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> UserId {
        let id = UserId(self.next_user_id);
        self.next_user_id = self.next_user_id.saturating_add(1);

        let user = User::new(id, name.into(), email.into(), role);
        info!(user_id = %id, name = user.name(), %role, "user added");
        self.users.insert(id, user);
        id
    }

    /// Register a book and return the id assigned to it
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        genre: impl Into<String>,
    ) -> BookId {
        let id = BookId(self.next_book_id);
        self.next_book_id = self.next_book_id.saturating_add(1);

        let book = Book::new(id, title.into(), author.into(), isbn.into(), genre.into());
        info!(book_id = %id, title = book.title(), "book added");
        self.books.insert(id, book);
        id
    }

    /// Books whose title or author contains `keyword`, ignoring case, in
    /// registration order
    #[must_use]
    pub fn find_books_by_keyword(&self, keyword: &str) -> Vec<&Book> {
        let needle = keyword.to_lowercase();
        self.books.values().filter(|book| book.matches_keyword(&needle)).collect()
    }

    /// Look up a user
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UserNotFound` if no user has this id.
    pub fn get_user_by_id(&self, id: UserId) -> Result<&User, CatalogError> {
        self.users.get(&id).ok_or(CatalogError::UserNotFound(id))
    }

    /// Look up a book
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::BookNotFound` if no book has this id.
    pub fn get_book_by_id(&self, id: BookId) -> Result<&Book, CatalogError> {
        self.books.get(&id).ok_or(CatalogError::BookNotFound(id))
    }

    /// All users in registration order
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// All books in registration order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Number of registered users
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of registered books
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Lend a book to a user for the policy's loan period.
    ///
    /// Either both the book's holder and the user's loan list change, or
    /// neither does.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` / `BookNotFound` if an id does not resolve
    /// - `BorrowLimitExceeded` if the user already holds the maximum
    /// - `BookUnavailable` if anyone, including this user, holds the book
    /// - `DueDateOutOfRange` if the loan period overflows the calendar
    pub fn borrow_book(&mut self, user_id: UserId, book_id: BookId) -> Result<Loan, CatalogError> {
        let now = self.clock.now();
        let limit = self.policy.borrow_limit;

        let user = self.users.get_mut(&user_id).ok_or(CatalogError::UserNotFound(user_id))?;
        let book = self.books.get_mut(&book_id).ok_or(CatalogError::BookNotFound(book_id))?;

        if user.loan_count() >= limit {
            debug!(%user_id, %book_id, limit, "borrow rejected: limit reached");
            return Err(CatalogError::BorrowLimitExceeded { user_id, limit });
        }

        let due_date = now
            .checked_add_signed(self.policy.loan_period())
            .ok_or(CatalogError::DueDateOutOfRange { book_id, borrowed_at: now })?;

        let from = book.status();
        if let Err(err) = book.check_out(user_id) {
            debug!(%user_id, %book_id, status = ?from, "borrow rejected: book unavailable");
            return Err(err);
        }

        let loan = Loan { book_id, due_date };
        if let Err(err) = user.add_loan(loan, limit) {
            book.check_in();
            return Err(err);
        }
        let to = book.status();

        self.record(
            LoanEvent::Borrowed { user_id, book_id, due_date: loan.due_date },
            from,
            to,
            now,
        );
        Ok(loan)
    }

    /// Close the user's loan for a book and put the book back on the shelf.
    ///
    /// Returns the loan that was closed.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` / `BookNotFound` if an id does not resolve
    /// - `LoanNotFound` if this user does not currently hold the book
    /// - `Inconsistent` if the user's loan and the book's holder disagree
    pub fn return_book(&mut self, user_id: UserId, book_id: BookId) -> Result<Loan, CatalogError> {
        let now = self.clock.now();

        let user = self.users.get_mut(&user_id).ok_or(CatalogError::UserNotFound(user_id))?;
        let book = self.books.get_mut(&book_id).ok_or(CatalogError::BookNotFound(book_id))?;

        if !user.holds(book_id) {
            debug!(%user_id, %book_id, "return rejected: no such loan");
            return Err(CatalogError::LoanNotFound { user_id, book_id });
        }
        let from = book.status();
        if from.holder() != Some(user_id) {
            return Err(CatalogError::Inconsistent(format!(
                "user {user_id} has a loan for book {book_id} but the book status is {from:?}"
            )));
        }

        let loan =
            user.remove_loan(book_id).ok_or(CatalogError::LoanNotFound { user_id, book_id })?;
        book.check_in();
        let to = book.status();

        self.record(
            LoanEvent::Returned { user_id, book_id, due_date: loan.due_date },
            from,
            to,
            now,
        );
        Ok(loan)
    }

    /// Every active loan across all users, classified against the current
    /// time. Ordered by user registration, then by borrow order.
    #[must_use]
    pub fn report_overdue(&self) -> Vec<OverdueEntry<'_>> {
        let now = self.clock.now();
        self.users.values().flat_map(|user| self.classify_loans(user, now)).collect()
    }

    /// Active loans of one user with their overdue flags
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UserNotFound` if no user has this id.
    pub fn loans_for_user(&self, user_id: UserId) -> Result<Vec<OverdueEntry<'_>>, CatalogError> {
        let user = self.get_user_by_id(user_id)?;
        Ok(self.classify_loans(user, self.clock.now()).collect())
    }

    /// Recent loan transitions, oldest first
    #[must_use]
    pub fn loan_history(&self) -> &[LoanTransition] {
        &self.history
    }

    /// Verify that book holders and user loan lists agree and that no user
    /// is over the borrow limit.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Inconsistent` describing the first violation.
    pub fn check_consistency(&self) -> Result<(), CatalogError> {
        for user in self.users.values() {
            if user.loan_count() > self.policy.borrow_limit {
                return Err(CatalogError::Inconsistent(format!(
                    "user {} holds {} books, limit is {}",
                    user.id(),
                    user.loan_count(),
                    self.policy.borrow_limit
                )));
            }
            for loan in user.loans() {
                let holder = self.books.get(&loan.book_id).and_then(Book::holder);
                if holder != Some(user.id()) {
                    return Err(CatalogError::Inconsistent(format!(
                        "user {} has a loan for book {} held by {holder:?}",
                        user.id(),
                        loan.book_id
                    )));
                }
            }
        }

        for book in self.books.values() {
            if let Some(holder) = book.holder() {
                let holds = self.users.get(&holder).is_some_and(|user| user.holds(book.id()));
                if !holds {
                    return Err(CatalogError::Inconsistent(format!(
                        "book {} is checked out by user {holder} who has no loan for it",
                        book.id()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Pair each of a user's loans with its book and overdue flag
    fn classify_loans<'a>(
        &'a self,
        user: &'a User,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = OverdueEntry<'a>> {
        user.loans().iter().filter_map(move |loan| {
            let book = self.books.get(&loan.book_id)?;
            Some(OverdueEntry {
                user,
                book,
                due_date: loan.due_date,
                is_overdue: loan.is_overdue_at(now),
            })
        })
    }

    /// Append a transition to history and notify observers
    fn record(
        &mut self,
        event: LoanEvent,
        from: BookStatus,
        to: BookStatus,
        timestamp: DateTime<Utc>,
    ) {
        let transition = LoanTransition { from, to, event, timestamp };

        for observer in &self.observers {
            observer.on_loan_event(&transition);
        }

        self.history.push(transition);

        // Maintain history size limit
        if self.history.len() > self.policy.max_history_size {
            self.history.remove(0);
        }
    }
}
