use std::fmt;

use crate::{error::CatalogError, user::UserId};

/// Identifier assigned to a book by the catalog, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookId(pub u32);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the possible states of a library book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookStatus {
    /// Book is available for checkout
    #[default]
    Available,
    /// Book is checked out by a user
    CheckedOut(UserId),
}

impl BookStatus {
    /// Get a human-readable description of the current state
    #[must_use]
    pub fn get_description(&self) -> String {
        match self {
            Self::Available => "Book is available for checkout".to_string(),
            Self::CheckedOut(user) => format!("Book is checked out by user {user}"),
        }
    }

    /// The user holding the book, if any
    #[must_use]
    pub fn holder(self) -> Option<UserId> {
        match self {
            Self::Available => None,
            Self::CheckedOut(user) => Some(user),
        }
    }
}

/// A single-copy title in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Catalog-assigned identifier
    id: BookId,
    /// Title of the book
    title: String,
    /// Author of the book
    author: String,
    /// ISBN, stored as given
    isbn: String,
    /// Free-form genre label
    genre: String,
    /// Whether the book is on the shelf or with a user
    status: BookStatus,
}

impl Book {
    /// Create an available book
    pub(crate) fn new(
        id: BookId,
        title: String,
        author: String,
        isbn: String,
        genre: String,
    ) -> Self {
        Self { id, title, author, isbn, genre, status: BookStatus::Available }
    }

    /// Catalog-assigned identifier
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Title as entered
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author as entered
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// ISBN as entered
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// Genre label as entered
    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Current shelf status
    #[must_use]
    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// The user holding the book, if any
    #[must_use]
    pub fn holder(&self) -> Option<UserId> {
        self.status.holder()
    }

    /// Whether the book can be borrowed right now
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// Case-insensitive substring match against title or author.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_keyword(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }

    /// Mark the book as held by `user`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::BookUnavailable` if anyone already holds it,
    /// including `user` itself.
    pub(crate) fn check_out(&mut self, user: UserId) -> Result<(), CatalogError> {
        match self.status {
            BookStatus::CheckedOut(holder) => {
                Err(CatalogError::BookUnavailable { book_id: self.id, holder })
            }
            BookStatus::Available => {
                self.status = BookStatus::CheckedOut(user);
                Ok(())
            }
        }
    }

    /// Put the book back on the shelf, returning who had it
    pub(crate) fn check_in(&mut self) -> Option<UserId> {
        std::mem::take(&mut self.status).holder()
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} by {}", self.id, self.title, self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Book fixture with a fixed id
    fn dune() -> Book {
        Book::new(
            BookId(1),
            "Dune".to_string(),
            "Frank Herbert".to_string(),
            "978-0441013593".to_string(),
            "Science Fiction".to_string(),
        )
    }

    #[test]
    fn test_new_book_is_available() {
        let book = dune();
        assert!(book.is_available());
        assert_eq!(book.holder(), None);
        assert_eq!(book.to_string(), "1: Dune by Frank Herbert");
    }

    #[test]
    fn test_check_out_rejects_any_second_holder() {
        let mut book = dune();
        assert!(book.check_out(UserId(7)).is_ok());
        assert_eq!(book.status(), BookStatus::CheckedOut(UserId(7)));

        let same_user = book.check_out(UserId(7));
        assert_eq!(
            same_user,
            Err(CatalogError::BookUnavailable { book_id: BookId(1), holder: UserId(7) })
        );
        assert!(book.check_out(UserId(8)).is_err());
        assert_eq!(book.holder(), Some(UserId(7)));
    }

    #[test]
    fn test_check_in_clears_holder() {
        let mut book = dune();
        assert_eq!(book.check_in(), None);

        assert!(book.check_out(UserId(2)).is_ok());
        assert_eq!(book.check_in(), Some(UserId(2)));
        assert!(book.is_available());
    }

    #[test]
    fn test_keyword_matches_title_or_author() {
        let book = dune();
        assert!(book.matches_keyword("dune"));
        assert!(book.matches_keyword("herb"));
        assert!(book.matches_keyword(""));
        assert!(!book.matches_keyword("xyz"));
    }

    #[test]
    fn test_status_description() {
        assert_eq!(BookStatus::Available.get_description(), "Book is available for checkout");
        assert_eq!(
            BookStatus::CheckedOut(UserId(3)).get_description(),
            "Book is checked out by user 3"
        );
    }
}
