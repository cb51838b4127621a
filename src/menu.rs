//! Interactive text menu over a [`LibraryCatalog`].
//!
//! The menu reads raw lines, turns them into typed arguments and prints the
//! outcome of every catalog call. It never touches catalog state except
//! through the catalog's own operations.

use std::io::{self, BufRead, Write};

use colored::{ColoredString, Colorize};

use crate::{
    book::BookId,
    catalog::LibraryCatalog,
    report::CatalogReport,
    user::{Role, UserId},
};

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Register a user
    AddUser,
    /// Register a book
    AddBook,
    /// Lend a book
    BorrowBook,
    /// Take a book back
    ReturnBook,
    /// Keyword search over titles and authors
    SearchBooks,
    /// List every active loan with its due status
    CheckOverdue,
    /// Leave the menu
    Exit,
    /// List one user's loans
    UserLoans,
    /// Show recent loan transitions
    LoanHistory,
}

impl MenuChoice {
    /// Menu entries in display order
    pub const ALL: [Self; 9] = [
        Self::AddUser,
        Self::AddBook,
        Self::BorrowBook,
        Self::ReturnBook,
        Self::SearchBooks,
        Self::CheckOverdue,
        Self::Exit,
        Self::UserLoans,
        Self::LoanHistory,
    ];

    /// Parse the number typed at the menu prompt
    #[must_use]
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::AddUser),
            "2" => Some(Self::AddBook),
            "3" => Some(Self::BorrowBook),
            "4" => Some(Self::ReturnBook),
            "5" => Some(Self::SearchBooks),
            "6" => Some(Self::CheckOverdue),
            "7" => Some(Self::Exit),
            "8" => Some(Self::UserLoans),
            "9" => Some(Self::LoanHistory),
            _ => None,
        }
    }

    /// Text shown next to the choice number
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AddUser => "Add User",
            Self::AddBook => "Add Book",
            Self::BorrowBook => "Borrow Book",
            Self::ReturnBook => "Return Book",
            Self::SearchBooks => "Search Book",
            Self::CheckOverdue => "Check Overdue Books",
            Self::Exit => "Exit",
            Self::UserLoans => "Show User Loans",
            Self::LoanHistory => "Show Loan History",
        }
    }
}

/// How a line of output should be styled
#[derive(Debug, Clone, Copy)]
enum Tone {
    /// Menu title
    Heading,
    /// Informational text
    Plain,
    /// An operation went through
    Success,
    /// An operation was refused
    Failure,
    /// The input itself was unusable
    Warning,
}

impl Tone {
    /// Apply this tone's colors
    fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Heading => text.green().bold(),
            Self::Plain => text.normal(),
            Self::Success => text.green(),
            Self::Failure => text.red(),
            Self::Warning => text.yellow(),
        }
    }
}

/// Whether the menu loop keeps going after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Show the menu again
    Continue,
    /// Input ended
    Stop,
}

/// Result of prompting for a user id and a book id
#[derive(Debug, Clone, Copy)]
enum IdPair {
    /// Both ids parsed
    Ids(UserId, BookId),
    /// One of them was not a number; already reported
    Invalid,
    /// Input ended
    Closed,
}

/// The interactive menu loop
#[derive(Debug)]
pub struct Menu<R, W> {
    /// Catalog all actions operate on
    catalog: LibraryCatalog,
    /// Line source
    input: R,
    /// Where prompts and results go
    output: W,
    /// Emit ANSI colors
    color: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Create a menu with colored output enabled
    pub fn new(catalog: LibraryCatalog, input: R, output: W) -> Self {
        Self { catalog, input, output, color: true }
    }

    /// Enable or disable colored output
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// The catalog the menu operates on
    #[must_use]
    pub fn catalog(&self) -> &LibraryCatalog {
        &self.catalog
    }

    /// Take the catalog and output back
    #[must_use]
    pub fn into_inner(self) -> (LibraryCatalog, W) {
        (self.catalog, self.output)
    }

    /// Run until the user exits or input ends
    ///
    /// # Errors
    ///
    /// Returns any I/O error from reading input or writing output.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Enter your choice (1-9): ")? else {
                break;
            };

            let flow = match MenuChoice::from_input(&line) {
                Some(MenuChoice::Exit) => {
                    self.say(Tone::Plain, "Exiting the system...")?;
                    Flow::Stop
                }
                Some(choice) => self.dispatch(choice)?,
                None => {
                    self.say(Tone::Warning, "Invalid choice, please try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Stop {
                break;
            }
        }
        Ok(())
    }

    /// Print the title and numbered entries
    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        self.say(Tone::Heading, "Library Management System")?;
        for (number, choice) in (1..).zip(MenuChoice::ALL) {
            let line = format!("{number}. {}", choice.label());
            self.say(Tone::Plain, &line)?;
        }
        Ok(())
    }

    /// Run the action behind a menu entry
    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<Flow> {
        match choice {
            MenuChoice::AddUser => self.add_user(),
            MenuChoice::AddBook => self.add_book(),
            MenuChoice::BorrowBook => self.borrow_book(),
            MenuChoice::ReturnBook => self.return_book(),
            MenuChoice::SearchBooks => self.search_books(),
            MenuChoice::CheckOverdue => {
                self.say(Tone::Plain, "Checking overdue books...")?;
                let text = CatalogReport::overdue(&self.catalog.report_overdue());
                self.say(Tone::Plain, &text)?;
                Ok(Flow::Continue)
            }
            MenuChoice::UserLoans => self.user_loans(),
            MenuChoice::LoanHistory => {
                let text = CatalogReport::history(self.catalog.loan_history());
                self.say(Tone::Plain, &text)?;
                Ok(Flow::Continue)
            }
            MenuChoice::Exit => Ok(Flow::Stop),
        }
    }

    /// Prompt for name, email and role, then register the user
    fn add_user(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter user name: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(email) = self.prompt("Enter user email: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(role) = self.prompt("Enter user type (member/admin): ")? else {
            return Ok(Flow::Stop);
        };

        let role = if role.is_empty() { Ok(Role::default()) } else { role.parse::<Role>() };
        match role {
            Ok(role) => {
                let id = self.catalog.add_user(name.as_str(), email, role);
                self.say(Tone::Success, &format!("User {name} added with ID {id}"))?;
            }
            Err(err) => self.say(Tone::Warning, &err.to_string())?,
        }
        Ok(Flow::Continue)
    }

    /// Prompt for the book fields, then register the book
    fn add_book(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt("Enter book title: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(author) = self.prompt("Enter author name: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(isbn) = self.prompt("Enter ISBN: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(genre) = self.prompt("Enter genre: ")? else {
            return Ok(Flow::Stop);
        };

        let id = self.catalog.add_book(title.as_str(), author, isbn, genre);
        self.say(Tone::Success, &format!("Book '{title}' added with ID {id}"))?;
        Ok(Flow::Continue)
    }

    /// Prompt for ids and lend the book
    fn borrow_book(&mut self) -> io::Result<Flow> {
        let (user_id, book_id) = match self.prompt_ids()? {
            IdPair::Ids(user_id, book_id) => (user_id, book_id),
            IdPair::Invalid => return Ok(Flow::Continue),
            IdPair::Closed => return Ok(Flow::Stop),
        };

        match self.catalog.borrow_book(user_id, book_id) {
            Ok(loan) => {
                let text = format!(
                    "{} borrowed {} (due on {})",
                    self.user_name(user_id),
                    self.book_title(book_id),
                    loan.due_date.date_naive()
                );
                self.say(Tone::Success, &text)?;
            }
            Err(err) => self.say(Tone::Failure, &err.to_string())?,
        }
        Ok(Flow::Continue)
    }

    /// Prompt for ids and take the book back
    fn return_book(&mut self) -> io::Result<Flow> {
        let (user_id, book_id) = match self.prompt_ids()? {
            IdPair::Ids(user_id, book_id) => (user_id, book_id),
            IdPair::Invalid => return Ok(Flow::Continue),
            IdPair::Closed => return Ok(Flow::Stop),
        };

        match self.catalog.return_book(user_id, book_id) {
            Ok(_) => {
                let text =
                    format!("{} returned {}", self.user_name(user_id), self.book_title(book_id));
                self.say(Tone::Success, &text)?;
            }
            Err(err) => self.say(Tone::Failure, &err.to_string())?,
        }
        Ok(Flow::Continue)
    }

    /// Prompt for a keyword and list matching books
    fn search_books(&mut self) -> io::Result<Flow> {
        let Some(keyword) = self.prompt("Enter keyword to search for books (title/author): ")?
        else {
            return Ok(Flow::Stop);
        };
        let found = self.catalog.find_books_by_keyword(&keyword);
        let text = CatalogReport::search_results(&keyword, &found);
        self.say(Tone::Plain, &text)?;
        Ok(Flow::Continue)
    }

    /// Prompt for a user id and list that user's loans
    fn user_loans(&mut self) -> io::Result<Flow> {
        let Some(raw) = self.prompt("Enter user ID: ")? else {
            return Ok(Flow::Stop);
        };
        let Ok(id) = raw.parse::<u32>() else {
            self.say(Tone::Warning, "Please enter a valid numeric ID.")?;
            return Ok(Flow::Continue);
        };

        let user_id = UserId(id);
        let text = self.catalog.get_user_by_id(user_id).and_then(|user| {
            let entries = self.catalog.loans_for_user(user_id)?;
            Ok(CatalogReport::user_loans(user, &entries))
        });
        match text {
            Ok(text) => self.say(Tone::Plain, &text)?,
            Err(err) => self.say(Tone::Failure, &err.to_string())?,
        }
        Ok(Flow::Continue)
    }

    /// Ask for a user id then a book id; stops at the first non-number
    fn prompt_ids(&mut self) -> io::Result<IdPair> {
        let Some(user) = self.prompt("Enter user ID: ")? else {
            return Ok(IdPair::Closed);
        };
        let Ok(user) = user.parse::<u32>() else {
            self.say(Tone::Warning, "Please enter valid numeric IDs.")?;
            return Ok(IdPair::Invalid);
        };
        let Some(book) = self.prompt("Enter book ID: ")? else {
            return Ok(IdPair::Closed);
        };
        let Ok(book) = book.parse::<u32>() else {
            self.say(Tone::Warning, "Please enter valid numeric IDs.")?;
            return Ok(IdPair::Invalid);
        };
        Ok(IdPair::Ids(UserId(user), BookId(book)))
    }

    /// Name for messages, falling back to the id
    fn user_name(&self, id: UserId) -> String {
        self.catalog
            .get_user_by_id(id)
            .map_or_else(|_| format!("User {id}"), |user| user.name().to_string())
    }

    /// Title for messages, falling back to the id
    fn book_title(&self, id: BookId) -> String {
        self.catalog
            .get_book_by_id(id)
            .map_or_else(|_| format!("Book {id}"), |book| book.title().to_string())
    }

    /// Print a label and read one trimmed line; `None` once input is exhausted
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Write one line in the given tone
    fn say(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.output, "{}", tone.paint(text))
        } else {
            writeln!(self.output, "{text}")
        }
    }
}
