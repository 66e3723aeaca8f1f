use serde::{Deserialize, Serialize};

/// A lendable book and the number of copies on the shelf.
///
/// Fields missing from an incoming body take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Identifier assigned by the client
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Copies currently available for checkout
    pub quantity: i64,
}

impl Book {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            quantity,
        }
    }
}

/// Books every fresh process starts with.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new("1", "The Alchemist", "Paulo Coelho", 10),
        Book::new("2", "The Little Prince", "Antoine de Saint-Exupéry", 5),
        Book::new("3", "The Da Vinci Code", "Dan Brown", 7),
    ]
}
