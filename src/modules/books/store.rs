//! Book storage: the [`BookStore`] seam and its in-memory implementation.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::models::{seed_books, Book};

#[derive(Error, Debug)]
pub enum BookStoreError {
    #[error("book '{0}' not found")]
    NotFound(String),

    #[error("book '{0}' out of stock")]
    OutOfStock(String),

    #[error("book '{0}' already exists")]
    AlreadyExists(String),

    #[error("book '{0}' quantity cannot grow further")]
    QuantityOverflow(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Storage operations backing the books endpoints.
///
/// Each call is atomic with respect to every other call on the same store.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books in insertion order.
    async fn list(&self) -> Result<Vec<Book>, BookStoreError>;

    /// The book whose id matches exactly.
    async fn find_by_id(&self, id: &str) -> Result<Book, BookStoreError>;

    /// Append a new book. Ids must be unique.
    async fn create(&self, book: Book) -> Result<Book, BookStoreError>;

    /// Take one copy off the shelf. Never drives quantity below zero.
    async fn checkout(&self, id: &str) -> Result<Book, BookStoreError>;

    /// Put one copy back on the shelf.
    async fn return_book(&self, id: &str) -> Result<Book, BookStoreError>;
}

/// Lock-guarded, process-local book store.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// Store pre-populated with the default catalogue.
    pub fn seeded() -> Self {
        Self::new(seed_books())
    }

    /// Apply `update` to the matching book under the write lock.
    async fn modify<F>(&self, id: &str, update: F) -> Result<Book, BookStoreError>
    where
        F: FnOnce(&mut Book) -> Result<(), BookStoreError> + Send,
    {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| BookStoreError::NotFound(id.to_string()))?;

        update(book)?;
        Ok(book.clone())
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, BookStoreError> {
        Ok(self.books.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Book, BookStoreError> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| BookStoreError::NotFound(id.to_string()))
    }

    async fn create(&self, book: Book) -> Result<Book, BookStoreError> {
        let mut books = self.books.write().await;
        if books.iter().any(|existing| existing.id == book.id) {
            return Err(BookStoreError::AlreadyExists(book.id));
        }

        books.push(book.clone());
        Ok(book)
    }

    async fn checkout(&self, id: &str) -> Result<Book, BookStoreError> {
        self.modify(id, |book| {
            if book.quantity <= 0 {
                return Err(BookStoreError::OutOfStock(book.id.clone()));
            }
            book.quantity -= 1;
            Ok(())
        })
        .await
    }

    async fn return_book(&self, id: &str) -> Result<Book, BookStoreError> {
        self.modify(id, |book| {
            book.quantity = book
                .quantity
                .checked_add(1)
                .ok_or_else(|| BookStoreError::QuantityOverflow(book.id.clone()))?;
            Ok(())
        })
        .await
    }
}
