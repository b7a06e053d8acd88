use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{Config, StoreBackend};
use crate::spanner::SpannerBookStore;

/// Opaque book identifier assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh identifier; v4 UUIDs are never handed out twice.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

/// A stored book record
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub comments: Vec<String>,
}

impl Book {
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// Document store holding the book collection
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list`](BookStore::list) | Every book, oldest first |
/// | [`create`](BookStore::create) | Insert a book with no comments |
/// | [`find`](BookStore::find) | Look a book up by id |
/// | [`append_comment`](BookStore::append_comment) | Add one comment to the end of a book's list |
/// | [`delete`](BookStore::delete) | Remove one book |
/// | [`delete_all`](BookStore::delete_all) | Remove every book |
/// | [`health_check`](BookStore::health_check) | Verify the store answers |
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>>;

    /// Insert a new book. The store assigns the id.
    async fn create(&self, title: &str) -> Result<Book>;

    /// Returns `Ok(None)` for ids the store does not know, malformed ones included.
    async fn find(&self, id: &BookId) -> Result<Option<Book>>;

    /// Returns the updated book, or `Ok(None)` if no book has this id.
    async fn append_comment(&self, id: &BookId, comment: &str) -> Result<Option<Book>>;

    /// Returns `false` if no book had this id.
    async fn delete(&self, id: &BookId) -> Result<bool>;

    async fn delete_all(&self) -> Result<()>;

    async fn health_check(&self) -> Result<()>;
}

/// Open the store selected by the configuration
pub async fn connect(config: &Config) -> Result<Arc<dyn BookStore>> {
    match &config.store {
        StoreBackend::Spanner(spanner) => {
            let store = SpannerBookStore::from_config(spanner).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory book store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Process-local book store, kept in creation order
#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn create(&self, title: &str) -> Result<Book> {
        let book = Book {
            id: BookId::generate(),
            title: title.to_string(),
            comments: Vec::new(),
        };
        self.books.write().await.push(book.clone());
        tracing::debug!("Created book with id: {}", book.id);
        Ok(book)
    }

    async fn find(&self, id: &BookId) -> Result<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().find(|book| &book.id == id).cloned())
    }

    async fn append_comment(&self, id: &BookId, comment: &str) -> Result<Option<Book>> {
        let mut books = self.books.write().await;
        let Some(book) = books.iter_mut().find(|book| &book.id == id) else {
            return Ok(None);
        };
        book.comments.push(comment.to_string());
        tracing::debug!("Appended comment to book {} ({} total)", id, book.comments.len());
        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: &BookId) -> Result<bool> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| &book.id != id);
        Ok(books.len() < before)
    }

    async fn delete_all(&self) -> Result<()> {
        let mut books = self.books.write().await;
        tracing::debug!("Deleting all {} books", books.len());
        books.clear();
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
