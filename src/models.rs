use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::Book;

/// Request body for POST /books
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateBookRequest {
    pub title: Option<String>,
}

impl CreateBookRequest {
    pub fn into_title(self) -> Result<String, ApiError> {
        required(self.title, "title")
    }
}

/// Request body for POST /books/{id}
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct AddCommentRequest {
    pub comment: Option<String>,
}

impl AddCommentRequest {
    pub fn into_comment(self) -> Result<String, ApiError> {
        required(self.comment, "comment")
    }
}

// Absent, null and "" all count as missing.
fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::MissingField(field)),
    }
}

/// Response type for successful create operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateBookResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
}

/// A full book with its comments
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BookResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub comments: Vec<String>,
}

/// Book entry in the list response
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BookSummaryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub commentcount: usize,
}

/// Response type for delete operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl From<Book> for CreateBookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.into(),
            title: book.title,
        }
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.into(),
            title: book.title,
            comments: book.comments,
        }
    }
}

impl From<Book> for BookSummaryResponse {
    fn from(book: Book) -> Self {
        let commentcount = book.comment_count();
        Self {
            id: book.id.into(),
            title: book.title,
            commentcount,
        }
    }
}
