//! Book (catalog entry) model and related types

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

static ISBN13: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13}$").unwrap());

const MAX_TITLE_CHARS: usize = 200;
const MAX_AUTHOR_CHARS: usize = 100;

/// Required text field capped in characters, with distinct messages per rule
fn bounded_text(
    value: &str,
    max_chars: usize,
    required: &'static str,
    too_long: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(required)));
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::new("length").with_message(Cow::Borrowed(too_long)));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    bounded_text(
        title,
        MAX_TITLE_CHARS,
        "Title is required.",
        "Title must be less than 200 characters.",
    )
}

fn validate_author(author: &str) -> Result<(), ValidationError> {
    bounded_text(
        author,
        MAX_AUTHOR_CHARS,
        "Author is required.",
        "Author must be less than 100 characters.",
    )
}

/// Book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// 13-digit ISBN, unique in the catalog
    pub isbn: String,
    pub total_copies: i32,
    /// Copies currently on the shelf (0 <= available <= total)
    pub available_copies: i32,
}

/// Add book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBook {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(custom(function = "validate_author"))]
    pub author: String,
    #[validate(regex(path = *ISBN13, message = "ISBN must be exactly 13 digits."))]
    pub isbn: String,
    #[validate(range(min = 1, message = "Total copies must be a positive integer."))]
    pub total_copies: i32,
}

impl NewBook {
    pub fn new(title: &str, author: &str, isbn: &str, total_copies: i32) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            total_copies,
        }
    }

    /// Trim the free-text fields before validation
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            total_copies: self.total_copies,
        }
    }
}

/// Pick the message of the first failing field, in form order.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    const FIELD_ORDER: [&str; 4] = ["title", "author", "isbn", "total_copies"];

    let fields = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|name| fields.get(*name))
        .filter_map(|errs| errs.first())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid book data.".to_string())
}

/// Which catalog field a search term applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Title,
    Author,
    Isbn,
}

impl SearchType {
    /// Case-insensitive parse; unknown kinds yield `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "isbn" => Some(Self::Isbn),
            _ => None,
        }
    }
}

/// Catalog search query string
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookSearchQuery {
    /// Search term
    pub q: Option<String>,
    /// title, author or isbn
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

/// Book id as submitted by a client, either a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBookId {
    Number(i64),
    Text(String),
}

impl RawBookId {
    pub fn parse(&self) -> Option<i32> {
        match self {
            RawBookId::Number(n) => i32::try_from(*n).ok(),
            RawBookId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<i32> for RawBookId {
    fn from(id: i32) -> Self {
        RawBookId::Number(id as i64)
    }
}
