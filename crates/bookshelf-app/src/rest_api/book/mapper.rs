//! Conversions between wire shapes and the persisted model.

use bookshelf_dal::book::{Book, BookData};
use bookshelf_types::{format_date, parse_date};

use super::{dto::BookDto, form::BookForm};

#[derive(Debug, thiserror::Error)]
#[error("not a valid date in YYYY-MM-DD format")]
pub struct MappingError {
    field: &'static str,
    #[source]
    source: time::error::Parse,
}

impl MappingError {
    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl BookForm {
    /// Identity and timestamps are left to the caller and the repository.
    pub fn into_model(self) -> Result<BookData, MappingError> {
        let published_date =
            parse_date(&self.published_date).map_err(|source| MappingError {
                field: "published_date",
                source,
            })?;
        Ok(BookData {
            title: self.title,
            author: self.author,
            published_date,
            image_url: self.image_url,
            description: self.description,
        })
    }
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        BookDto {
            id: book.id.hyphenated().to_string(),
            title: book.title,
            author: book.author,
            published_date: format_date(book.published_date),
            image_url: book.image_url,
            description: book.description,
        }
    }
}

pub fn to_dto_list(books: Vec<Book>) -> Vec<BookDto> {
    books.into_iter().map(BookDto::from).collect()
}
