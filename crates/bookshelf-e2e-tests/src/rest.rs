use anyhow::{Result, anyhow};
use bookshelf_app::rest_api::book::{BookDto, BookForm};
use reqwest::{StatusCode, Url};
use tracing::info;

use crate::extend_url;

pub fn books_url(base_url: &Url) -> Result<Url> {
    Ok(base_url.join("books")?)
}

pub async fn list_books(client: &reqwest::Client, base_url: &Url) -> Result<Vec<BookDto>> {
    let response = client.get(books_url(base_url)?).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let books: Vec<BookDto> = response.json().await?;
    Ok(books)
}

/// Creates book and finds its id, create response carries no body.
pub async fn create_book(
    client: &reqwest::Client,
    base_url: &Url,
    form: &BookForm,
) -> Result<BookDto> {
    let before = list_books(client, base_url).await?;

    let response = client.post(books_url(base_url)?).json(form).send().await?;
    info!("Create response: {:#?}", response);
    assert_eq!(response.status(), StatusCode::CREATED);

    list_books(client, base_url)
        .await?
        .into_iter()
        .find(|book| !before.iter().any(|b| b.id == book.id))
        .ok_or_else(|| anyhow!("Created book is not listed"))
}

pub async fn get_book(
    client: &reqwest::Client,
    base_url: &Url,
    id: &str,
) -> Result<reqwest::Response> {
    let url = extend_url(&books_url(base_url)?, id);
    Ok(client.get(url).send().await?)
}
