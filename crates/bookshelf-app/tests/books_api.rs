use axum::{
    body::{Body, Bytes},
    http::{Method, Request, StatusCode},
    Router,
};
use bookshelf_app::{
    rest_api::book::{router, BookDto},
    state::AppState,
    validate::ValidationErrors,
};
use serde_json::{json, Value};
use tower::util::ServiceExt as _;
use tracing_test::traced_test;

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    bookshelf_dal::migrate(&conn).await.unwrap();
    conn
}

fn app(pool: sqlx::Pool<sqlx::Sqlite>) -> Router {
    Router::new()
        .nest("/books", router())
        .with_state(AppState::new(pool))
}

async fn setup_test_app() -> Router {
    app(init_db().await)
}

/// App whose pool is already closed, so every store access fails.
async fn setup_broken_app() -> Router {
    let pool = init_db().await;
    pool.close().await;
    app(pool)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Bytes) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

fn error_message(body: &Bytes) -> String {
    let value: Value = serde_json::from_slice(body).unwrap();
    value["error"].as_str().unwrap().to_string()
}

fn dune() -> Value {
    json!({
        "title": "Dune",
        "author": "Frank Herbert",
        "published_date": "1965-08-01",
        "image_url": "https://example.com/dune.jpg",
        "description": "Spice must flow"
    })
}

async fn list(app: &Router) -> Vec<BookDto> {
    let (status, body) = send(app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn create(app: &Router, form: &Value) -> BookDto {
    let before = list(app).await;
    let (status, body) = send(app, Method::POST, "/books", Some(&form.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.is_empty());
    let after = list(app).await;
    assert_eq!(after.len(), before.len() + 1);
    after.into_iter().last().unwrap()
}

#[tokio::test]
async fn test_list_empty_is_literal_array() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"[]");
}

#[tokio::test]
#[traced_test]
async fn test_create_and_read() {
    let app = setup_test_app().await;

    let created = create(&app, &dune()).await;
    assert_eq!(created.title, "Dune");
    assert_eq!(created.author, "Frank Herbert");
    assert_eq!(created.published_date, "1965-08-01");
    assert_eq!(created.image_url, "https://example.com/dune.jpg");
    assert_eq!(created.description, "Spice must flow");
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["Author"], "Frank Herbert");
    let read: BookDto = serde_json::from_value(value).unwrap();
    assert_eq!(read, created);
    assert!(logs_contain("Created book"));
}

#[tokio::test]
async fn test_create_without_optional_fields() {
    let app = setup_test_app().await;
    let form = json!({
        "title": "Solaris",
        "author": "Stanislaw Lem",
        "published_date": "1961-06-01"
    });

    let created = create(&app, &form).await;
    assert_eq!(created.image_url, "");
    assert_eq!(created.description, "");
}

#[tokio::test]
async fn test_create_reports_all_violations() {
    let app = setup_test_app().await;
    let form = json!({"author": "HAL 9000", "published_date": "2001-01-01"});

    let (status, body) = send(&app, Method::POST, "/books", Some(&form.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors: ValidationErrors = serde_json::from_slice(&body).unwrap();
    let fields: Vec<&str> = errors.errors.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, ["title", "author"]);

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_create_invalid_date_and_url() {
    let app = setup_test_app().await;
    let form = json!({
        "title": "Roadside Picnic",
        "author": "Arkady Strugatsky",
        "published_date": "1972-02-30",
        "image_url": "picnic.png"
    });

    let (status, body) = send(&app, Method::POST, "/books", Some(&form.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors: ValidationErrors = serde_json::from_slice(&body).unwrap();
    let fields: Vec<&str> = errors.errors.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, ["published_date", "image_url"]);
}

#[tokio::test]
async fn test_create_rejects_signed_year() {
    let app = setup_test_app().await;

    for date in ["-0001-01-01", "+1965-08-01"] {
        let mut form = dune();
        form["published_date"] = json!(date);
        let (status, body) = send(&app, Method::POST, "/books", Some(&form.to_string())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors: ValidationErrors = serde_json::from_slice(&body).unwrap();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "published_date");
    }

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_create_keeps_early_year() {
    let app = setup_test_app().await;
    let mut form = dune();
    form["published_date"] = json!("0001-01-01");

    let created = create(&app, &form).await;
    assert_eq!(created.published_date, "0001-01-01");
}

#[tokio::test]
async fn test_create_malformed_body() {
    let app = setup_test_app().await;

    for body in ["{\"title\": ", "null", "", "{\"title\": 42}"] {
        let (status, body) = send(&app, Method::POST, "/books", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "json decode failure");
    }
}

#[tokio::test]
async fn test_read_invalid_id_does_not_touch_store() {
    let app = setup_broken_app().await;

    let (status, body) = send(&app, Method::GET, "/books/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid url param-id");

    let id = uuid::Uuid::new_v4();
    let (status, body) = send(&app, Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "db data access failure");
}

#[tokio::test]
async fn test_read_missing() {
    let app = setup_test_app().await;
    let id = uuid::Uuid::new_v4();
    let (status, body) = send(&app, Method::GET, &format!("/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_update() {
    let app = setup_test_app().await;
    let created = create(&app, &dune()).await;
    let url = format!("/books/{}", created.id);

    let mut form = dune();
    form["title"] = json!("Dune Messiah");
    form["published_date"] = json!("1969-10-15");
    // identity comes from the path only
    form["id"] = json!(uuid::Uuid::new_v4().to_string());

    let (status, body) = send(&app, Method::PUT, &url, Some(&form.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let books = list(&app).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, created.id);
    assert_eq!(books[0].title, "Dune Messiah");
    assert_eq!(books[0].published_date, "1969-10-15");
}

#[tokio::test]
async fn test_update_missing() {
    let app = setup_test_app().await;
    let created = create(&app, &dune()).await;

    let mut form = dune();
    form["title"] = json!("Children of Dune");
    let id = uuid::Uuid::new_v4();
    let url = format!("/books/{id}");
    let (status, body) = send(&app, Method::PUT, &url, Some(&form.to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    assert_eq!(list(&app).await, vec![created]);
}

#[tokio::test]
async fn test_update_rejections() {
    let app = setup_test_app().await;
    let created = create(&app, &dune()).await;
    let url = format!("/books/{}", created.id);

    // path is checked before body
    let (status, body) = send(&app, Method::PUT, "/books/42", Some("{")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid url param-id");

    let (status, body) = send(&app, Method::PUT, &url, Some("{")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "json decode failure");

    let mut form = dune();
    form["author"] = json!("");
    let (status, body) = send(&app, Method::PUT, &url, Some(&form.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors: ValidationErrors = serde_json::from_slice(&body).unwrap();
    assert_eq!(errors.errors.len(), 1);
    assert_eq!(errors.errors[0].field, "author");

    assert_eq!(list(&app).await, vec![created]);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = setup_test_app().await;
    let created = create(&app, &dune()).await;
    let url = format!("/books/{}", created.id);

    let (status, body) = send(&app, Method::DELETE, &url, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, _) = send(&app, Method::DELETE, &url, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &url, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PUT, &url, Some(&dune().to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(&body[..], b"[]");
}

#[tokio::test]
async fn test_delete_invalid_id() {
    let app = setup_test_app().await;
    let (status, body) = send(&app, Method::DELETE, "/books/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid url param-id");
}

#[tokio::test]
#[traced_test]
async fn test_storage_failures() {
    let app = setup_broken_app().await;
    let id = uuid::Uuid::new_v4();
    let url = format!("/books/{id}");

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "db data access failure");

    let (status, body) = send(&app, Method::POST, "/books", Some(&dune().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "db data insert failure");

    let (status, body) = send(&app, Method::PUT, &url, Some(&dune().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "db data update failure");

    let (status, body) = send(&app, Method::DELETE, &url, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "db data remove failure");

    assert!(logs_contain("db data insert failure"));
}
