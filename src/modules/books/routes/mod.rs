use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::{get, patch},
    Router,
};
use bookshelf_http::{AppError, IndentedJson};

use super::models::Book;
use super::store::{BookStore, BookStoreError};

pub const BOOK_NOT_FOUND: &str = "book not found";
pub const BOOK_OUT_OF_STOCK: &str = "book out of stock";
pub const BOOK_ALREADY_EXISTS: &str = "book already exists";
pub const BOOK_QUANTITY_AT_MAXIMUM: &str = "book quantity at maximum";
pub const MISSING_ID: &str = "Missing ID Query Parameter";

type SharedStore = Arc<dyn BookStore>;
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// HTTP routes for the Books module, bound to `store`.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{id}", get(get_book))
        .route("/checkout", patch(checkout_book))
        .route("/return", patch(return_book))
        .with_state(store)
}

impl From<BookStoreError> for AppError {
    fn from(err: BookStoreError) -> Self {
        match err {
            BookStoreError::NotFound(_) => AppError::not_found(BOOK_NOT_FOUND),
            BookStoreError::OutOfStock(_) => AppError::conflict(BOOK_OUT_OF_STOCK),
            BookStoreError::AlreadyExists(_) => AppError::conflict(BOOK_ALREADY_EXISTS),
            BookStoreError::QuantityOverflow(_) => AppError::conflict(BOOK_QUANTITY_AT_MAXIMUM),
            BookStoreError::Backend(err) => AppError::Internal(err),
        }
    }
}

/// First `id` value in the query string; repeated keys after it are ignored.
fn id_param(query: QueryPairs) -> Result<String, AppError> {
    let Query(pairs) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    pairs
        .into_iter()
        .find_map(|(key, value)| (key == "id").then_some(value))
        .ok_or_else(|| AppError::bad_request(MISSING_ID))
}

async fn list_books(State(store): State<SharedStore>) -> Result<IndentedJson<Vec<Book>>, AppError> {
    Ok(IndentedJson::ok(store.list().await?))
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<IndentedJson<Book>, AppError> {
    Ok(IndentedJson::ok(store.find_by_id(&id).await?))
}

/// The body is decoded by hand so that a bad payload yields a bare 400.
async fn create_book(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<IndentedJson<Book>, AppError> {
    let book: Book =
        serde_json::from_slice(&body).map_err(|err| AppError::malformed_input(err.to_string()))?;

    let created = store.create(book).await?;
    tracing::info!(book_id = %created.id, quantity = created.quantity, "book created");
    Ok(IndentedJson::created(created))
}

async fn checkout_book(
    State(store): State<SharedStore>,
    query: QueryPairs,
) -> Result<IndentedJson<Book>, AppError> {
    let id = id_param(query)?;

    let book = store.checkout(&id).await?;
    tracing::info!(book_id = %book.id, remaining = book.quantity, "book checked out");
    Ok(IndentedJson::ok(book))
}

async fn return_book(
    State(store): State<SharedStore>,
    query: QueryPairs,
) -> Result<IndentedJson<Book>, AppError> {
    let id = id_param(query)?;

    let book = store.return_book(&id).await?;
    tracing::info!(book_id = %book.id, remaining = book.quantity, "book returned");
    Ok(IndentedJson::ok(book))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::store::InMemoryBookStore;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<InMemoryBookStore>) {
        let store = Arc::new(InMemoryBookStore::seeded());
        (router(store.clone()), store)
    }

    async fn send(router: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_book_by_id() {
        let (router, _) = app();
        let (status, body) = send(router, Method::GET, "/books/2", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["title"], "The Little Prince");
    }

    #[tokio::test]
    async fn test_get_missing_book_is_404() {
        let (router, _) = app();
        let (status, body) = send(router, Method::GET, "/books/99", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&body), json!({"message": "book not found"}));
    }

    #[tokio::test]
    async fn test_create_without_content_type_is_accepted() {
        let (router, store) = app();
        let (status, body) = send(
            router,
            Method::POST,
            "/books",
            Body::from(r#"{"id":"4","title":"X","author":"Y","quantity":2}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_of(&body)["id"], "4");
        assert_eq!(store.find_by_id("4").await.unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_create_malformed_body_is_bare_400() {
        let (router, store) = app();
        let (status, body) =
            send(router, Method::POST, "/books", Body::from(r#"{"id":"4","#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.is_empty());
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_409() {
        let (router, _) = app();
        let (status, body) = send(
            router,
            Method::POST,
            "/books",
            Body::from(r#"{"id":"1","title":"X","author":"Y","quantity":2}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body)["message"], BOOK_ALREADY_EXISTS);
    }

    #[tokio::test]
    async fn test_checkout_without_id_is_400() {
        let (router, _) = app();
        let (status, body) = send(router, Method::PATCH, "/checkout", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body), json!({"message": "Missing ID Query Parameter"}));
    }

    #[tokio::test]
    async fn test_checkout_with_empty_id_is_404() {
        let (router, _) = app();
        let (status, _) = send(router, Method::PATCH, "/checkout?id=", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_checkout_unknown_id_is_404_only() {
        let (router, store) = app();
        let (status, body) = send(router, Method::PATCH, "/checkout?id=42", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&body), json!({"message": "book not found"}));
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_checkout_out_of_stock_is_409() {
        let store = Arc::new(InMemoryBookStore::new(vec![Book::new("0", "Gone", "N/A", 0)]));
        let (status, body) = send(
            router(store.clone()),
            Method::PATCH,
            "/checkout?id=0",
            Body::empty(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body), json!({"message": "book out of stock"}));
        assert_eq!(store.find_by_id("0").await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_return_increments_quantity() {
        let (router, _) = app();
        let (status, body) = send(router, Method::PATCH, "/return?id=3", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["quantity"], 8);
    }

    #[tokio::test]
    async fn test_return_without_id_is_400() {
        let (router, _) = app();
        let (status, _) = send(router, Method::PATCH, "/return", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_checkout_with_repeated_id_uses_first() {
        let (router, store) = app();
        let (status, body) =
            send(router, Method::PATCH, "/checkout?id=1&id=2", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["id"], "1");
        assert_eq!(store.find_by_id("1").await.unwrap().quantity, 9);
        assert_eq!(store.find_by_id("2").await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_checkout_ignores_unrelated_params() {
        let (router, _) = app();
        let (status, body) =
            send(router, Method::PATCH, "/checkout?copy=2&id=3", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["quantity"], 6);
    }

    #[tokio::test]
    async fn test_create_partial_body_fills_zero_values() {
        let (router, store) = app();
        let (status, body) = send(
            router,
            Method::POST,
            "/books",
            Body::from(r#"{"id":"4","title":"X"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            json_of(&body),
            json!({"id": "4", "title": "X", "author": "", "quantity": 0})
        );
        assert_eq!(
            store.find_by_id("4").await.unwrap(),
            Book::new("4", "X", "", 0)
        );
    }

    #[tokio::test]
    async fn test_create_mistyped_field_is_bare_400() {
        let (router, store) = app();
        let (status, body) = send(
            router,
            Method::POST,
            "/books",
            Body::from(r#"{"id":"4","quantity":"two"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.is_empty());
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_return_at_max_quantity_is_409() {
        let store = Arc::new(InMemoryBookStore::new(vec![Book::new("m", "M", "A", i64::MAX)]));
        let (status, body) = send(
            router(store.clone()),
            Method::PATCH,
            "/return?id=m",
            Body::empty(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json_of(&body), json!({"message": "book quantity at maximum"}));
        assert_eq!(store.find_by_id("m").await.unwrap().quantity, i64::MAX);
    }
}
