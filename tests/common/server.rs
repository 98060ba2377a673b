//! Test server lifecycle management
//!
//! Spawns an in-process book store on a random port. Each test gets its own
//! server with freshly seeded books, so tests never share state.

use super::constants::*;
use super::fixtures::seed_books;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use booklist::{Book, BookStoreClient};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Default)]
struct StoreState {
    books: Vec<Book>,
    next_id: u64,
    failing: Option<StatusCode>,
    password_check_failing: bool,
    update_bodies: Vec<(String, Value)>,
    create_bodies: Vec<Value>,
    delete_ids: Vec<String>,
    password_checks: Vec<String>,
}

/// Shared handle on the fake store's data, usable from tests while the
/// server runs.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    fn seeded() -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().books = seed_books();
        store
    }

    /// Current books in store order.
    pub fn books(&self) -> Vec<Book> {
        self.inner.lock().unwrap().books.clone()
    }

    /// Replace the stored books.
    pub fn set_books(&self, books: Vec<Book>) {
        self.inner.lock().unwrap().books = books;
    }

    /// Make every `/books` route answer with `status` until cleared with `None`.
    pub fn fail_books_with(&self, status: Option<StatusCode>) {
        self.inner.lock().unwrap().failing = status;
    }

    /// Make `/check-password` answer 500.
    pub fn fail_password_check(&self, failing: bool) {
        self.inner.lock().unwrap().password_check_failing = failing;
    }

    /// Raw JSON bodies received by `PUT /books/{id}`, with the decoded id.
    pub fn update_bodies(&self) -> Vec<(String, Value)> {
        self.inner.lock().unwrap().update_bodies.clone()
    }

    /// Raw JSON bodies received by `POST /books`.
    pub fn create_bodies(&self) -> Vec<Value> {
        self.inner.lock().unwrap().create_bodies.clone()
    }

    /// Decoded ids received by `DELETE /books/{id}`.
    pub fn delete_ids(&self) -> Vec<String> {
        self.inner.lock().unwrap().delete_ids.clone()
    }

    /// Passwords received by `/check-password`.
    pub fn password_checks(&self) -> Vec<String> {
        self.inner.lock().unwrap().password_checks.clone()
    }

    /// Number of mutating book requests received.
    pub fn mutation_count(&self) -> usize {
        let state = self.inner.lock().unwrap();
        state.create_bodies.len() + state.update_bodies.len() + state.delete_ids.len()
    }
}

// ============================================================================
// Handlers
// ============================================================================

type HandlerResult = Result<Json<Value>, (StatusCode, String)>;

fn failure(store: &FakeStore) -> Option<(StatusCode, String)> {
    store
        .inner
        .lock()
        .unwrap()
        .failing
        .map(|status| (status, "Injected failure".to_string()))
}

async fn list_books(State(store): State<FakeStore>) -> HandlerResult {
    if let Some(err) = failure(&store) {
        return Err(err);
    }
    Ok(Json(json!({ "books": store.books() })))
}

async fn create_book(State(store): State<FakeStore>, Json(body): Json<Value>) -> HandlerResult {
    let mut state = store.inner.lock().unwrap();
    state.create_bodies.push(body.clone());
    if let Some(status) = state.failing {
        return Err((status, "Injected failure".to_string()));
    }

    state.next_id += 1;
    let book = Book {
        id: format!("created-{}", state.next_id),
        title: string_field(&body, "title"),
        author: string_field(&body, "author"),
        image_url: string_field(&body, "image_url"),
    };
    state.books.push(book.clone());
    Ok(Json(json!(book)))
}

async fn update_book(
    State(store): State<FakeStore>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut state = store.inner.lock().unwrap();
    state.update_bodies.push((id.clone(), body.clone()));
    if let Some(status) = state.failing {
        return Err((status, "Injected failure".to_string()));
    }

    let Some(book) = state.books.iter_mut().find(|b| b.id == id) else {
        return Err((StatusCode::NOT_FOUND, format!("No book with id {}", id)));
    };
    book.title = string_field(&body, "title");
    book.author = string_field(&body, "author");
    if body.get("image_url").is_some() {
        book.image_url = string_field(&body, "image_url");
    }
    Ok(Json(json!({ "ok": true })))
}

async fn delete_book(State(store): State<FakeStore>, Path(id): Path<String>) -> HandlerResult {
    let mut state = store.inner.lock().unwrap();
    state.delete_ids.push(id.clone());
    if let Some(status) = state.failing {
        return Err((status, "Injected failure".to_string()));
    }

    if !state.books.iter().any(|b| b.id == id) {
        return Err((StatusCode::NOT_FOUND, format!("No book with id {}", id)));
    }
    state.books.retain(|b| b.id != id);
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
struct CheckPasswordBody {
    password: String,
}

async fn check_password(
    State(store): State<FakeStore>,
    Json(body): Json<CheckPasswordBody>,
) -> HandlerResult {
    let mut state = store.inner.lock().unwrap();
    state.password_checks.push(body.password.clone());
    if state.password_check_failing {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Password backend down".to_string(),
        ));
    }
    Ok(Json(json!({ "isValid": body.password == TEST_PASSWORD })))
}

fn string_field(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn make_app(store: FakeStore) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{id}", put(update_book).delete(delete_book))
        .route("/check-password", post(check_password))
        .route(
            &format!("{}/books", MALFORMED_PREFIX),
            get(|| async { Json(json!({ "items": [] })) }),
        )
        .with_state(store)
}

// ============================================================================
// Server
// ============================================================================

/// Test server instance backed by a seeded [`FakeStore`].
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Direct access to the store's data
    pub store: FakeStore,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port and waits until it answers.
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready
    /// within [`SERVER_READY_TIMEOUT_MS`].
    pub async fn spawn() -> Self {
        let store = FakeStore::seeded();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let app = make_app(store.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    /// A production client pointed at this server.
    pub fn client(&self) -> BookStoreClient {
        BookStoreClient::new(self.base_url.clone(), CLIENT_TIMEOUT_SEC)
            .expect("Failed to build book store client")
    }

    /// Waits for the server to become ready by polling `GET /books`
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/books", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
