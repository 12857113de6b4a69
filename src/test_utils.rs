#![cfg(test)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::session::Session;

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Request body is not JSON")
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: String,
    served: bool,
}

type CannedResponses = HashMap<String, VecDeque<Canned>>;

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<CannedResponses>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server standing in for the gallery backend.
///
/// Responses are queued per `"METHOD /path"` and served in order; the last one keeps
/// being replayed until a new one is queued behind it. Unknown routes answer 404
/// with a `message` body.
pub struct MockBackend {
    pub base_url: String,
    state: MockState,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read mock address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        MockBackend {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        let mut responses = self.state.responses.lock().unwrap();
        let queue = responses.entry(format!("{method} {path}")).or_default();
        if queue.len() == 1 && queue[0].served {
            queue.clear();
        }
        queue.push_back(Canned {
            status,
            body: body.into(),
            served: false,
        });
    }

    pub fn respond_json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond(method, path, status, body.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.path == path)
            .collect()
    }

    pub fn client(&self, session: Session) -> ApiClient {
        ApiClient::new(&self.base_url, session)
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    let key = format!("{} {}", method, uri.path());
    let canned = {
        let mut responses = state.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front_mut().map(|canned| {
                canned.served = true;
                canned.clone()
            }),
            None => None,
        }
    };
    let (status, body) = match canned {
        Some(canned) => (canned.status, canned.body),
        None => (
            404,
            json!({ "message": format!("Cannot {key}"), "statusCode": 404 }).to_string(),
        ),
    };

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Album as the backend serializes it.
pub fn album_json(id: i64, title: &str, is_public: bool, photos: Vec<Value>) -> Value {
    json!({
        "id": id,
        "title": title,
        "icon": null,
        "color": null,
        "isPublic": is_public,
        "views": id * 10,
        "createdAt": "2024-03-01T09:00:00.000Z",
        "updatedAt": "2024-03-02T09:00:00.000Z",
        "photos": photos,
    })
}

pub fn photo_json(id: i64, album_id: i64, alt: Option<&str>, is_public: bool, likes: i64) -> Value {
    json!({
        "id": id,
        "src": format!("/uploads/{id}.jpg"),
        "alt": alt,
        "albumId": album_id,
        "likes": likes,
        "isPublic": is_public,
        "uploadDate": "2024-03-05T12:00:00.000Z",
    })
}

/// Backend, client, and a session already holding `token`.
pub async fn signed_in(token: &str) -> (MockBackend, ApiClient) {
    let backend = MockBackend::start().await;
    let session = Session::in_memory();
    session.set_token(token).expect("Failed to set token");
    let client = backend.client(session);
    (backend, client)
}
