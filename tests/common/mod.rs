use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One scripted collector reply.
#[derive(Clone, Copy)]
pub struct Reply {
    pub status: u16,
    pub body: &'static str,
}

pub const SUCCESS: Reply = Reply {
    status: 200,
    body: r#"{"text":"Success","code":0}"#,
};
pub const SERVER_BUSY: Reply = Reply {
    status: 503,
    body: r#"{"text":"Server is busy","code":9}"#,
};
pub const INVALID_TOKEN: Reply = Reply {
    status: 403,
    body: r#"{"text":"Invalid token","code":4}"#,
};
pub const CHANNEL_MISSING: Reply = Reply {
    status: 400,
    body: r#"{"text":"Data channel is missing","code":10}"#,
};

#[derive(Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct CollectorState {
    requests: Mutex<Vec<RecordedRequest>>,
    replies: Mutex<VecDeque<Reply>>,
}

/// In-process collector endpoint answering with scripted replies. Once the
/// script is exhausted every further request succeeds.
pub struct TestCollector {
    addr: SocketAddr,
    state: Arc<CollectorState>,
    _handle: JoinHandle<()>,
}

impl TestCollector {
    pub async fn launch(replies: &[Reply]) -> Self {
        let state = Arc::new(CollectorState {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.iter().copied().collect()),
        });

        let app = Router::new()
            .route("/services/collector", post(respond))
            .route("/services/collector/raw", post(respond))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            _handle: handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn respond(
    State(state): State<Arc<CollectorState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().unwrap_or("").to_string(),
        headers,
        body: body.to_vec(),
    });

    let reply = state.replies.lock().unwrap().pop_front().unwrap_or(SUCCESS);
    (
        StatusCode::from_u16(reply.status).unwrap(),
        reply.body.to_string(),
    )
}

/// Splits a query string into decoded-enough key/value pairs for assertions.
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key.to_string(), value.to_string())
        })
        .collect()
}

pub fn query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
