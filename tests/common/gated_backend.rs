//! Backend that holds one response until the test releases it
//!
//! wiremock answers from its own runtime after a fixed delay, so "answer only
//! after this other call finished" cannot be expressed with it. This server
//! runs on the test's runtime and parks the first request to one endpoint on
//! a semaphore instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use finboard::session::{MemoryNavigator, SessionManager};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Notify, Semaphore};

use super::mock_server::{test_config, API_PREFIX};

/// A canned response
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

struct GateState {
    held_endpoint: String,
    held_reply: Reply,
    held_taken: AtomicBool,
    routes: Vec<(String, Reply)>,
    hits: Mutex<Vec<String>>,
    arrived: Notify,
    release: Semaphore,
}

pub struct GatedBackend {
    base: String,
    state: Arc<GateState>,
}

/// A client wired to a [`GatedBackend`]
pub struct GatedApp {
    pub manager: SessionManager,
    pub navigator: Arc<MemoryNavigator>,
}

impl GatedBackend {
    /// Serve `routes`, holding the first request to `held.0` until
    /// [`release`](Self::release). Unlisted endpoints answer 204.
    pub async fn start(held: (&str, Reply), routes: Vec<(&str, Reply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind gated backend");
        let addr = listener.local_addr().expect("gated backend address");
        let state = Arc::new(GateState {
            held_endpoint: held.0.to_string(),
            held_reply: held.1,
            held_taken: AtomicBool::new(false),
            routes: routes
                .into_iter()
                .map(|(endpoint, reply)| (endpoint.to_string(), reply))
                .collect(),
            hits: Mutex::new(Vec::new()),
            arrived: Notify::new(),
            release: Semaphore::new(0),
        });

        let accept_state = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = accept_state.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, state).await;
                });
            }
        });

        Self {
            base: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self, initial_path: &str) -> GatedApp {
        let navigator = Arc::new(MemoryNavigator::new(initial_path));
        let manager = SessionManager::new(test_config(&self.base), navigator.clone())
            .expect("client builds");
        GatedApp { manager, navigator }
    }

    /// Resolves once the held request has reached the backend
    pub async fn held_request_arrived(&self) {
        self.state.arrived.notified().await;
    }

    /// Let the held request answer
    pub fn release(&self) {
        self.state.release.add_permits(1);
    }

    pub fn hits(&self, endpoint: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .iter()
            .filter(|hit| *hit == endpoint)
            .count()
    }
}

async fn serve(mut stream: TcpStream, state: Arc<GateState>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    // Drain the body so closing the socket does not reset the connection
    let mut remaining = content_length.saturating_sub(buf.len() - head_end);
    while remaining > 0 {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        remaining = remaining.saturating_sub(n);
    }

    let target = head.split_whitespace().nth(1).unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/");
    let endpoint = path.strip_prefix(API_PREFIX).unwrap_or(path).to_string();
    state.hits.lock().unwrap().push(endpoint.clone());

    let reply = if endpoint == state.held_endpoint && !state.held_taken.swap(true, Ordering::SeqCst)
    {
        state.arrived.notify_one();
        let _permit = state.release.acquire().await.expect("gate semaphore open");
        state.held_reply.clone()
    } else {
        state
            .routes
            .iter()
            .find(|(route, _)| *route == endpoint)
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::status(204))
    };

    let reason = StatusCode::from_u16(reply.status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown");
    let response = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        reply.status,
        reason,
        reply.body.len(),
        reply.body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
