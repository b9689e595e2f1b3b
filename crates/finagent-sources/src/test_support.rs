//! Recording transport for exercising the sources and handlers without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// What the mock hands back for one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(HttpResponse),
    Fail(String),
}

/// Mock transport that records every request and replays queued replies.
///
/// With no queued reply left it answers `200 {}`. Built with
/// [`MockTransport::forbidden`] it panics on any call, for asserting that a
/// code path never reaches the network.
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    forbid_calls: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            forbid_calls: false,
        }
    }

    pub fn forbidden() -> Self {
        Self {
            forbid_calls: true,
            ..Self::new()
        }
    }

    /// Queue a JSON reply with the given status.
    pub fn respond_json(self, status: u16, body: serde_json::Value) -> Self {
        self.push(MockReply::Respond(HttpResponse {
            status,
            body: body.to_string(),
        }))
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.push(MockReply::Respond(HttpResponse {
            status,
            body: body.to_string(),
        }))
    }

    /// Queue a transport-level failure (connection refused, DNS, ...).
    pub fn fail(self, message: &str) -> Self {
        self.push(MockReply::Fail(message.to_string()))
    }

    fn push(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .expect("mock replies lock")
            .push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("mock requests lock").clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.forbid_calls {
            panic!("network call attempted: {:?} {}", request.method, request.url);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("mock requests lock")
            .push(request);

        let reply = self.replies.lock().expect("mock replies lock").pop_front();
        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(TransportError(message)),
            None => Ok(HttpResponse {
                status: 200,
                body: "{}".to_string(),
            }),
        }
    }
}
