//! Scripted transport for exercising the flows without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use tokio::sync::oneshot;

use crate::infra::http::{HttpRequest, HttpResponse, Transport, TransportError};

enum Reply {
    Ready(Result<HttpResponse, TransportError>),
    Gated(oneshot::Receiver<HttpResponse>),
}

/// Answers requests in dispatch order and records what was sent.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, body: &str) -> Self {
        self.push(Reply::Ready(Ok(json_response(body))));
        self
    }

    pub(crate) fn fail(self, err: TransportError) -> Self {
        self.push(Reply::Ready(Err(err)));
        self
    }

    /// Queue a reply that resolves once the returned sender fires.
    pub(crate) fn gate(&self) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Gated(rx));
        tx
    }

    pub(crate) fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

pub(crate) fn json_response(body: &str) -> HttpResponse {
    HttpResponse {
        status: StatusCode::OK,
        body: Bytes::copy_from_slice(body.as_bytes()),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request");
        match reply {
            Reply::Ready(result) => result,
            Reply::Gated(rx) => rx
                .await
                .map_err(|_| TransportError::Other("gate dropped".into())),
        }
    }
}
