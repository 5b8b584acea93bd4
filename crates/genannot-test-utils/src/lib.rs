//! Test doubles for the genannot workspace.
//!
//! [`ScriptedTransport`] stands in for the network: routes are matched by
//! substring against `url?k=v&k=v`, every call is recorded with its start
//! time, and unmatched requests get a 404.

pub mod fixtures;

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use genannot_common::{FetchError, HttpResponse, HttpTransport};
use serde_json::Value;

/// What a route answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    Fail(FetchError),
    /// Wait, then answer.
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Reply::Respond(HttpResponse::json(status, &body))
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Respond(HttpResponse::new(status, body))
    }

    pub fn transport_error(msg: &str) -> Self {
        Reply::Fail(FetchError::Transport(msg.to_string()))
    }

    pub fn after(self, delay: Duration) -> Self {
        Reply::Delayed(delay, Box::new(self))
    }
}

/// One observed request.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub started: Instant,
}

impl RecordedCall {
    /// `url?k=v&k=v`, the string routes are matched against.
    pub fn request_line(&self) -> String {
        request_line(&self.url, &self.params)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

fn request_line(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}?{}", url, query.join("&"))
}

pub struct ScriptedTransport {
    routes: Vec<(String, Reply)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self { routes: Vec::new(), calls: Mutex::new(Vec::new()) }
    }

    /// Add a route. The first route whose fragment occurs in the request
    /// line wins, so register specific fragments before general ones.
    pub fn route(mut self, fragment: &str, reply: Reply) -> Self {
        self.routes.push((fragment.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, fragment: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.request_line().contains(fragment))
            .count()
    }

    fn reply_for(&self, line: &str) -> Reply {
        self.routes
            .iter()
            .find(|(fragment, _)| line.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::status(404, "not found"))
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<HttpResponse, FetchError> {
        let call = RecordedCall {
            url: url.to_string(),
            params: params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            started: Instant::now(),
        };
        let mut reply = self.reply_for(&call.request_line());
        self.calls.lock().unwrap().push(call);

        loop {
            match reply {
                Reply::Respond(resp) => return Ok(resp),
                Reply::Fail(err) => return Err(err),
                Reply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}
