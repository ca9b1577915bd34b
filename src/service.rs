use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint { Solution, Random, Hello, }

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Solution => "call-solution",
            Endpoint::Random => "call-random",
            Endpoint::Hello => "hello",
        }
    }
}

/// `message` of a reply, `None` when the service answered with a falsy value
pub type Reply = Option<String>;

pub trait Transport {
    fn post(&self, endpoint: Endpoint, arg: &str) -> Result<Reply>;
}

#[derive(Serialize)]
struct Request<'a> {
    arg: &'a str,
}

#[derive(Deserialize)]
struct Envelope {
    message: Value,
}

fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Decodes a `{"message": ...}` body.
pub fn decode_reply(body: &str) -> Result<Reply> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| Error::MalformedServiceResponse(e.to_string()))?;
    Ok(match envelope.message {
        ref v if is_falsy(v) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

pub struct HttpTransport {
    config : Config,
    agent  : ureq::Agent,
}

impl HttpTransport {
    pub fn new(config: Config) -> HttpTransport {
        HttpTransport { config, agent: ureq::agent() }
    }
}

impl Transport for HttpTransport {
    fn post(&self, endpoint: Endpoint, arg: &str) -> Result<Reply> {
        let url = self.config.url(endpoint);
        debug!("POST {url} ({} bytes)", arg.len());

        let response = self.agent.post(&url)
            .set("Content-Type", "application/json")
            .send_json(Request { arg })
            .map_err(|e| Error::ServiceUnavailable(e.to_string()))?;
        let body = response.into_string()
            .map_err(|e| Error::ServiceUnavailable(e.to_string()))?;

        decode_reply(&body)
    }
}

/// Liveness probe. The answer is only logged.
pub fn hello(transport: &dyn Transport, greeting: &str) {
    match transport.post(Endpoint::Hello, greeting) {
        Ok(Some(message)) => info!("backend says: {message}"),
        Ok(None) => info!("backend answered with an empty greeting"),
        Err(e) => warn!("error connecting to backend: {e}"),
    }
}

/// Scripted transport. Replies are handed out per endpoint in the order they
/// were pushed; an endpoint with nothing scripted is unavailable.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies  : Mutex<HashMap<Endpoint, VecDeque<Result<Reply>>>>,
    requests : Mutex<Vec<(Endpoint, String)>>,
}

impl MockTransport {
    pub fn new() -> MockTransport {
        MockTransport::default()
    }

    pub fn push_reply(&self, endpoint: Endpoint, reply: Result<Reply>) {
        self.replies.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(endpoint)
            .or_default()
            .push_back(reply);
    }

    /// every request seen so far, oldest first
    pub fn requests(&self) -> Vec<(Endpoint, String)> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Transport for MockTransport {
    fn post(&self, endpoint: Endpoint, arg: &str) -> Result<Reply> {
        self.requests.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((endpoint, arg.to_string()));
        self.replies.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(Error::ServiceUnavailable(format!("nothing scripted for {}", endpoint.path()))))
    }
}
