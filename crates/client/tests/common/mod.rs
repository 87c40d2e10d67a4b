//! Shared helpers for client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use kuler_client::retry::RetryConfig;
use kuler_client::{ClientConfig, KulerClient, RelayRequest, RelayTransport, TransportError};

/// One scripted relay answer.
pub enum Scripted {
    Json(Value),
    Error(&'static str),
}

/// Transport that replays scripted answers in order and records every
/// request it receives. Once the script runs out it answers `{}`, which the
/// loader treats as a malformed response.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RelayRequest>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Every fetch waits for `gate.notify_one()` before answering.
    pub fn gated(script: Vec<Scripted>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(script)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RelayRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayTransport for ScriptedTransport {
    async fn fetch(&self, request: &RelayRequest) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Json(value)) => Ok(value),
            Some(Scripted::Error(msg)) => Err(TransportError::Decode(msg.to_string())),
            None => Ok(json!({})),
        }
    }
}

/// Client over `transport` that retries without waiting.
pub fn test_client(transport: Arc<ScriptedTransport>) -> KulerClient {
    let config = ClientConfig::new("http://relay.test/relay").with_retry(RetryConfig::immediate());
    KulerClient::with_transport(config, transport)
}

/// Poll until `predicate` holds, yielding to the runtime in between.
pub async fn wait_until(predicate: impl Fn() -> bool) {
    for _ in 0..1_000 {
        if predicate() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

pub fn theme_item(id: &str) -> Value {
    json!({
        "title": format!("Theme {id}"),
        "link": format!("https://kuler.test/themes/{id}"),
        "description": "<p>A theme</p>",
        "pubDate": "Thu, 02 Jan 2014 10:11:12 +0000",
        "themeID": id,
        "themeTitle": format!("Theme {id}"),
        "themeImage": format!("https://kuler.test/{id}.png"),
        "themeAuthor": { "authorID": "42", "authorLabel": "jane" },
        "themeTags": "blue, sky, calm",
        "themeRating": 4.5,
        "themeDownloadCount": 17,
        "themeCreatedAt": "20140102",
        "themeEditedAt": "20140103",
        "themeSwatches": { "swatch": [
            {
                "swatchHexColor": "FFFFFF", "swatchColorMode": "rgb",
                "swatchChannel1": "1", "swatchChannel2": "1",
                "swatchChannel3": "1", "swatchChannel4": "0", "swatchIndex": "0"
            },
            {
                "swatchHexColor": "0x000000", "swatchColorMode": "rgb",
                "swatchChannel1": "0", "swatchChannel2": "0",
                "swatchChannel3": "0", "swatchChannel4": "0", "swatchIndex": "1"
            }
        ]}
    })
}

pub fn theme_item_without_swatches(id: &str) -> Value {
    let mut item = theme_item(id);
    item["themeSwatches"] = json!([]);
    item
}

pub fn comment_item(text: &str) -> Value {
    json!({ "comment": text, "author": "sam", "postedAt": "2014-01-02 10:11:12" })
}

pub fn items(items: Vec<Value>) -> Scripted {
    Scripted::Json(json!({ "items": items }))
}
