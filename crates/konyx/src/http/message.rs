//! Error message extraction for non-2xx responses
//!
//! Strategies run in order. Body strategies may pass (try the next one) or
//! abort (skip straight to the fallbacks). Fallbacks end in a constant, so
//! extraction itself never fails.

use konyx_transport::HttpResponse;

/// Message used when nothing better can be derived from the response.
pub const GENERIC_FAILURE: &str = "Request failed";

enum Extraction {
    Found(String),
    Pass,
    Abort,
}

type Strategy = fn(&HttpResponse) -> Extraction;

const BODY_STRATEGIES: &[Strategy] = &[json_body, text_body];
const FALLBACK_STRATEGIES: &[Strategy] = &[status_text];

/// Derive a human-readable message from an unsuccessful response.
pub fn extract_message(response: &HttpResponse) -> String {
    for strategy in BODY_STRATEGIES {
        match strategy(response) {
            Extraction::Found(message) => return message,
            Extraction::Pass => continue,
            Extraction::Abort => break,
        }
    }

    for strategy in FALLBACK_STRATEGIES {
        if let Extraction::Found(message) = strategy(response) {
            return message;
        }
    }

    GENERIC_FAILURE.to_string()
}

/// JSON body: its string `message` field, else the whole document.
fn json_body(response: &HttpResponse) -> Extraction {
    if !response.content_type().contains("application/json") {
        return Extraction::Pass;
    }

    match serde_json::from_slice::<serde_json::Value>(&response.body) {
        Ok(value) => match value.get("message").and_then(|m| m.as_str()) {
            Some(message) => Extraction::Found(message.to_string()),
            None => Extraction::Found(value.to_string()),
        },
        Err(_) => Extraction::Abort,
    }
}

fn text_body(response: &HttpResponse) -> Extraction {
    let text = response.text_lossy();
    if text.is_empty() {
        Extraction::Pass
    } else {
        Extraction::Found(text)
    }
}

fn status_text(response: &HttpResponse) -> Extraction {
    match response.status_text() {
        Some(text) if !text.is_empty() => Extraction::Found(text.to_string()),
        _ => Extraction::Pass,
    }
}
