//! Phoenix-channel framing for the realtime socket.
//!
//! Every message on the wire is one JSON object
//! `{topic, event, payload, ref}`. Channels join with a
//! `postgres_changes` config naming the table, the event mask, and an
//! optional column filter; the backend then pushes `postgres_changes`
//! events whose payload carries `{eventType, old, new}` row images.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use store::events::{ChangeKind, RawChange};
use store::models::Table;

pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_LEAVE: &str = "phx_leave";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_HEARTBEAT: &str = "heartbeat";
pub const EVENT_CHANGES: &str = "postgres_changes";

/// Which row-level events a channel wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventMask {
    Insert,
    Update,
    Delete,
    All,
}

impl EventMask {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventMask::Insert => "INSERT",
            EventMask::Update => "UPDATE",
            EventMask::Delete => "DELETE",
            EventMask::All => "*",
        }
    }

    pub fn matches(&self, kind: ChangeKind) -> bool {
        match self {
            EventMask::All => true,
            EventMask::Insert => kind == ChangeKind::Insert,
            EventMask::Update => kind == ChangeKind::Update,
            EventMask::Delete => kind == ChangeKind::Delete,
        }
    }
}

/// Join-time configuration of one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelConfig {
    pub table: Table,
    pub events: EventMask,
    /// Optional column predicate, e.g. `id=eq.c1`.
    pub filter: Option<String>,
}

impl ChannelConfig {
    pub fn new(table: Table, events: EventMask) -> Self {
        Self {
            table,
            events,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Channel topic: one logical channel per (table, filter) purpose.
    pub fn topic(&self) -> String {
        match &self.filter {
            Some(filter) => format!("realtime:public:{}:{}", self.table, filter),
            None => format!("realtime:public:{}", self.table),
        }
    }
}

/// One message on the realtime socket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Frame {
    pub fn join(config: &ChannelConfig, reference: u64) -> Frame {
        let mut changes = json!({
            "event": config.events.as_str(),
            "schema": "public",
            "table": config.table.as_str(),
        });
        if let Some(filter) = &config.filter {
            changes["filter"] = Value::String(filter.clone());
        }
        Frame {
            topic: config.topic(),
            event: EVENT_JOIN.to_string(),
            payload: json!({ "config": { "postgres_changes": [changes] } }),
            reference: Some(reference.to_string()),
        }
    }

    pub fn leave(topic: &str, reference: u64) -> Frame {
        Frame {
            topic: topic.to_string(),
            event: EVENT_LEAVE.to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    pub fn heartbeat(reference: u64) -> Frame {
        Frame {
            topic: "phoenix".to_string(),
            event: EVENT_HEARTBEAT.to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    pub fn is_change(&self) -> bool {
        self.event == EVENT_CHANGES
    }

    /// `phx_reply` with an error status.
    pub fn is_error_reply(&self) -> bool {
        self.event == EVENT_REPLY
            && self.payload.get("status").and_then(Value::as_str) == Some("error")
    }

    /// Decode the row images of a `postgres_changes` frame.
    pub fn change_payload(&self) -> Option<RawChange> {
        if !self.is_change() {
            return None;
        }
        serde_json::from_value(self.payload.clone()).ok()
    }
}
