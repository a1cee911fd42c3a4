// Copyright (c) 2026 MCU-Debug Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Notification envelopes for helper → front end events.
use crate::helper_requests::HelperEvent;
use crate::profile::ProfileKind;
use serde_json::{json, Value};

/// Wrap an event in a JSON-RPC notification envelope.
pub fn wrap_event_as_notification(event: &HelperEvent) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "HelperEvent",
        "params": event
    })
}

/// Build a SessionReady event notification.
pub fn session_ready_notification(
    session_id: &str,
    profile: ProfileKind,
    register_count: usize,
) -> Value {
    let event = HelperEvent::SessionReady {
        session_id: session_id.to_string(),
        profile,
        register_count: register_count as u32,
    };
    wrap_event_as_notification(&event)
}

/// Build an Error event notification.
pub fn error_notification(session_id: &str, code: Option<&str>, message: &str) -> Value {
    let event = HelperEvent::Error {
        session_id: session_id.to_string(),
        code: code.map(str::to_string),
        message: message.to_string(),
    };
    wrap_event_as_notification(&event)
}
