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

/// Request parsing and dispatch for the main request loop.
use crate::helper_requests::*;
use crate::profile::{ProfileKind, TargetProfile};
use crate::protocol::{error_notification, session_ready_notification};
use crate::transport::{Transport, TransportError};
use crate::CodecError;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Per-session state. Each session owns its profile; nothing is shared.
pub struct Session {
    pub session_id: String,
    profile: Option<Box<dyn TargetProfile>>,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            profile: None,
        }
    }

    /// Start a session with a profile already selected (e.g. from the command line).
    pub fn with_profile(session_id: impl Into<String>, kind: ProfileKind) -> anyhow::Result<Self> {
        let mut session = Self::new(session_id);
        session.profile = Some(kind.create()?);
        Ok(session)
    }

    pub fn profile(&self) -> Option<&dyn TargetProfile> {
        self.profile.as_deref()
    }
}

/// Parse and dispatch one request based on its 'req' discriminant.
///
/// Returns the messages to send back, in order. Failures to serve a request
/// become `ErrorResponse`s; only serialization failures are returned as `Err`.
pub fn dispatch_request(msg: &Value, session: &mut Session) -> anyhow::Result<Vec<Value>> {
    // Peek at the 'req' discriminant to determine request type
    let req_type = msg.get("req").and_then(|v| v.as_str());

    match req_type {
        Some("initialize") => handle_initialize_request(msg, session),
        Some("registers") => handle_registers_request(msg, session),
        Some("decode") => handle_decode_request(msg, session),
        Some("classify") => handle_classify_request(msg, session),
        _ => {
            warn!("Unknown request type: {:?}", req_type);
            let text = format!("unknown request type {:?}", req_type);
            match msg.get("seq").and_then(|v| v.as_u64()) {
                Some(seq) => Ok(vec![error_response(
                    req_type.unwrap_or(""),
                    seq,
                    "BadRequest",
                    &text,
                )?]),
                None => Ok(vec![error_notification(
                    &session.session_id,
                    Some("BadRequest"),
                    &text,
                )]),
            }
        }
    }
}

/// Serve requests until the peer closes the stream.
///
/// A frame whose body is not JSON is answered with an error event and the
/// loop goes on; I/O and header errors end the session.
pub fn run_session<T: Transport>(transport: &mut T, session: &mut Session) -> anyhow::Result<()> {
    info!("session {} waiting for requests", session.session_id);
    loop {
        let msg = match transport.read_message() {
            Ok(Some(msg)) => msg,
            Ok(None) => break,
            Err(TransportError::BadBody(e)) => {
                warn!("session {}: dropping unreadable frame: {}", session.session_id, e);
                let text = format!("frame body is not valid JSON: {}", e);
                transport.write_message(&error_notification(
                    &session.session_id,
                    Some("BadRequest"),
                    &text,
                ))?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        for reply in dispatch_request(&msg, session)? {
            transport.write_message(&reply)?;
        }
    }
    info!("session {} closed", session.session_id);
    Ok(())
}

fn to_message<T: Serialize>(response: &T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(response)?)
}

fn error_response(req: &str, seq: u64, kind: &str, message: &str) -> anyhow::Result<Value> {
    to_message(&ErrorResponse {
        req: req.to_string(),
        seq,
        kind: kind.to_string(),
        message: message.to_string(),
    })
}

fn codec_error_response(req: &str, seq: u64, err: &CodecError) -> anyhow::Result<Value> {
    warn!("{} request {} rejected: {}", req, seq, err);
    error_response(req, seq, err.kind(), &err.to_string())
}

/// Deserialize into the typed request, or produce the BadRequest reply.
fn typed_request<T: DeserializeOwned>(
    req: &str,
    msg: &Value,
    session: &Session,
) -> anyhow::Result<Result<T, Value>> {
    match serde_json::from_value::<T>(msg.clone()) {
        Ok(typed) => Ok(Ok(typed)),
        Err(e) => {
            warn!("Failed to parse {} request: {}", req, e);
            let text = format!("invalid {} request: {}", req, e);
            let reply = match msg.get("seq").and_then(|v| v.as_u64()) {
                Some(seq) => error_response(req, seq, "BadRequest", &text)?,
                None => error_notification(&session.session_id, Some("BadRequest"), &text),
            };
            Ok(Err(reply))
        }
    }
}

fn not_initialized(req: &str, seq: u64) -> anyhow::Result<Vec<Value>> {
    warn!("{} request {} before initialize", req, seq);
    Ok(vec![error_response(
        req,
        seq,
        "NotInitialized",
        "no target profile selected; send initialize first",
    )?])
}

/// Handle initialize request - select the profile and report its register catalog
fn handle_initialize_request(msg: &Value, session: &mut Session) -> anyhow::Result<Vec<Value>> {
    let typed_req = match typed_request::<InitializeRequest>("initialize", msg, session)? {
        Ok(r) => r,
        Err(reply) => return Ok(vec![reply]),
    };

    let profile = typed_req.profile.create()?;
    let layout = profile.register_layout();
    let response = InitializeResponse {
        req: "initialize".to_string(),
        seq: typed_req.seq,
        profile: typed_req.profile,
        address_size: profile.address_size(),
        instruction_pointer_index: profile.instruction_pointer_index() as u32,
        greet_message: profile.greet_message().to_string(),
        options: profile.debugger_options(),
        registers: layout.catalog().iter().map(RegisterInfo::from).collect(),
    };
    let ready = session_ready_notification(&session.session_id, typed_req.profile, layout.len());
    info!(
        "session {} using profile {}",
        session.session_id,
        profile.name()
    );

    let replies = vec![to_message(&response)?, ready];
    session.profile = Some(profile);
    Ok(replies)
}

/// Handle registers request - expand and parse one register dump
fn handle_registers_request(msg: &Value, session: &mut Session) -> anyhow::Result<Vec<Value>> {
    let typed_req = match typed_request::<RegistersRequest>("registers", msg, session)? {
        Ok(r) => r,
        Err(reply) => return Ok(vec![reply]),
    };
    let Some(profile) = session.profile() else {
        return not_initialized("registers", typed_req.seq);
    };

    match profile.decode_register_reply(&typed_req.reply) {
        Ok(registers) => {
            let pc = registers
                .iter()
                .find(|r| r.is_pc)
                .map(|r| r.value.clone());
            debug!(
                "registers request {}: {} values, pc {:?}",
                typed_req.seq,
                registers.len(),
                pc
            );
            Ok(vec![to_message(&RegistersResponse {
                req: "registers".to_string(),
                seq: typed_req.seq,
                registers,
                pc,
            })?])
        }
        Err(e) => Ok(vec![codec_error_response("registers", typed_req.seq, &e)?]),
    }
}

/// Handle decode request - run-length expansion only
fn handle_decode_request(msg: &Value, session: &mut Session) -> anyhow::Result<Vec<Value>> {
    let typed_req = match typed_request::<DecodeRequest>("decode", msg, session)? {
        Ok(r) => r,
        Err(reply) => return Ok(vec![reply]),
    };
    let Some(profile) = session.profile() else {
        return not_initialized("decode", typed_req.seq);
    };

    match profile.decode_run_length(&typed_req.payload) {
        Ok(expanded) => Ok(vec![to_message(&DecodeResponse {
            req: "decode".to_string(),
            seq: typed_req.seq,
            expanded,
        })?]),
        Err(e) => Ok(vec![codec_error_response("decode", typed_req.seq, &e)?]),
    }
}

/// Handle classify request - is this stub message a breakpoint stop?
fn handle_classify_request(msg: &Value, session: &mut Session) -> anyhow::Result<Vec<Value>> {
    let typed_req = match typed_request::<ClassifyRequest>("classify", msg, session)? {
        Ok(r) => r,
        Err(reply) => return Ok(vec![reply]),
    };
    let Some(profile) = session.profile() else {
        return not_initialized("classify", typed_req.seq);
    };

    Ok(vec![to_message(&ClassifyResponse {
        req: "classify".to_string(),
        seq: typed_req.seq,
        is_breakpoint: profile.is_breakpoint_message(&typed_req.message),
    })?])
}
