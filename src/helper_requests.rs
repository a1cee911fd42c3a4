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

use serde::{Deserialize, Serialize};

use crate::profile::{DebuggerOptions, ProfileKind};
use crate::registers::{RegisterDescriptor, RegisterRole, RegisterValue};

// Request and response types exchanged between the helper and the debug session front end. Every request
// carries a 'req' discriminant and a 'seq' number; every response echoes both so the front end can match them.
// Register values travel as hex strings, exactly as the stub sent them, so no precision is lost on the JS side.

#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct InitializeRequest {
    pub req: String, // e.g. "initialize"
    pub seq: u64,
    pub profile: ProfileKind,
}

/**
 * RegisterInfo is the flattened form of a register descriptor for the front end. Wire registers have a
 * non-zero size and no parent; derived fields have size 0 and name the register they are cut from.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct RegisterInfo {
    pub name: String,
    pub size: u32,
    pub editable: bool,
    pub is_pc: bool,
    pub is_sp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits: Option<u32>,
}

impl From<&RegisterDescriptor> for RegisterInfo {
    fn from(desc: &RegisterDescriptor) -> Self {
        let field = desc.bit_field();
        Self {
            name: desc.name.clone(),
            size: desc.size as u32,
            editable: desc.editable,
            is_pc: desc.role == RegisterRole::InstructionPointer,
            is_sp: desc.role == RegisterRole::StackPointer,
            parent: field.map(|f| f.parent.clone()),
            shift: field.map(|f| f.shift),
            bits: field.map(|f| f.bits),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct InitializeResponse {
    pub req: String, // "initialize"
    pub seq: u64,
    pub profile: ProfileKind,
    pub address_size: u32,
    pub instruction_pointer_index: u32,
    pub greet_message: String,
    pub options: DebuggerOptions,
    pub registers: Vec<RegisterInfo>,
}

/**
 * RegistersRequest carries one register dump reply from the stub, with framing and checksum already
 * removed. The reply may still be run-length compressed.
 */
#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct RegistersRequest {
    pub req: String, // e.g. "registers"
    pub seq: u64,
    pub reply: String,
}

#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct RegistersResponse {
    pub req: String, // "registers"
    pub seq: u64,
    pub registers: Vec<RegisterValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct DecodeRequest {
    pub req: String, // e.g. "decode"
    pub seq: u64,
    pub payload: String,
}

#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct DecodeResponse {
    pub req: String, // "decode"
    pub seq: u64,
    pub expanded: String,
}

#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct ClassifyRequest {
    pub req: String, // e.g. "classify"
    pub seq: u64,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct ClassifyResponse {
    pub req: String, // "classify"
    pub seq: u64,
    pub is_breakpoint: bool,
}

/**
 * ErrorResponse answers any request that could be matched to a 'seq' but could not be served. 'kind' is one of
 * "MalformedEncoding", "MalformedDump", "NotInitialized" or "BadRequest". The session stays usable afterwards.
 */
#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct ErrorResponse {
    pub req: String,
    pub seq: u64,
    pub kind: String,
    pub message: String,
}

/**
 * Events generated by the helper process and sent to the front end.
 * Uses internally-tagged enum serialization so each variant has a 'type' field.
 * In TypeScript, this becomes a discriminated union for type-safe event handling.
 */
#[derive(Serialize, Deserialize, Debug, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
#[serde(tag = "type")]
pub enum HelperEvent {
    /// A profile is selected and register requests can be served
    SessionReady {
        session_id: String,
        profile: ProfileKind,
        register_count: u32,
    },

    /// A message arrived that could not be matched to any request
    Error {
        session_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        message: String,
    },
}
