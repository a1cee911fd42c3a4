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

use super::layout::{RegisterDescriptor, RegisterRole};

/// One register value from a parsed dump.
///
/// `value` is hex text: the raw digits as sent by the stub for wire
/// registers, or the unpadded field value for derived registers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct RegisterValue {
    pub name: String,
    pub value: String,
    pub is_pc: bool,
    pub is_sp: bool,
}

impl RegisterValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_pc: false,
            is_sp: false,
        }
    }

    /// Value for a wire register, tagged with the descriptor's role.
    pub fn from_wire(desc: &RegisterDescriptor, raw: &str) -> Self {
        Self {
            name: desc.name.clone(),
            value: raw.to_string(),
            is_pc: desc.role == RegisterRole::InstructionPointer,
            is_sp: desc.role == RegisterRole::StackPointer,
        }
    }

    /// Numeric value, if the text is plain hex.
    pub fn as_u64(&self) -> Option<u64> {
        parse_hex(&self.value)
    }
}

/// Strict base-16 parse: no sign, no prefix, no empty input.
pub(crate) fn parse_hex(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(text, 16).ok()
}
