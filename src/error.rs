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

//! Error types for the register codec.

use thiserror::Error;

/// Errors produced while turning a stub reply into register values.
///
/// Neither kind is retryable as-is: the caller should drop the whole reply
/// and decide whether to poll the stub again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The run-length compressed text breaks a structural rule.
    #[error("malformed run-length encoding at byte offset {position}: {fault}")]
    MalformedEncoding {
        /// Byte offset of the offending run marker.
        position: usize,
        fault: EncodingFault,
    },

    /// The flat hex text does not fit the register layout.
    #[error("malformed register dump at register {register}: {fault}")]
    MalformedDump { register: String, fault: DumpFault },
}

impl CodecError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::MalformedEncoding { .. } => "MalformedEncoding",
            CodecError::MalformedDump { .. } => "MalformedDump",
        }
    }
}

/// Why a run-length encoded string was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFault {
    #[error("marker has no preceding character to repeat")]
    LeadingMarker,

    #[error("marker is followed by fewer than two count digits")]
    TruncatedCount,

    #[error("count digits {0:?} are not hexadecimal")]
    InvalidCount([char; 2]),

    #[error("repeat count is zero")]
    ZeroCount,
}

/// Why a flat register dump was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DumpFault {
    /// The text ends before the register's last hex digit.
    #[error("needs hex digits up to offset {needed}, dump has {actual}")]
    Truncated { needed: usize, actual: usize },

    /// A composite register cannot be split because its text is not hex.
    #[error("value {0:?} is not hexadecimal")]
    NotHex(String),
}

/// Static problems in a register layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("register name {0} is declared more than once")]
    DuplicateName(String),

    #[error("field {field} refers to unknown or later register {parent}")]
    UnknownParent { field: String, parent: String },

    #[error("field {field} refers to {parent}, which has no wire slot")]
    ParentNotOnWire { field: String, parent: String },

    #[error("field {field} (shift {shift}, {bits} bits) does not fit in {parent_bits}-bit parent")]
    FieldOutOfRange {
        field: String,
        shift: u32,
        bits: u32,
        parent_bits: u32,
    },

    #[error("wire register {0} is declared after a derived field")]
    WireAfterField(String),

    #[error("wire register {name} has unsupported width {size}")]
    BadWidth { name: String, size: usize },
}
