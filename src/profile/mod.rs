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

//! Target profiles: the per-device parameters the register codec runs with.
//!
//! Each session picks one profile at start-up and owns its own instance, so
//! register tables are never shared between sessions.

pub mod cisco2600;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dump;
use crate::error::{CodecError, LayoutError};
use crate::registers::{RegisterLayout, RegisterValue};

pub use cisco2600::Cisco2600;

/// What the debugger front end may offer for a target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ts_rs::TS)]
#[ts(export, export_to = "register-codec/")]
pub struct DebuggerOptions {
    pub can_terminate: bool,
    pub can_memmap: bool,
    pub can_valid_memory: bool,
    pub can_multithread: bool,
    pub has_stack: bool,
    pub page_size: u32,
}

impl Default for DebuggerOptions {
    fn default() -> Self {
        Self {
            can_terminate: true,
            can_memmap: true,
            can_valid_memory: true,
            can_multithread: true,
            has_stack: true,
            page_size: 4096,
        }
    }
}

/// Architecture- and vendor-specific behaviour of a debug stub.
pub trait TargetProfile: Send + Sync {
    fn name(&self) -> &str;

    /// Address size in bits.
    fn address_size(&self) -> u32;

    /// Index of the program counter in the register dump.
    fn instruction_pointer_index(&self) -> usize;

    /// Text the stub sends when it first takes control.
    fn greet_message(&self) -> &str;

    fn is_breakpoint_message(&self, msg: &str) -> bool {
        msg == self.greet_message()
    }

    fn register_layout(&self) -> &RegisterLayout;

    /// Undo the stub's run-length compression.
    fn decode_run_length(&self, encoded: &str) -> Result<String, CodecError>;

    fn parse_registers(&self, flat_hex: &str) -> Result<Vec<RegisterValue>, CodecError> {
        dump::parse(flat_hex, self.register_layout())
    }

    /// Expand and parse a register dump reply in one step.
    fn decode_register_reply(&self, reply: &str) -> Result<Vec<RegisterValue>, CodecError> {
        let flat = self.decode_run_length(reply)?;
        self.parse_registers(&flat)
    }

    fn debugger_options(&self) -> DebuggerOptions;
}

/// Profile selector, as given on the command line or in `initialize`.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, ts_rs::TS,
)]
#[ts(export, export_to = "register-codec/")]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    #[value(name = "cisco2600")]
    Cisco2600,
}

impl ProfileKind {
    /// Build a fresh profile and check its register layout.
    pub fn create(self) -> Result<Box<dyn TargetProfile>, LayoutError> {
        let profile: Box<dyn TargetProfile> = match self {
            ProfileKind::Cisco2600 => Box::new(Cisco2600::new()),
        };
        profile.register_layout().validate()?;
        debug!(
            "created profile {} with {} registers",
            profile.name(),
            profile.register_layout().len()
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_kind_round_trips_through_json() {
        let kind: ProfileKind = serde_json::from_str("\"cisco2600\"").unwrap();
        assert_eq!(kind, ProfileKind::Cisco2600);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"cisco2600\"");
        assert!(serde_json::from_str::<ProfileKind>("\"mips\"").is_err());
    }

    #[test]
    fn profile_kind_parses_from_cli_text() {
        use clap::ValueEnum;
        assert_eq!(
            ProfileKind::from_str("cisco2600", true),
            Ok(ProfileKind::Cisco2600)
        );
    }

    #[test]
    fn each_create_returns_its_own_instance() {
        let a = ProfileKind::Cisco2600.create().unwrap();
        let b = ProfileKind::Cisco2600.create().unwrap();
        assert_eq!(a.register_layout(), b.register_layout());
        assert!(!std::ptr::eq(a.register_layout(), b.register_layout()));
    }

    #[test]
    fn breakpoint_message_defaults_to_greet() {
        let p = ProfileKind::Cisco2600.create().unwrap();
        assert!(p.is_breakpoint_message(p.greet_message()));
        assert!(!p.is_breakpoint_message("S05"));
    }
}
