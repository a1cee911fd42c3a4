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

//! Register catalog and register values.
//!
//! A [`RegisterLayout`] is the ordered list of everything a target profile
//! exposes: registers that occupy a slot in the stub's register dump, and
//! derived fields that are cut out of a composite register's bits after the
//! dump has been split up. A [`RegisterValue`] is one entry of a parsed dump.

pub mod layout;
pub mod value;

pub use layout::{BitField, RegisterDescriptor, RegisterLayout, RegisterRole, RegisterSource};
pub use value::RegisterValue;
