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

//! Splits a flat register dump (the expanded reply to a `g` packet) into
//! named register values.
//!
//! Parsing runs in two passes. The first slices every wire register out of
//! the hex text at its layout offset, two hex digits per byte. The second
//! walks those values in order and, after each composite register, appends
//! the fields cut from its bits. Every field is computed from the parent's
//! raw integer, never from another field's rendered text.

use log::debug;

use crate::error::{CodecError, DumpFault};
use crate::registers::value::parse_hex;
use crate::registers::{RegisterDescriptor, RegisterLayout, RegisterValue};

/// Parse `flat_hex` against `layout`.
///
/// Fails with [`CodecError::MalformedDump`] if the text ends before the last
/// wire register's final digit. Text past that point is ignored.
pub fn parse(flat_hex: &str, layout: &RegisterLayout) -> Result<Vec<RegisterValue>, CodecError> {
    let wire = extract_wire_values(flat_hex, layout)?;
    let values = expand_fields(wire, layout)?;

    let used = layout.required_hex_len();
    if flat_hex.len() > used {
        debug!(
            "register dump has {} hex digits past the layout, ignored",
            flat_hex.len() - used
        );
    }
    debug!("parsed {} register values", values.len());
    Ok(values)
}

fn extract_wire_values<'a>(
    flat_hex: &str,
    layout: &'a RegisterLayout,
) -> Result<Vec<(&'a RegisterDescriptor, RegisterValue)>, CodecError> {
    let mut values = Vec::with_capacity(layout.len());
    let mut offset = 0;

    for desc in layout.wire_registers() {
        let end = offset + desc.size * 2;
        if end > flat_hex.len() {
            return Err(malformed(
                desc,
                DumpFault::Truncated {
                    needed: end,
                    actual: flat_hex.len(),
                },
            ));
        }
        // Only fails when `end` splits a multi-byte character.
        let raw = flat_hex.get(offset..end).ok_or_else(|| {
            let lossy = String::from_utf8_lossy(&flat_hex.as_bytes()[offset..end]);
            malformed(desc, DumpFault::NotHex(lossy.into_owned()))
        })?;
        values.push((desc, RegisterValue::from_wire(desc, raw)));
        offset = end;
    }
    Ok(values)
}

fn expand_fields(
    wire: Vec<(&RegisterDescriptor, RegisterValue)>,
    layout: &RegisterLayout,
) -> Result<Vec<RegisterValue>, CodecError> {
    let mut values = Vec::with_capacity(layout.len());

    for (desc, value) in wire {
        if !layout.has_fields(&desc.name) {
            values.push(value);
            continue;
        }
        let raw = parse_hex(&value.value)
            .ok_or_else(|| malformed(desc, DumpFault::NotHex(value.value.clone())))?;
        values.push(value);
        for (field_desc, field) in layout.fields_of(&desc.name) {
            values.push(RegisterValue::new(
                field_desc.name.clone(),
                format!("{:x}", field.extract(raw)),
            ));
        }
    }
    Ok(values)
}

fn malformed(desc: &RegisterDescriptor, fault: DumpFault) -> CodecError {
    CodecError::MalformedDump {
        register: desc.name.clone(),
        fault,
    }
}
