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

use std::collections::HashMap;

use crate::error::LayoutError;

/// What a register is used for, beyond holding a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterRole {
    #[default]
    General,
    InstructionPointer,
    StackPointer,
}

/// A contiguous run of bits inside a wire register.
///
/// Bit 0 is the parent's least-significant bit; the field covers
/// `shift .. shift + bits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitField {
    pub parent: String,
    pub shift: u32,
    pub bits: u32,
}

impl BitField {
    pub fn new(parent: impl Into<String>, shift: u32, bits: u32) -> Self {
        Self {
            parent: parent.into(),
            shift,
            bits,
        }
    }

    pub fn mask(&self) -> u64 {
        if self.bits >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << self.bits) - 1
        }
    }

    /// Cut this field out of the parent's raw value.
    pub fn extract(&self, parent_value: u64) -> u64 {
        parent_value.checked_shr(self.shift).unwrap_or(0) & self.mask()
    }
}

/// Where a register's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterSource {
    /// The register has its own slot in the dump.
    Wire,
    /// The register is computed from a wire register's bits.
    Field(BitField),
}

/// Static description of one register or derived field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    pub name: String,
    /// Width in bytes. Always 0 for derived fields.
    pub size: usize,
    pub editable: bool,
    pub role: RegisterRole,
    pub source: RegisterSource,
}

impl RegisterDescriptor {
    pub fn wire(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            editable: true,
            role: RegisterRole::General,
            source: RegisterSource::Wire,
        }
    }

    pub fn field(name: impl Into<String>, parent: impl Into<String>, shift: u32, bits: u32) -> Self {
        Self {
            name: name.into(),
            size: 0,
            editable: true,
            role: RegisterRole::General,
            source: RegisterSource::Field(BitField::new(parent, shift, bits)),
        }
    }

    pub fn with_role(mut self, role: RegisterRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_wire(&self) -> bool {
        matches!(self.source, RegisterSource::Wire)
    }

    pub fn bit_field(&self) -> Option<&BitField> {
        match &self.source {
            RegisterSource::Field(field) => Some(field),
            RegisterSource::Wire => None,
        }
    }
}

/// Ordered register catalog for one target profile.
///
/// Order is significant: the byte offset of a wire register inside a dump is
/// the sum of the sizes of the wire registers declared before it. Derived
/// fields are listed after every wire register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLayout {
    descriptors: Vec<RegisterDescriptor>,
}

impl RegisterLayout {
    pub fn new(descriptors: Vec<RegisterDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Every descriptor, in declaration order.
    pub fn catalog(&self) -> &[RegisterDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn wire_registers(&self) -> impl Iterator<Item = &RegisterDescriptor> {
        self.descriptors.iter().filter(|d| d.is_wire())
    }

    /// Total bytes of all wire registers.
    pub fn wire_size(&self) -> usize {
        self.wire_registers().map(|d| d.size).sum()
    }

    /// Shortest flat hex string a dump parse will accept.
    pub fn required_hex_len(&self) -> usize {
        self.wire_size() * 2
    }

    pub fn find(&self, name: &str) -> Option<&RegisterDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Position in the catalog, which is also the position in a parse result
    /// for wire registers declared before the first composite.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.name == name)
    }

    /// Byte offset of a wire register inside the dump.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for desc in self.wire_registers() {
            if desc.name == name {
                return Some(offset);
            }
            offset += desc.size;
        }
        None
    }

    /// Derived fields cut from `parent`, in declaration order.
    pub fn fields_of<'a>(
        &'a self,
        parent: &'a str,
    ) -> impl Iterator<Item = (&'a RegisterDescriptor, &'a BitField)> + 'a {
        self.descriptors.iter().filter_map(move |d| match d.bit_field() {
            Some(field) if field.parent == parent => Some((d, field)),
            _ => None,
        })
    }

    pub fn has_fields(&self, parent: &str) -> bool {
        self.fields_of(parent).next().is_some()
    }

    /// Check the static guarantees the dump parser relies on.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen: HashMap<&str, &RegisterDescriptor> = HashMap::new();
        let mut in_fields = false;

        for desc in &self.descriptors {
            if seen.contains_key(desc.name.as_str()) {
                return Err(LayoutError::DuplicateName(desc.name.clone()));
            }
            match &desc.source {
                RegisterSource::Wire => {
                    if in_fields {
                        return Err(LayoutError::WireAfterField(desc.name.clone()));
                    }
                    if !matches!(desc.size, 1 | 2 | 4 | 8) {
                        return Err(LayoutError::BadWidth {
                            name: desc.name.clone(),
                            size: desc.size,
                        });
                    }
                }
                RegisterSource::Field(field) => {
                    in_fields = true;
                    let parent = seen.get(field.parent.as_str()).ok_or_else(|| {
                        LayoutError::UnknownParent {
                            field: desc.name.clone(),
                            parent: field.parent.clone(),
                        }
                    })?;
                    if !parent.is_wire() {
                        return Err(LayoutError::ParentNotOnWire {
                            field: desc.name.clone(),
                            parent: field.parent.clone(),
                        });
                    }
                    let parent_bits = parent.size as u32 * 8;
                    if field.bits == 0 || field.shift + field.bits > parent_bits {
                        return Err(LayoutError::FieldOutOfRange {
                            field: desc.name.clone(),
                            shift: field.shift,
                            bits: field.bits,
                            parent_bits,
                        });
                    }
                }
            }
            seen.insert(desc.name.as_str(), desc);
        }
        Ok(())
    }
}
