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

//! Cisco 2600 series routers (32-bit PowerPC) running the IOS gdb stub.

use crate::error::CodecError;
use crate::registers::{RegisterDescriptor, RegisterLayout, RegisterRole};
use crate::rle;

use super::{DebuggerOptions, TargetProfile};

const GPR_COUNT: usize = 32;
const SP_GPR: usize = 1;
const CR_GROUPS: u32 = 8;
const CR_FLAGS: [&str; 4] = ["LT", "GT", "EQ", "SO"];

// (name, shift, bits)
const XER_FIELDS: &[(&str, u32, u32)] = &[
    ("xer_so", 0, 1),
    ("xer_ov", 1, 1),
    ("xer_ca", 2, 1),
    ("xer_bytecount", 24, 6),
];

const FPSCR_FIELDS: &[(&str, u32, u32)] = &[
    ("fpscr_FX", 0, 1),
    ("fpscr_FEX", 1, 1),
    ("fpscr_VX", 2, 1),
    ("fpscr_QX", 3, 1),
    ("fpscr_UX", 4, 1),
    ("fpscr_ZX", 5, 1),
    ("fpscr_XX", 6, 1),
    ("fpscr_VXNAN", 7, 1),
    ("fpscr_VXISI", 8, 1),
    ("fpscr_VXIDI", 9, 1),
    ("fpscr_VXZDZ", 10, 1),
    ("fpscr_VXIMZ", 11, 1),
    ("fpscr_VXVC", 12, 1),
    ("fpscr_FR", 13, 1),
    ("fpscr_FI", 14, 1),
    ("fpscr_FPRF", 15, 5),
    ("fpscr_VXSOFT", 21, 1),
    ("fpscr_VXSQRT", 22, 1),
    ("fpscr_VXCVI", 23, 1),
    ("fpscr_VE", 24, 1),
    ("fpscr_OE", 25, 1),
    ("fpscr_UE", 26, 1),
    ("fpscr_ZE", 27, 1),
    ("fpscr_XE", 28, 1),
    ("fpscr_NI", 29, 1),
    ("fpscr_RN", 30, 2),
];

/// Breakpoint stops and the initial greeting look the same on this stub.
const GREET_MESSAGE: &str = "||||";

pub struct Cisco2600 {
    layout: RegisterLayout,
}

impl Default for Cisco2600 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cisco2600 {
    pub fn new() -> Self {
        Self {
            layout: build_layout(),
        }
    }
}

fn build_layout() -> RegisterLayout {
    let mut regs = Vec::with_capacity(128);

    for i in 0..GPR_COUNT {
        if i == SP_GPR {
            regs.push(RegisterDescriptor::wire("sp", 4).with_role(RegisterRole::StackPointer));
        } else {
            regs.push(RegisterDescriptor::wire(format!("r{}", i), 4));
        }
    }
    regs.push(RegisterDescriptor::wire("pc", 4).with_role(RegisterRole::InstructionPointer));
    for name in ["msr", "cr", "lr", "ctr", "xer", "fpscr"] {
        regs.push(RegisterDescriptor::wire(name, 4));
    }

    // Condition register: eight 4-bit groups, cr0 in the low nibble.
    for group in 0..CR_GROUPS {
        regs.push(RegisterDescriptor::field(
            format!("cr{}", group),
            "cr",
            group * 4,
            4,
        ));
    }
    for &(name, shift, bits) in XER_FIELDS {
        regs.push(RegisterDescriptor::field(name, "xer", shift, bits));
    }
    // Per-group flags come straight from cr, not from the crN values.
    for group in 0..CR_GROUPS {
        for (bit, flag) in CR_FLAGS.iter().enumerate() {
            regs.push(RegisterDescriptor::field(
                format!("cr{}_{}", group, flag),
                "cr",
                group * 4 + bit as u32,
                1,
            ));
        }
    }
    for &(name, shift, bits) in FPSCR_FIELDS {
        regs.push(RegisterDescriptor::field(name, "fpscr", shift, bits));
    }

    RegisterLayout::new(regs)
}

impl TargetProfile for Cisco2600 {
    fn name(&self) -> &str {
        "cisco2600"
    }

    fn address_size(&self) -> u32 {
        32
    }

    fn instruction_pointer_index(&self) -> usize {
        GPR_COUNT
    }

    fn greet_message(&self) -> &str {
        GREET_MESSAGE
    }

    fn register_layout(&self) -> &RegisterLayout {
        &self.layout
    }

    fn decode_run_length(&self, encoded: &str) -> Result<String, CodecError> {
        rle::decode(encoded)
    }

    fn debugger_options(&self) -> DebuggerOptions {
        DebuggerOptions {
            // Resuming drops the router back to its console; it cannot be killed.
            can_terminate: false,
            can_multithread: false,
            can_memmap: false,
            // Probing memory over the serial line is too slow.
            can_valid_memory: false,
            has_stack: false,
            page_size: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::RegisterValue;

    fn dump_with(overrides: &[(usize, u32)]) -> String {
        let mut slots = [0u32; 39];
        for &(slot, value) in overrides {
            slots[slot] = value;
        }
        slots.iter().map(|v| format!("{:08x}", v)).collect()
    }

    fn value<'a>(values: &'a [RegisterValue], name: &str) -> &'a str {
        values
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
            .unwrap_or_else(|| panic!("no value named {}", name))
    }

    const CR_SLOT: usize = 34;
    const XER_SLOT: usize = 37;
    const FPSCR_SLOT: usize = 38;

    #[test]
    fn layout_is_valid() {
        let p = Cisco2600::new();
        assert_eq!(p.register_layout().validate(), Ok(()));
        assert_eq!(p.register_layout().len(), 39 + 8 + 4 + 32 + 26);
        assert_eq!(p.register_layout().required_hex_len(), 39 * 8);
    }

    #[test]
    fn stack_pointer_keeps_its_gpr_slot() {
        let layout = Cisco2600::new().layout;
        assert_eq!(layout.catalog()[1].name, "sp");
        assert_eq!(layout.catalog()[1].role, RegisterRole::StackPointer);
        assert_eq!(layout.offset_of("sp"), Some(4));
        assert_eq!(layout.offset_of("r2"), Some(8));
        assert!(layout.find("r1").is_none());
    }

    #[test]
    fn special_registers_follow_the_gprs() {
        let layout = Cisco2600::new().layout;
        assert_eq!(layout.offset_of("pc"), Some(32 * 4));
        assert_eq!(layout.offset_of("cr"), Some(CR_SLOT * 4));
        assert_eq!(layout.offset_of("xer"), Some(XER_SLOT * 4));
        assert_eq!(layout.offset_of("fpscr"), Some(FPSCR_SLOT * 4));
        assert_eq!(layout.catalog()[32].role, RegisterRole::InstructionPointer);
    }

    #[test]
    fn pc_sits_at_the_instruction_pointer_index() {
        let p = Cisco2600::new();
        let values = p.parse_registers(&dump_with(&[(32, 0x8000_1234)])).unwrap();
        assert_eq!(
            p.register_layout().index_of("pc"),
            Some(p.instruction_pointer_index())
        );
        let pc = &values[p.instruction_pointer_index()];
        assert_eq!(pc.name, "pc");
        assert!(pc.is_pc);
        assert_eq!(pc.value, "80001234");
    }

    #[test]
    fn output_interleaves_fields_after_parents() {
        let p = Cisco2600::new();
        let values = p.parse_registers(&dump_with(&[])).unwrap();
        assert_eq!(values.len(), p.register_layout().len());

        let names: Vec<&str> = values.iter().map(|v| v.name.as_str()).collect();
        let cr = names.iter().position(|n| *n == "cr").unwrap();
        assert_eq!(names[cr + 1], "cr0");
        assert_eq!(names[cr + 8], "cr7");
        assert_eq!(names[cr + 9], "cr0_LT");
        assert_eq!(names[cr + 40], "cr7_SO");
        assert_eq!(names[cr + 41], "lr");

        let xer = names.iter().position(|n| *n == "xer").unwrap();
        assert_eq!(
            &names[xer..xer + 5],
            &["xer", "xer_so", "xer_ov", "xer_ca", "xer_bytecount"]
        );
        assert_eq!(names[xer + 5], "fpscr");
        assert_eq!(names.last(), Some(&"fpscr_RN"));
    }

    #[test]
    fn xer_bit_zero_sets_only_so() {
        let p = Cisco2600::new();
        let values = p.parse_registers(&dump_with(&[(XER_SLOT, 0x0000_0001)])).unwrap();
        assert_eq!(value(&values, "xer_so"), "1");
        assert_eq!(value(&values, "xer_ov"), "0");
        assert_eq!(value(&values, "xer_ca"), "0");
        assert_eq!(value(&values, "xer_bytecount"), "0");
    }

    #[test]
    fn fpscr_bit_zero_sets_only_fx() {
        let p = Cisco2600::new();
        let values = p
            .parse_registers(&dump_with(&[(FPSCR_SLOT, 0x0000_0001)]))
            .unwrap();
        assert_eq!(value(&values, "fpscr_FX"), "1");
        for &(name, _, _) in &FPSCR_FIELDS[1..] {
            assert_eq!(value(&values, name), "0", "{}", name);
        }
    }

    #[test]
    fn wide_fields_use_their_full_width() {
        let p = Cisco2600::new();
        let values = p
            .parse_registers(&dump_with(&[
                (XER_SLOT, 0x3f00_0000),
                (FPSCR_SLOT, 0xc00f_8000),
            ]))
            .unwrap();
        assert_eq!(value(&values, "xer_bytecount"), "3f");
        assert_eq!(value(&values, "fpscr_FPRF"), "1f");
        assert_eq!(value(&values, "fpscr_RN"), "3");
        assert_eq!(value(&values, "fpscr_VXSOFT"), "0");
        assert_eq!(value(&values, "fpscr_FI"), "0");
    }

    #[test]
    fn cr_group_zero_nibble_eight_sets_so() {
        let p = Cisco2600::new();
        let values = p.parse_registers(&dump_with(&[(CR_SLOT, 0x0000_0008)])).unwrap();
        assert_eq!(value(&values, "cr0"), "8");
        assert_eq!(value(&values, "cr0_LT"), "0");
        assert_eq!(value(&values, "cr0_GT"), "0");
        assert_eq!(value(&values, "cr0_EQ"), "0");
        assert_eq!(value(&values, "cr0_SO"), "1");
        for group in 1..8 {
            assert_eq!(value(&values, &format!("cr{}", group)), "0");
            for flag in CR_FLAGS {
                assert_eq!(value(&values, &format!("cr{}_{}", group, flag)), "0");
            }
        }
    }

    #[test]
    fn cr_groups_and_flags_agree() {
        let p = Cisco2600::new();
        let values = p.parse_registers(&dump_with(&[(CR_SLOT, 0x8421_f0a5)])).unwrap();
        let groups = ["5", "a", "0", "f", "1", "2", "4", "8"];
        for (group, expected) in groups.iter().enumerate() {
            let nibble = u32::from_str_radix(expected, 16).unwrap();
            assert_eq!(value(&values, &format!("cr{}", group)), *expected);
            for (bit, flag) in CR_FLAGS.iter().enumerate() {
                let want = if nibble >> bit & 1 == 1 { "1" } else { "0" };
                assert_eq!(value(&values, &format!("cr{}_{}", group, flag)), want);
            }
        }
    }

    #[test]
    fn compressed_reply_decodes_end_to_end() {
        let p = Cisco2600::new();
        // Two runs expand to the 312 zero digits of 39 registers.
        let reply = "0*ff0*37";
        assert_eq!(p.decode_run_length(reply).unwrap().len(), 39 * 8);
        let values = p.decode_register_reply(reply).unwrap();
        assert_eq!(values.len(), p.register_layout().len());
        assert!(values.iter().all(|v| v.as_u64() == Some(0)));
    }

    #[test]
    fn breakpoint_is_the_greeting() {
        let p = Cisco2600::new();
        assert_eq!(p.greet_message(), "||||");
        assert!(p.is_breakpoint_message("||||"));
        assert!(!p.is_breakpoint_message("|||"));
    }

    #[test]
    fn options_match_the_router() {
        let opts = Cisco2600::new().debugger_options();
        assert!(!opts.can_terminate);
        assert!(!opts.can_multithread);
        assert!(!opts.can_memmap);
        assert!(!opts.can_valid_memory);
        assert!(!opts.has_stack);
        assert_eq!(opts.page_size, 4096);
        assert_eq!(Cisco2600::new().address_size(), 32);
    }
}
