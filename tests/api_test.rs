use gdb_register_codec::helper_requests::RegisterInfo;
use gdb_register_codec::request_handler::{run_session, Session};
use gdb_register_codec::transport::{write_frame, FramedTransport, Transport};
use gdb_register_codec::{dump, rle, CodecError, DumpFault, EncodingFault, ProfileKind, RegisterValue};
use serde_json::{json, Value};
use std::io::Cursor;

/// One 8-digit word per wire register, register `i` holding `i`.
fn counting_dump(registers: u32) -> String {
    (0..registers).map(|i| format!("{:08x}", i)).collect()
}

fn find<'a>(values: &'a [RegisterValue], name: &str) -> &'a RegisterValue {
    values
        .iter()
        .find(|v| v.name == name)
        .unwrap_or_else(|| panic!("no register {}", name))
}

#[test]
fn test_run_length_edge_cases() {
    assert_eq!(rle::decode("0123abcd").unwrap(), "0123abcd");
    assert_eq!(rle::decode("a*03").unwrap(), "aaaa");

    for (input, expected) in [
        ("*03", EncodingFault::LeadingMarker),
        ("ab*3", EncodingFault::TruncatedCount),
        ("a*00", EncodingFault::ZeroCount),
    ] {
        match rle::decode(input) {
            Err(CodecError::MalformedEncoding { fault, .. }) => assert_eq!(fault, expected),
            other => panic!("{:?}: unexpected {:?}", input, other),
        }
    }
}

#[test]
fn test_counting_dump_lands_in_gpr_slots() {
    let profile = ProfileKind::Cisco2600.create().unwrap();
    // One register more than the layout needs; the tail is ignored.
    let values = profile.parse_registers(&counting_dump(40)).unwrap();

    assert_eq!(find(&values, "sp").as_u64(), Some(1));
    assert!(find(&values, "sp").is_sp);
    assert_eq!(find(&values, "r2").as_u64(), Some(2));
    assert_eq!(find(&values, "r31").as_u64(), Some(31));
    assert_eq!(find(&values, "pc").as_u64(), Some(32));
    assert!(find(&values, "pc").is_pc);
}

#[test]
fn test_parse_is_deterministic() {
    let profile = ProfileKind::Cisco2600.create().unwrap();
    let dump = counting_dump(39);
    let first = profile.parse_registers(&dump).unwrap();
    let second = profile.parse_registers(&dump).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_one_digit_short_is_rejected() {
    let profile = ProfileKind::Cisco2600.create().unwrap();
    let mut dump = counting_dump(39);
    dump.pop();
    match profile.parse_registers(&dump) {
        Err(CodecError::MalformedDump {
            register,
            fault: DumpFault::Truncated { needed, actual },
        }) => {
            assert_eq!(register, "fpscr");
            assert_eq!(needed, 39 * 8);
            assert_eq!(actual, 39 * 8 - 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_composite_fields() {
    let profile = ProfileKind::Cisco2600.create().unwrap();
    let mut words = vec![0u32; 39];
    words[34] = 0x0000_0008; // cr
    words[37] = 0x0000_0001; // xer
    words[38] = 0x0000_0001; // fpscr
    let dump: String = words.iter().map(|w| format!("{:08x}", w)).collect();
    let values = profile.parse_registers(&dump).unwrap();

    assert_eq!(find(&values, "cr0").value, "8");
    assert_eq!(find(&values, "cr0_SO").value, "1");
    assert_eq!(find(&values, "cr0_LT").value, "0");
    assert_eq!(find(&values, "xer_so").value, "1");
    assert_eq!(find(&values, "xer_ov").value, "0");
    assert_eq!(find(&values, "fpscr_FX").value, "1");
    assert_eq!(find(&values, "fpscr_FEX").value, "0");
    assert_eq!(find(&values, "fpscr_RN").value, "0");
}

#[test]
fn test_compressed_reply_end_to_end() {
    let profile = ProfileKind::Cisco2600.create().unwrap();
    // 312 zeros: one literal plus 0xff + 0x37 repeats.
    let reply = "0*ff0*37";
    assert_eq!(profile.decode_run_length(reply).unwrap().len(), 39 * 8);
    let values = profile.decode_register_reply(reply).unwrap();
    assert_eq!(values.len(), profile.register_layout().len());
    assert!(values.iter().all(|v| v.as_u64() == Some(0)));
}

#[test]
fn test_dump_parse_matches_profile() {
    let profile = ProfileKind::Cisco2600.create().unwrap();
    let dump = counting_dump(39);
    assert_eq!(
        dump::parse(&dump, profile.register_layout()).unwrap(),
        profile.parse_registers(&dump).unwrap()
    );
}

#[test]
fn test_catalog_serializes_fields() {
    let profile = ProfileKind::Cisco2600.create().unwrap();
    let catalog: Vec<RegisterInfo> = profile
        .register_layout()
        .catalog()
        .iter()
        .map(RegisterInfo::from)
        .collect();
    let json = serde_json::to_value(&catalog).unwrap();
    assert_eq!(json[0]["name"], "r0");
    assert!(json[0].get("parent").is_none());
    let cr0 = catalog.iter().position(|r| r.name == "cr0").unwrap();
    assert_eq!(json[cr0]["parent"], "cr");
    assert_eq!(json[cr0]["bits"], 4);
}

#[test]
fn test_session_over_framed_transport() {
    let mut input = Vec::new();
    for msg in [
        json!({"req": "initialize", "seq": 1, "profile": "cisco2600"}),
        json!({"req": "registers", "seq": 2, "reply": "0*ff0*37"}),
        json!({"req": "decode", "seq": 3, "payload": "*03"}),
    ] {
        write_frame(&mut input, &msg).unwrap();
    }

    let mut transport = FramedTransport::new(Cursor::new(input), Vec::new());
    let mut session = Session::new("api-test");
    run_session(&mut transport, &mut session).unwrap();

    let mut replies = FramedTransport::new(Cursor::new(transport.into_writer()), Vec::new());
    let mut read = || -> Value { replies.read_message().unwrap().unwrap() };

    let init = read();
    assert_eq!(init["req"], "initialize");
    assert_eq!(init["greet_message"], "||||");
    assert_eq!(read()["params"]["type"], "SessionReady");

    let regs = read();
    assert_eq!(regs["seq"], 2);
    assert_eq!(regs["pc"], "00000000");

    let err = read();
    assert_eq!(err["seq"], 3);
    assert_eq!(err["kind"], "MalformedEncoding");
}
