use adldata::{
    export_banks, tables_to_string, BankSetup, BanksDump, FbConn, InstrumentFlags, InstrumentId,
    InstrumentParams, MidiBank,
};
use pretty_assertions::assert_eq;

mod common;
use common::op;

fn small_dump() -> BanksDump {
    let a = op(0x01, 0xF4, 0x24, 0x00);
    let b = op(0x21, 0xF2, 0x53, 0x10);
    let c = op(0x00, 0x11, 0x11, 0x3F);

    let mut dump = BanksDump::new();
    let setup = BankSetup {
        volume_model: 1,
        deep_tremolo: true,
        ..BankSetup::default()
    };
    let bank = dump.init_bank(0, "Test \"A\"", setup);

    let mut table = MidiBank::new(0, 0);
    let two_op = InstrumentParams::default();
    dump.add_instrument(&mut table, 0, two_op, &[a, b], "t");
    dump.add_instrument(&mut table, 1, two_op, &[a, b], "t");
    let blank = InstrumentParams {
        flags: InstrumentFlags(InstrumentFlags::IS_BLANK),
        ..InstrumentParams::default()
    };
    dump.add_instrument(&mut table, 2, blank, &[c, c], "t");
    let four_op = InstrumentParams {
        flags: InstrumentFlags(InstrumentFlags::FOUR_OP),
        fb_conn: FbConn::new(0x01, 0x00),
        delay_on_ms: 0x10,
        note_offset1: -12,
        ..InstrumentParams::default()
    };
    dump.add_instrument(&mut table, 3, four_op, &[a, b, c, b], "t");

    dump.add_midi_bank(bank, false, table);
    dump.add_midi_bank(bank, true, MidiBank::new(0, 1));
    dump
}

fn slots(values: &[&str]) -> String {
    let mut all: Vec<&str> = values.to_vec();
    all.resize(128, "-1");
    all.join(",")
}

#[test]
fn test_export_layout() {
    let expected = format!(
        "/**********************************************************\n\
         \x20   This file is generated by `gen_adldata` automatically\n\
         \x20                 Don't edit it directly!\n\
         \x20       To modify content of this file, modify banks\n\
         \x20         and re-run the `gen_adldata` build step.\n\
         ***********************************************************/\n\
         \n\
         #include \"adldata-db.h\"\n\
         \n\
         \n\
         const size_t g_embeddedBanksCount = 1;\n\
         \n\
         const BanksDump::BankEntry g_embeddedBanks[] =\n\
         {{\n\
         \t{{0x0101, 1, 1, \"Test \\\"A\\\"\", 0, 1}},\n\
         }};\n\
         \n\
         const char* const g_embeddedBankNames[] =\n\
         {{\n\
         \tg_embeddedBanks[0].title,\n\
         \tNULL\n\
         }};\n\
         \n\
         const size_t g_embeddedBanksMidiIndex[] =\n\
         {{0,1}};\n\
         \n\
         const BanksDump::MidiBank g_embeddedBanksMidi[] =\n\
         {{\n\
         \t{{0,0,{{{}}}}},\n\
         \t{{0,1,{{{}}}}},\n\
         }};\n\
         \n\
         const BanksDump::InstrumentEntry g_embeddedBanksInstruments[] =\n\
         {{\n\
         \t{{0,0,0,0,0,0,0,0,0,{{0,1}}}},\n\
         \t{{-12,0,0,0,0x1,0,0x1,0x10,0,{{0,1,2,1}}}},\n\
         }};\n\
         \n\
         const BanksDump::Operator g_embeddedBanksOperators[] =\n\
         {{\n\
         \t{{0x024F401,00}},{{0x053F221,0x10}},{{0x0111100,0x3F}},\n\
         }};\n\
         \n",
        slots(&["0", "0", "-1", "1"]),
        slots(&[]),
    );

    assert_eq!(tables_to_string(&small_dump(), "adldata-db.h"), expected);
}

#[test]
fn test_export_is_deterministic() {
    let first = tables_to_string(&small_dump(), "x.h");
    let second = tables_to_string(&small_dump(), "x.h");
    assert_eq!(first, second);
}

#[test]
fn test_empty_dump() {
    let text = tables_to_string(&BanksDump::new(), "x.h");
    assert!(text.contains("const size_t g_embeddedBanksCount = 0;"));
    assert!(text.contains("g_embeddedBankNames[] =\n{\n\tNULL\n};"));
}

#[test]
fn test_operator_lines_wrap() {
    let mut dump = BanksDump::new();
    for level in 0..30 {
        dump.add_operator(op(0x01, 0xF4, 0x24, level));
    }
    let text = tables_to_string(&dump, "x.h");
    let table = text
        .split("g_embeddedBanksOperators[] =\n{\n")
        .nth(1)
        .unwrap();
    let lines: Vec<&str> = table.lines().take_while(|l| *l != "};").collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].matches("},").count(), 25);
    assert_eq!(lines[1].matches("},").count(), 5);
    assert!(lines[0].starts_with("\t{0x024F401,00},{0x024F401,0x01},"));
}

#[test]
fn test_bank_names_wrap() {
    let mut dump = BanksDump::new();
    for id in 0..26 {
        dump.init_bank(id, "b", BankSetup::default());
    }
    let text = tables_to_string(&dump, "x.h");
    assert!(text.contains("g_embeddedBanks[24].title,\n\tg_embeddedBanks[25].title,\n\tNULL"));
    assert!(text.contains("g_embeddedBanks[0].title, g_embeddedBanks[1].title"));
}

#[test]
#[should_panic(expected = "dangling instrument reference")]
fn test_dangling_instrument_panics() {
    let mut dump = BanksDump::new();
    let bank = dump.init_bank(0, "x", BankSetup::default());
    let mut table = MidiBank::new(0, 0);
    table.instruments[0] = Some(InstrumentId(99));
    dump.add_midi_bank(bank, false, table);
    tables_to_string(&dump, "x.h");
}

#[test]
fn test_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adldata-db.cpp");
    let dump = small_dump();

    export_banks(&dump, &path, "adldata-db.h").unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, tables_to_string(&dump, "adldata-db.h"));
}

#[test]
fn test_export_to_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.cpp");

    let err = export_banks(&small_dump(), &path, "x.h").unwrap_err();
    assert!(format!("{:#}", err).contains("unable to open"));
}
