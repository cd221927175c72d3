//! Serializes a [`BanksDump`] into C source holding the embedded bank tables.
//!
//! Table order: banks, bank title pointers, the flattened bank → program table
//! index, program tables, instruments, operators. The output only depends on
//! the contents of the database, so identical ingestion yields identical bytes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::banks::{BanksDump, ProgramTableId};

/// Name of the build step mentioned in the generated banner
pub const GENERATOR_NAME: &str = "gen_adldata";

/// Entries per line in the wrapped arrays
const ENTRIES_PER_LINE: usize = 25;

/// Writes all tables of `dump` as C source to `out`.
///
/// Panics if a stored reference points outside its table; ingestion never
/// produces such a database.
pub fn write_tables<W: Write>(dump: &BanksDump, header: &str, out: &mut W) -> io::Result<()> {
    write_banner(header, out)?;
    let midi_index = write_banks(dump, out)?;
    write_bank_names(dump, out)?;
    write_midi_index(dump, &midi_index, out)?;
    write_midi_banks(dump, out)?;
    write_instruments(dump, out)?;
    write_operators(dump, out)?;
    Ok(())
}

/// Renders the tables into a string
pub fn tables_to_string(dump: &BanksDump, header: &str) -> String {
    let mut buf = Vec::new();
    write_tables(dump, header, &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("generated tables are valid UTF-8")
}

/// Writes the tables into the file at `path`, replacing it.
pub fn export_banks(dump: &BanksDump, path: &Path, header: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("unable to open '{}' for writing", path.display()))?;
    let mut out = BufWriter::new(file);
    write_tables(dump, header, &mut out)
        .and_then(|_| out.flush())
        .with_context(|| format!("failed to write bank tables to '{}'", path.display()))?;

    log::info!(
        "wrote {} banks, {} program tables, {} instruments, {} operators to {}",
        dump.banks().len(),
        dump.midi_banks().len(),
        dump.instruments().len(),
        dump.operators().len(),
        path.display()
    );
    Ok(())
}

fn write_banner<W: Write>(header: &str, out: &mut W) -> io::Result<()> {
    writeln!(out, "/**********************************************************")?;
    writeln!(out, "    This file is generated by `{}` automatically", GENERATOR_NAME)?;
    writeln!(out, "                  Don't edit it directly!")?;
    writeln!(out, "        To modify content of this file, modify banks")?;
    writeln!(out, "          and re-run the `{}` build step.", GENERATOR_NAME)?;
    writeln!(out, "***********************************************************/\n")?;
    writeln!(out, "#include \"{}\"\n\n", header)
}

/// Writes the bank records and returns the flattened program table index they point into.
fn write_banks<W: Write>(dump: &BanksDump, out: &mut W) -> io::Result<Vec<ProgramTableId>> {
    writeln!(out, "const size_t g_embeddedBanksCount = {};\n", dump.banks().len())?;
    writeln!(out, "const BanksDump::BankEntry g_embeddedBanks[] =\n{{")?;

    let mut midi_index = Vec::new();
    for bank in dump.banks() {
        let melodic_offset = midi_index.len();
        midi_index.extend_from_slice(&bank.melodic);
        let percussion_offset = midi_index.len();
        midi_index.extend_from_slice(&bank.percussion);

        writeln!(
            out,
            "\t{{0x{:04X}, {}, {}, \"{}\", {}, {}}},",
            bank.setup.pack(),
            bank.melodic.len(),
            bank.percussion.len(),
            c_escape(&bank.title),
            melodic_offset,
            percussion_offset
        )?;
    }

    writeln!(out, "}};\n")?;
    Ok(midi_index)
}

fn write_bank_names<W: Write>(dump: &BanksDump, out: &mut W) -> io::Result<()> {
    write!(out, "const char* const g_embeddedBankNames[] =\n{{\n\t")?;
    for idx in 0..dump.banks().len() {
        if idx > 0 {
            if idx % ENTRIES_PER_LINE == 0 {
                write!(out, ",\n\t")?;
            } else {
                write!(out, ", ")?;
            }
        }
        write!(out, "g_embeddedBanks[{}].title", idx)?;
    }
    if !dump.banks().is_empty() {
        write!(out, ",\n\t")?;
    }
    // null entry terminates the list
    write!(out, "NULL\n}};\n\n")
}

fn write_midi_index<W: Write>(
    dump: &BanksDump,
    midi_index: &[ProgramTableId],
    out: &mut W,
) -> io::Result<()> {
    let count = dump.midi_banks().len();
    let list = midi_index
        .iter()
        .map(|id| {
            assert!(id.0 < count, "dangling program table reference: {}", id);
            id.to_string()
        })
        .collect::<Vec<_>>()
        .join(",");
    write!(out, "const size_t g_embeddedBanksMidiIndex[] =\n{{{}}};\n\n", list)
}

fn write_midi_banks<W: Write>(dump: &BanksDump, out: &mut W) -> io::Result<()> {
    let count = dump.instruments().len();
    writeln!(out, "const BanksDump::MidiBank g_embeddedBanksMidi[] =\n{{")?;
    for midi_bank in dump.midi_banks() {
        let slots = midi_bank
            .instruments
            .iter()
            .map(|slot| match slot {
                Some(id) => {
                    assert!(id.0 < count, "dangling instrument reference: {}", id);
                    id.to_string()
                }
                None => "-1".to_string(),
            })
            .collect::<Vec<_>>()
            .join(",");
        writeln!(out, "\t{{{},{},{{{}}}}},", midi_bank.msb, midi_bank.lsb, slots)?;
    }
    writeln!(out, "}};\n")
}

fn write_instruments<W: Write>(dump: &BanksDump, out: &mut W) -> io::Result<()> {
    let count = dump.operators().len();
    writeln!(
        out,
        "const BanksDump::InstrumentEntry g_embeddedBanksInstruments[] =\n{{"
    )?;
    for entry in dump.instruments().iter() {
        let ins = entry.instrument;
        let p = &ins.params;

        let expected = p.mode().operator_count();
        assert_eq!(
            ins.ops.len(),
            expected,
            "instrument {} has {} operators, {:?} needs {}",
            entry.id,
            ins.ops.len(),
            p.mode(),
            expected
        );
        let ops = ins
            .ops
            .iter()
            .map(|id| {
                assert!(id.0 < count, "dangling operator reference: {}", id);
                id.to_string()
            })
            .collect::<Vec<_>>()
            .join(",");

        writeln!(
            out,
            "\t{{{},{},{},{},{},{},{},{},{},{{{}}}}},",
            p.note_offset1,
            p.note_offset2,
            p.midi_velocity_offset,
            p.percussion_key_number,
            hex_or_zero(u32::from(p.flags.0)),
            p.second_voice_detune,
            hex_or_zero(u32::from(p.fb_conn.0)),
            hex_or_zero(u32::from(p.delay_on_ms)),
            hex_or_zero(u32::from(p.delay_off_ms)),
            ops
        )?;
    }
    writeln!(out, "}};\n")
}

fn write_operators<W: Write>(dump: &BanksDump, out: &mut W) -> io::Result<()> {
    writeln!(out, "const BanksDump::Operator g_embeddedBanksOperators[] =\n{{")?;
    for (idx, op) in dump.operators().iter().enumerate() {
        if idx % ENTRIES_PER_LINE == 0 {
            if idx > 0 {
                writeln!(out)?;
            }
            write!(out, "\t")?;
        }
        let level = if op.level == 0 {
            "00".to_string()
        } else {
            format!("0x{:02X}", op.level)
        };
        write!(out, "{{0x{:07X},{}}},", op.envelope, level)?;
    }
    write!(out, "\n}};\n\n")
}

/// Upper-case hex with `0x` prefix, or a bare `0`
fn hex_or_zero(value: u32) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("0x{:X}", value)
    }
}

/// Escapes a title for a C string literal
fn c_escape(input: &str) -> String {
    let mut ret = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '"' => ret.push_str("\\\""),
            '\\' => ret.push_str("\\\\"),
            c if c.is_ascii_graphic() || c == ' ' => ret.push(c),
            c => {
                let mut utf8 = [0u8; 4];
                for byte in c.encode_utf8(&mut utf8).bytes() {
                    // octal escapes never swallow the following character
                    ret.push_str(&format!("\\{:03o}", byte));
                }
            }
        }
    }
    ret
}
