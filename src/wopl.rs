//! Loader for WOPL (`WOPL3-BANK`) instrument bank files

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::banks::{BankSetup, BanksDump, MidiBank, PROGRAM_COUNT};
use crate::ingest::{BankDefinition, BankSource};
use crate::opl::{FbConn, InstrumentFlags, InstrumentParams, Operator, OperatorRegisters};

/// WOPL constants
const WOPL_MAGIC: &[u8; 11] = b"WOPL3-BANK\0";
const WOPL_LATEST_VERSION: u16 = 3;
const HEADER_SIZE: usize = 19;
const BANK_META_SIZE: usize = 34;
const NAME_SIZE: usize = 32;

/// Instrument record size before delays were added (versions 1 and 2)
pub const WOPL_INST_SIZE_V2: usize = 62;

/// Instrument record size with on/off delays (version 3)
pub const WOPL_INST_SIZE_V3: usize = 66;

// operator order inside a file record
const CARRIER1: usize = 0;
const MODULATOR1: usize = 1;
const CARRIER2: usize = 2;
const MODULATOR2: usize = 3;

/// Maps store slots (mod1, car1, mod2, car2) to file slots
const STORE_ORDER: [usize; 4] = [MODULATOR1, CARRIER1, MODULATOR2, CARRIER2];

/// Global OPL flags
const FLAG_DEEP_TREMOLO: u8 = 0x01;
const FLAG_DEEP_VIBRATO: u8 = 0x02;

/// Parsed WOPL bank file
#[derive(Debug, Clone)]
pub struct WoplFile {
    /// Format version (1-3)
    pub version: u16,
    /// Deep tremolo / deep vibrato flags
    pub opl_flags: u8,
    /// Volume scaling model
    pub volume_model: u8,
    /// Melodic program tables
    pub melodic: Vec<WoplBank>,
    /// Percussion program tables
    pub percussion: Vec<WoplBank>,
}

/// One 128-instrument bank inside a WOPL file
#[derive(Debug, Clone)]
pub struct WoplBank {
    /// Bank name (empty before version 2)
    pub name: String,
    /// Bank select LSB
    pub lsb: u8,
    /// Bank select MSB
    pub msb: u8,
    /// The 128 instruments
    pub instruments: Vec<WoplInstrument>,
}

/// One instrument record
#[derive(Debug, Clone)]
pub struct WoplInstrument {
    /// Instrument name
    pub name: String,
    /// Scalar parameters
    pub params: InstrumentParams,
    /// Operators in store order: modulator 1, carrier 1, modulator 2, carrier 2
    pub operators: [Operator; 4],
}

impl WoplInstrument {
    /// Parse one instrument record
    pub fn from_data(data: &[u8], version: u16) -> Result<Self> {
        let size = inst_size(version);
        if data.len() < size {
            return Err(anyhow!("Instrument data too short: {} bytes", data.len()));
        }

        let name = read_name(&data[..NAME_SIZE]);

        let mut file_ops = [Operator::default(); 4];
        for (slot, op) in file_ops.iter_mut().enumerate() {
            let base = 42 + slot * 5;
            *op = OperatorRegisters {
                am_vib: data[base],
                ksl_level: data[base + 1],
                attack_decay: data[base + 2],
                sustain_release: data[base + 3],
                waveform: data[base + 4],
            }
            .pack();
        }

        let (delay_on_ms, delay_off_ms) = if version >= 3 {
            (be_u16(data, 62), be_u16(data, 64))
        } else {
            (0, 0)
        };

        let params = InstrumentParams {
            note_offset1: be_u16(data, 32) as i16,
            note_offset2: be_u16(data, 34) as i16,
            midi_velocity_offset: data[36] as i8,
            second_voice_detune: data[37] as i8,
            percussion_key_number: data[38],
            flags: InstrumentFlags(data[39]),
            fb_conn: FbConn::new(data[40], data[41]),
            delay_on_ms,
            delay_off_ms,
        };

        Ok(Self {
            name,
            params,
            operators: STORE_ORDER.map(|slot| file_ops[slot]),
        })
    }
}

impl WoplFile {
    /// Bank setup stored in the file header
    pub fn setup(&self) -> BankSetup {
        BankSetup {
            volume_model: self.volume_model,
            deep_tremolo: self.opl_flags & FLAG_DEEP_TREMOLO != 0,
            deep_vibrato: self.opl_flags & FLAG_DEEP_VIBRATO != 0,
            scale_modulators: false,
        }
    }

    /// Registers every program table of this file under `bank`.
    ///
    /// Instrument labels are `<prefix>_M<n>_<patch>` and `<prefix>_P<n>_<patch>`.
    pub fn register(&self, dump: &mut BanksDump, def: &BankDefinition) {
        let bank = dump.init_bank(def.id, &def.title, def.setup.apply(self.setup()));

        for (percussion, banks) in [(false, &self.melodic), (true, &self.percussion)] {
            for (idx, wopl_bank) in banks.iter().enumerate() {
                let meta = format!(
                    "{}_{}{}",
                    def.prefix,
                    if percussion { 'P' } else { 'M' },
                    idx
                );
                let mut midi_bank = MidiBank::new(wopl_bank.msb, wopl_bank.lsb);
                for (patch, ins) in wopl_bank.instruments.iter().enumerate() {
                    dump.add_instrument(&mut midi_bank, patch, ins.params, &ins.operators, &meta);
                }
                dump.add_midi_bank(bank, percussion, midi_bank);
            }
        }
    }
}

/// Reads WOPL banks from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct WoplSource;

impl BankSource for WoplSource {
    fn load_into(&self, dump: &mut BanksDump, def: &BankDefinition) -> Result<()> {
        let wopl = parse_wopl_file(&def.file)?;
        log::info!(
            "{}: WOPL v{}, {} melodic and {} percussion banks",
            def.file.display(),
            wopl.version,
            wopl.melodic.len(),
            wopl.percussion.len()
        );
        wopl.register(dump, def);
        Ok(())
    }
}

/// Parse a WOPL file from disk
pub fn parse_wopl_file(path: &Path) -> Result<WoplFile> {
    let data =
        fs::read(path).with_context(|| format!("Failed to read WOPL file '{}'", path.display()))?;

    parse_wopl_data(&data).with_context(|| format!("Invalid WOPL file '{}'", path.display()))
}

/// Parse WOPL data
pub fn parse_wopl_data(data: &[u8]) -> Result<WoplFile> {
    if data.len() < HEADER_SIZE {
        bail!("WOPL data too short: {} bytes", data.len());
    }
    if &data[..WOPL_MAGIC.len()] != WOPL_MAGIC {
        bail!("Not a WOPL bank file");
    }

    let version = u16::from_le_bytes([data[11], data[12]]);
    if version == 0 || version > WOPL_LATEST_VERSION {
        bail!("Unsupported WOPL version: {}", version);
    }

    let melodic_count = be_u16(data, 13) as usize;
    let percussion_count = be_u16(data, 15) as usize;
    let opl_flags = data[17];
    let volume_model = data[18];
    let bank_count = melodic_count + percussion_count;

    let meta_size = if version >= 2 {
        bank_count * BANK_META_SIZE
    } else {
        0
    };
    let expected = HEADER_SIZE + meta_size + bank_count * PROGRAM_COUNT * inst_size(version);
    if data.len() < expected {
        bail!(
            "WOPL data truncated: expected {} bytes, got {}",
            expected,
            data.len()
        );
    }

    log::debug!(
        "WOPL: version {}, {} melodic, {} percussion",
        version,
        melodic_count,
        percussion_count
    );

    let mut banks = Vec::with_capacity(bank_count);
    for idx in 0..bank_count {
        let (name, lsb, msb) = if version >= 2 {
            let meta = &data[HEADER_SIZE + idx * BANK_META_SIZE..][..BANK_META_SIZE];
            (read_name(&meta[..NAME_SIZE]), meta[32], meta[33])
        } else {
            // no bank meta before version 2, the bank number doubles as bank select
            let number = if idx < melodic_count {
                idx
            } else {
                idx - melodic_count
            };
            (String::new(), (number & 0xFF) as u8, ((number >> 8) & 0x7F) as u8)
        };

        let bank_start = HEADER_SIZE + meta_size + idx * PROGRAM_COUNT * inst_size(version);
        let instruments = (0..PROGRAM_COUNT)
            .map(|patch| {
                let start = bank_start + patch * inst_size(version);
                WoplInstrument::from_data(&data[start..], version)
                    .with_context(|| format!("bank {}, instrument {}", idx, patch))
            })
            .collect::<Result<Vec<_>>>()?;

        banks.push(WoplBank {
            name,
            lsb,
            msb,
            instruments,
        });
    }

    let percussion = banks.split_off(melodic_count);

    Ok(WoplFile {
        version,
        opl_flags,
        volume_model,
        melodic: banks,
        percussion,
    })
}

fn inst_size(version: u16) -> usize {
    if version >= 3 {
        WOPL_INST_SIZE_V3
    } else {
        WOPL_INST_SIZE_V2
    }
}

fn be_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim().to_string()
}
