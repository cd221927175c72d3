// Copyright 2025 ADLDATA Contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.
//
// See http://creativecommons.org/licenses/MIT/ for more information.

//! Deduplicated bank database
//!
//! Every table is append-only: operators, instruments and program tables are
//! canonicalized on insertion and referenced by dense integer identities.

use std::fmt;

pub mod bank;
pub mod instrument;
pub mod program;
pub mod store;

pub use bank::{BankEntry, BankSetup};
pub use instrument::{Instrument, InstrumentEntry, InstrumentStore};
pub use program::{MidiBank, PROGRAM_COUNT};

use crate::opl::silence::{self, SilenceReport};
use crate::opl::{FbConn, InstBuffer, InstrumentParams, Operator};
use store::Interner;

macro_rules! table_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

table_id!(
    /// Index into the operator table
    OperatorId
);
table_id!(
    /// Index into the instrument table
    InstrumentId
);
table_id!(
    /// Index into the program table list
    ProgramTableId
);
table_id!(
    /// Index into the bank list
    BankIndex
);

/// The whole database for one generator run
#[derive(Debug, Clone, Default)]
pub struct BanksDump {
    banks: Vec<BankEntry>,
    midi_banks: Interner<MidiBank>,
    instruments: InstrumentStore,
    operators: Interner<Operator>,
}

impl BanksDump {
    /// Creates an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the bank `bank_id`, or updates its title and setup if it already exists.
    pub fn init_bank(&mut self, bank_id: usize, title: &str, setup: BankSetup) -> BankIndex {
        if let Some(idx) = self.banks.iter().position(|b| b.bank_id == bank_id) {
            let bank = &mut self.banks[idx];
            bank.title = title.to_string();
            bank.setup = setup;
            return BankIndex(idx);
        }

        self.banks.push(BankEntry::new(bank_id, title, setup));
        BankIndex(self.banks.len() - 1)
    }

    /// Canonicalizes an operator record
    pub fn add_operator(&mut self, op: Operator) -> OperatorId {
        OperatorId(self.operators.intern(op).0)
    }

    /// Canonicalizes one instrument and places it into `bank` at `patch`.
    ///
    /// `ops` holds the operators in store order; 2 are consumed for two-op
    /// instruments, 4 otherwise. Blank instruments store nothing and leave the
    /// slot empty. The label recorded for the instrument is `<meta>_<patch>`.
    pub fn add_instrument(
        &mut self,
        bank: &mut MidiBank,
        patch: usize,
        params: InstrumentParams,
        ops: &[Operator],
        meta: &str,
    ) -> Option<InstrumentId> {
        assert!(patch < PROGRAM_COUNT, "patch number out of range: {}", patch);

        if params.flags.is_blank() {
            bank.instruments[patch] = None;
            return None;
        }

        let count = params.mode().operator_count();
        assert!(
            ops.len() >= count,
            "{}_{}: instrument needs {} operators, got {}",
            meta,
            patch,
            count,
            ops.len()
        );

        let op_ids = ops[..count]
            .iter()
            .map(|op| self.add_operator(*op))
            .collect();

        let instrument = Instrument {
            params,
            ops: op_ids,
        };
        let id = self
            .instruments
            .insert(instrument, format!("{}_{}", meta, patch));
        bank.instruments[patch] = Some(id);
        Some(id)
    }

    /// Adds a raw two-operator buffer, e.g. [`InstBuffer::NO_SOUND`], with neutral settings
    pub fn add_inst_buffer(
        &mut self,
        bank: &mut MidiBank,
        patch: usize,
        buffer: &InstBuffer,
        meta: &str,
    ) -> Option<InstrumentId> {
        let params = InstrumentParams {
            fb_conn: FbConn::new(buffer.fb_conn, 0),
            ..InstrumentParams::default()
        };
        self.add_instrument(bank, patch, params, &buffer.operators(), meta)
    }

    /// Canonicalizes a filled program table and attaches it to `bank`.
    pub fn add_midi_bank(
        &mut self,
        bank: BankIndex,
        percussion: bool,
        midi_bank: MidiBank,
    ) -> ProgramTableId {
        assert!(bank.0 < self.banks.len(), "unknown bank index: {}", bank);

        let (idx, inserted) = self.midi_banks.intern(midi_bank);
        let id = ProgramTableId(idx);
        log::debug!(
            "bank {}: {} program table {} ({})",
            bank,
            if percussion { "percussion" } else { "melodic" },
            id,
            if inserted { "new" } else { "shared" }
        );

        let entry = &mut self.banks[bank.0];
        if percussion {
            entry.percussion.push(id);
        } else {
            entry.melodic.push(id);
        }
        id
    }

    /// All banks in creation order
    pub fn banks(&self) -> &[BankEntry] {
        &self.banks
    }

    /// All program tables in identity order
    pub fn midi_banks(&self) -> &[MidiBank] {
        self.midi_banks.as_slice()
    }

    /// The instrument table
    pub fn instruments(&self) -> &InstrumentStore {
        &self.instruments
    }

    /// All operators in identity order
    pub fn operators(&self) -> &[Operator] {
        self.operators.as_slice()
    }

    /// Operator records of a stored instrument
    pub fn instrument_operators(&self, instrument: &Instrument) -> Vec<Operator> {
        instrument
            .ops
            .iter()
            .map(|id| {
                *self
                    .operators
                    .get(id.0)
                    .unwrap_or_else(|| panic!("dangling operator reference: {}", id))
            })
            .collect()
    }

    /// Runs the silence heuristic on a stored instrument
    pub fn instrument_silence(&self, id: InstrumentId) -> SilenceReport {
        let entry = self
            .instruments
            .get(id)
            .unwrap_or_else(|| panic!("dangling instrument reference: {}", id));
        let params = entry.instrument.params;
        let ops = self.instrument_operators(entry.instrument);
        silence::classify(&ops, params.fb_conn, params.mode())
    }

    /// Whether a stored instrument is inaudible
    pub fn is_instrument_silent(&self, id: InstrumentId) -> bool {
        self.instrument_silence(id).silent
    }

    /// Every stored instrument the heuristic considers inaudible
    pub fn silent_instruments(&self) -> Vec<(InstrumentEntry<'_>, SilenceReport)> {
        self.instruments
            .iter()
            .filter_map(|entry| {
                let report = self.instrument_silence(entry.id);
                report.silent.then_some((entry, report))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opl::{InstrumentFlags, OperatorRegisters};

    fn op(level: u8) -> Operator {
        OperatorRegisters {
            am_vib: 0x01,
            attack_decay: 0xF4,
            sustain_release: 0x24,
            waveform: 0,
            ksl_level: level,
        }
        .pack()
    }

    #[test]
    fn test_operator_dedup() {
        let mut dump = BanksDump::new();
        assert_eq!(dump.add_operator(op(1)), OperatorId(0));
        assert_eq!(dump.add_operator(op(2)), OperatorId(1));
        assert_eq!(dump.add_operator(op(1)), OperatorId(0));
        assert_eq!(dump.operators().len(), 2);
    }

    #[test]
    fn test_instrument_dedup_accumulates_labels() {
        let mut dump = BanksDump::new();
        let mut bank = MidiBank::new(0, 0);
        let params = InstrumentParams::default();

        let a = dump.add_instrument(&mut bank, 3, params, &[op(1), op(2)], "gm");
        let b = dump.add_instrument(&mut bank, 7, params, &[op(1), op(2)], "fat");
        assert_eq!(a, Some(InstrumentId(0)));
        assert_eq!(a, b);
        assert_eq!(dump.instruments().len(), 1);

        let entry = dump.instruments().get(InstrumentId(0)).unwrap();
        assert_eq!(entry.labels, &["gm_3".to_string(), "fat_7".to_string()]);
        assert_eq!(entry.instrument.ops, vec![OperatorId(0), OperatorId(1)]);
        assert_eq!(bank.instruments[3], a);
        assert_eq!(bank.instruments[7], a);
    }

    #[test]
    fn test_four_op_uses_four_slots() {
        let mut dump = BanksDump::new();
        let mut bank = MidiBank::new(0, 0);
        let params = InstrumentParams {
            flags: InstrumentFlags(InstrumentFlags::FOUR_OP),
            ..InstrumentParams::default()
        };
        let id = dump
            .add_instrument(&mut bank, 0, params, &[op(1), op(2), op(1), op(3)], "x")
            .unwrap();
        let entry = dump.instruments().get(id).unwrap();
        assert_eq!(
            entry.instrument.ops,
            vec![OperatorId(0), OperatorId(1), OperatorId(0), OperatorId(2)]
        );
    }

    #[test]
    fn test_blank_instrument_stores_nothing() {
        let mut dump = BanksDump::new();
        let mut bank = MidiBank::new(0, 0);
        let real = dump.add_instrument(&mut bank, 5, InstrumentParams::default(), &[op(1), op(2)], "m");
        assert!(real.is_some());

        let blank = InstrumentParams {
            flags: InstrumentFlags(InstrumentFlags::IS_BLANK),
            ..InstrumentParams::default()
        };
        assert_eq!(dump.add_instrument(&mut bank, 5, blank, &[op(7), op(8)], "m"), None);
        assert_eq!(bank.instruments[5], None);
        assert_eq!(dump.operators().len(), 2);
        assert_eq!(dump.instruments().len(), 1);
    }

    #[test]
    #[should_panic(expected = "patch number out of range")]
    fn test_patch_out_of_range() {
        let mut dump = BanksDump::new();
        let mut bank = MidiBank::new(0, 0);
        dump.add_instrument(&mut bank, 128, InstrumentParams::default(), &[op(1), op(2)], "m");
    }

    #[test]
    fn test_init_bank_is_idempotent() {
        let mut dump = BanksDump::new();
        let first = dump.init_bank(14, "Old", BankSetup::default());
        let other = dump.init_bank(2, "Other", BankSetup::default());
        let again = dump.init_bank(14, "New", BankSetup::from(0x0100));
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(dump.banks().len(), 2);
        assert_eq!(dump.banks()[0].title, "New");
        assert!(dump.banks()[0].setup.deep_tremolo);
    }

    #[test]
    fn test_program_tables_shared_between_banks() {
        let mut dump = BanksDump::new();
        let a = dump.init_bank(0, "A", BankSetup::default());
        let b = dump.init_bank(1, "B", BankSetup::default());

        let mut table = MidiBank::new(0, 0);
        dump.add_instrument(&mut table, 0, InstrumentParams::default(), &[op(1), op(2)], "a");

        assert_eq!(dump.add_midi_bank(a, false, table.clone()), ProgramTableId(0));
        assert_eq!(dump.add_midi_bank(a, false, table.clone()), ProgramTableId(0));
        assert_eq!(dump.add_midi_bank(b, true, table), ProgramTableId(0));
        assert_eq!(dump.add_midi_bank(b, true, MidiBank::new(0, 1)), ProgramTableId(1));

        assert_eq!(dump.midi_banks().len(), 2);
        assert_eq!(dump.banks()[0].melodic, vec![ProgramTableId(0), ProgramTableId(0)]);
        assert_eq!(
            dump.banks()[1].percussion,
            vec![ProgramTableId(0), ProgramTableId(1)]
        );
    }

    #[test]
    fn test_no_sound_is_silent() {
        let mut dump = BanksDump::new();
        let mut bank = MidiBank::new(0, 0);
        let id = dump
            .add_inst_buffer(&mut bank, 0, &InstBuffer::NO_SOUND, "nosound")
            .unwrap();
        assert!(dump.is_instrument_silent(id));

        let loud = dump
            .add_instrument(&mut bank, 1, InstrumentParams::default(), &[op(1), op(2)], "m")
            .unwrap();
        assert!(!dump.is_instrument_silent(loud));

        let silent = dump.silent_instruments();
        assert_eq!(silent.len(), 1);
        assert_eq!(silent[0].0.id, id);
        assert_eq!(silent[0].0.labels, &["nosound_0".to_string()]);
    }
}
