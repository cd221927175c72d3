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

//! MIDI program tables (128 patch slots tagged with a bank-select MSB/LSB)

use super::InstrumentId;

/// Number of patch slots in a program table
pub const PROGRAM_COUNT: usize = 128;

/// A 128-slot mapping from MIDI program number to stored instrument.
///
/// `None` marks an unset or blank slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MidiBank {
    /// Bank select MSB
    pub msb: u8,
    /// Bank select LSB
    pub lsb: u8,
    /// Instrument for each MIDI program
    pub instruments: [Option<InstrumentId>; PROGRAM_COUNT],
}

impl MidiBank {
    /// Creates an empty program table
    pub fn new(msb: u8, lsb: u8) -> Self {
        Self {
            msb,
            lsb,
            instruments: [None; PROGRAM_COUNT],
        }
    }

    /// Number of slots holding an instrument
    pub fn used_slots(&self) -> usize {
        self.instruments.iter().filter(|slot| slot.is_some()).count()
    }
}
