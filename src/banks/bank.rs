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

//! Named top-level banks

use super::ProgramTableId;

/// Global chip setup of a bank, exported as one 16-bit word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BankSetup {
    /// Volume scaling model (low byte)
    pub volume_model: u8,
    /// Deep tremolo (bit 8)
    pub deep_tremolo: bool,
    /// Deep vibrato (bit 9)
    pub deep_vibrato: bool,
    /// Scale modulators with volume (bit 10)
    pub scale_modulators: bool,
}

impl BankSetup {
    /// Packs the setup into its exported word
    pub fn pack(&self) -> u16 {
        u16::from(self.volume_model)
            | (u16::from(self.deep_tremolo) << 8)
            | (u16::from(self.deep_vibrato) << 9)
            | (u16::from(self.scale_modulators) << 10)
    }
}

impl From<u16> for BankSetup {
    fn from(word: u16) -> Self {
        Self {
            volume_model: (word & 0xFF) as u8,
            deep_tremolo: word & 0x0100 != 0,
            deep_vibrato: word & 0x0200 != 0,
            scale_modulators: word & 0x0400 != 0,
        }
    }
}

/// A named bank referencing its melodic and percussion program tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankEntry {
    /// Identifier assigned by the bank source
    pub bank_id: usize,
    /// Display title
    pub title: String,
    /// Chip setup
    pub setup: BankSetup,
    /// Melodic program tables, in attach order
    pub melodic: Vec<ProgramTableId>,
    /// Percussion program tables, in attach order
    pub percussion: Vec<ProgramTableId>,
}

impl BankEntry {
    pub(crate) fn new(bank_id: usize, title: &str, setup: BankSetup) -> Self {
        Self {
            bank_id,
            title: title.to_string(),
            setup,
            melodic: Vec::new(),
            percussion: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_word() {
        let setup = BankSetup {
            volume_model: 3,
            deep_tremolo: true,
            deep_vibrato: false,
            scale_modulators: true,
        };
        assert_eq!(setup.pack(), 0x0503);
        assert_eq!(BankSetup::from(0x0503), setup);
    }
}
