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

//! Instrument-level OPL parameters: flags, feedback/connection and timing

use std::fmt;

/// Instrument flag bits as stored in the bank tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InstrumentFlags(pub u8);

impl InstrumentFlags {
    /// True four-operator voice (one chained pair of channels)
    pub const FOUR_OP: u8 = 0x01;
    /// Two independent two-operator voices played in unison
    pub const PSEUDO_FOUR_OP: u8 = 0x02;
    /// Placeholder without any sound
    pub const IS_BLANK: u8 = 0x04;
    /// Rhythm-mode percussion type bits
    pub const RHYTHM_MODE_MASK: u8 = 0x38;

    /// Returns true when every bit of `mask` is set
    pub fn contains(self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    /// Is this a blank placeholder
    pub fn is_blank(self) -> bool {
        self.contains(Self::IS_BLANK)
    }

    /// Operator layout selected by the flags. Pseudo four-op wins over four-op.
    pub fn mode(self) -> OperatorMode {
        if self.contains(Self::PSEUDO_FOUR_OP) {
            OperatorMode::PseudoFourOp
        } else if self.contains(Self::FOUR_OP) {
            OperatorMode::FourOp
        } else {
            OperatorMode::TwoOp
        }
    }
}

/// How many operators an instrument uses and how they are chained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorMode {
    /// Single two-operator voice
    TwoOp,
    /// Single four-operator voice
    FourOp,
    /// Two two-operator voices
    PseudoFourOp,
}

impl OperatorMode {
    /// Number of operator slots used by this layout
    pub fn operator_count(self) -> usize {
        match self {
            OperatorMode::TwoOp => 2,
            OperatorMode::FourOp | OperatorMode::PseudoFourOp => 4,
        }
    }
}

/// Packed feedback/connection word: first pair in bits 0..4, second pair in bits 8..12.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FbConn(pub u16);

impl FbConn {
    /// Packs the 0xC0 register values of both operator pairs
    pub fn new(fb_conn1: u8, fb_conn2: u8) -> Self {
        Self(u16::from(fb_conn1 & 0x0F) | (u16::from(fb_conn2 & 0x0F) << 8))
    }

    /// 0xC0 value of the first pair
    pub fn first(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    /// 0xC0 value of the second pair
    pub fn second(self) -> u8 {
        ((self.0 >> 8) & 0x0F) as u8
    }

    /// Connection bit of the first pair (false = FM, true = additive)
    pub fn first_additive(self) -> bool {
        self.first() & 0x01 != 0
    }

    /// Connection bit of the second pair
    pub fn second_additive(self) -> bool {
        self.second() & 0x01 != 0
    }

    /// Feedback amount of the first pair (0-7)
    pub fn first_feedback(self) -> u8 {
        (self.first() >> 1) & 0x07
    }
}

impl fmt::UpperHex for FbConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// Scalar settings of one instrument, everything except its operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InstrumentParams {
    /// Note offset of the first voice (semitones)
    pub note_offset1: i16,
    /// Note offset of the second voice (semitones)
    pub note_offset2: i16,
    /// MIDI velocity offset
    pub midi_velocity_offset: i8,
    /// Key played for percussion instruments
    pub percussion_key_number: u8,
    /// Instrument flags
    pub flags: InstrumentFlags,
    /// Detune of the second voice in pseudo four-op mode
    pub second_voice_detune: i8,
    /// Feedback / connection
    pub fb_conn: FbConn,
    /// Key-on delay in milliseconds
    pub delay_on_ms: u16,
    /// Key-off delay in milliseconds
    pub delay_off_ms: u16,
}

impl InstrumentParams {
    /// Operator layout of this instrument
    pub fn mode(&self) -> OperatorMode {
        self.flags.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fb_conn_packing() {
        let fb = FbConn::new(0x0B, 0xF4);
        assert_eq!(fb.0, 0x040B);
        assert_eq!(fb.first(), 0x0B);
        assert_eq!(fb.second(), 0x04);
        assert!(fb.first_additive());
        assert!(!fb.second_additive());
        assert_eq!(fb.first_feedback(), 5);
        assert_eq!(format!("{:X}", fb), "40B");
    }

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(InstrumentFlags(0).mode(), OperatorMode::TwoOp);
        assert_eq!(InstrumentFlags(0x01).mode(), OperatorMode::FourOp);
        assert_eq!(InstrumentFlags(0x02).mode(), OperatorMode::PseudoFourOp);
        assert_eq!(InstrumentFlags(0x03).mode(), OperatorMode::PseudoFourOp);
        assert_eq!(InstrumentFlags(0x03).mode().operator_count(), 4);
        assert!(InstrumentFlags(0x04).is_blank());
    }
}
