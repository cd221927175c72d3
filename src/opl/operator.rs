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

//! OPL operator records and the raw two-operator register buffer

/// Bit offset of the AM/VIB/EG/KSR/MULT byte (register 0x20) in the envelope word
const AM_VIB_SHIFT: u32 = 0;
/// Bit offset of the attack/decay byte (register 0x60)
const ATTACK_DECAY_SHIFT: u32 = 8;
/// Bit offset of the sustain/release byte (register 0x80)
const SUSTAIN_RELEASE_SHIFT: u32 = 16;
/// Bit offset of the waveform byte (register 0xE0)
const WAVEFORM_SHIFT: u32 = 24;

/// Size of a raw two-operator instrument buffer
pub const INST_BUFFER_SIZE: usize = 11;

/// Unpacked register bytes of one OPL operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorRegisters {
    /// AM / vibrato / EG-type / KSR / frequency multiplier (0x20)
    pub am_vib: u8,
    /// Attack rate (high nibble) and decay rate (low nibble) (0x60)
    pub attack_decay: u8,
    /// Sustain level (high nibble) and release rate (low nibble) (0x80)
    pub sustain_release: u8,
    /// Waveform select (0xE0)
    pub waveform: u8,
    /// Key scale level (top 2 bits) and total level (low 6 bits) (0x40)
    pub ksl_level: u8,
}

impl OperatorRegisters {
    /// Packs the register bytes into a stored operator record
    pub fn pack(&self) -> Operator {
        Operator {
            envelope: (u32::from(self.waveform) << WAVEFORM_SHIFT)
                | (u32::from(self.sustain_release) << SUSTAIN_RELEASE_SHIFT)
                | (u32::from(self.attack_decay) << ATTACK_DECAY_SHIFT)
                | (u32::from(self.am_vib) << AM_VIB_SHIFT),
            level: self.ksl_level,
        }
    }
}

/// One stored FM operator: the packed 0xE862 envelope word plus the 0x40 level byte.
///
/// Equality and hashing are purely structural, so two operators with the same
/// register contents always canonicalize to the same store identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Operator {
    /// Packed waveform / sustain-release / attack-decay / am-vib bytes
    pub envelope: u32,
    /// Key scale level and total level
    pub level: u8,
}

impl Operator {
    /// Splits the packed envelope word back into its register bytes
    pub fn registers(&self) -> OperatorRegisters {
        OperatorRegisters {
            am_vib: (self.envelope >> AM_VIB_SHIFT) as u8,
            attack_decay: (self.envelope >> ATTACK_DECAY_SHIFT) as u8,
            sustain_release: (self.envelope >> SUSTAIN_RELEASE_SHIFT) as u8,
            waveform: (self.envelope >> WAVEFORM_SHIFT) as u8,
            ksl_level: self.level,
        }
    }

    /// Envelope fields relevant to audibility
    pub fn envelope_fields(&self) -> EnvelopeFields {
        let regs = self.registers();
        EnvelopeFields {
            eg_enabled: (regs.am_vib >> 5) & 0x01 != 0,
            attack: regs.attack_decay >> 4,
            decay: regs.attack_decay & 0x0F,
            sustain: regs.sustain_release >> 4,
            release: regs.sustain_release & 0x0F,
            level: regs.ksl_level & 0x3F,
        }
    }
}

/// Envelope generator settings of an operator, one field per register nibble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvelopeFields {
    /// Sustaining envelope (EG-type bit)
    pub eg_enabled: bool,
    /// Attack rate (0-15)
    pub attack: u8,
    /// Decay rate (0-15)
    pub decay: u8,
    /// Sustain level (0-15)
    pub sustain: u8,
    /// Release rate (0-15)
    pub release: u8,
    /// Total level attenuation (0-63)
    pub level: u8,
}

/// Raw 11-byte two-operator instrument as laid out by the legacy bank formats.
///
/// Slot 0 is the modulator, slot 1 the carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstBuffer {
    /// 0x20 register bytes
    pub am_vib: [u8; 2],
    /// 0x60 register bytes
    pub attack_decay: [u8; 2],
    /// 0x80 register bytes
    pub sustain_release: [u8; 2],
    /// 0xE0 register bytes
    pub waveform: [u8; 2],
    /// 0x40 register bytes
    pub ksl_level: [u8; 2],
    /// Feedback / connection (0xC0)
    pub fb_conn: u8,
}

impl InstBuffer {
    /// Audibly silent placeholder used where a bank has no real definition.
    pub const NO_SOUND: InstBuffer = InstBuffer::from_bytes([
        0x00, 0x10, 0x07, 0x07, 0xF7, 0xF7, 0x00, 0x00, 0xFF, 0xFF, 0x00,
    ]);

    /// Creates a buffer from its raw byte layout
    pub const fn from_bytes(data: [u8; INST_BUFFER_SIZE]) -> Self {
        Self {
            am_vib: [data[0], data[1]],
            attack_decay: [data[2], data[3]],
            sustain_release: [data[4], data[5]],
            waveform: [data[6], data[7]],
            ksl_level: [data[8], data[9]],
            fb_conn: data[10],
        }
    }

    /// Generate raw data array from structured members
    pub fn to_bytes(&self) -> [u8; INST_BUFFER_SIZE] {
        [
            self.am_vib[0],
            self.am_vib[1],
            self.attack_decay[0],
            self.attack_decay[1],
            self.sustain_release[0],
            self.sustain_release[1],
            self.waveform[0],
            self.waveform[1],
            self.ksl_level[0],
            self.ksl_level[1],
            self.fb_conn,
        ]
    }

    /// Register bytes of operator `slot` (0 = modulator, 1 = carrier)
    pub fn registers(&self, slot: usize) -> OperatorRegisters {
        assert!(slot < 2, "invalid operator slot: {}", slot);
        OperatorRegisters {
            am_vib: self.am_vib[slot],
            attack_decay: self.attack_decay[slot],
            sustain_release: self.sustain_release[slot],
            waveform: self.waveform[slot],
            ksl_level: self.ksl_level[slot],
        }
    }

    /// Both operators packed as store records
    pub fn operators(&self) -> [Operator; 2] {
        [self.registers(0).pack(), self.registers(1).pack()]
    }
}
