#![allow(dead_code)]

use adldata::opl::OperatorRegisters;
use adldata::Operator;

/// Audible operator with the given total level
pub fn op(am_vib: u8, attack_decay: u8, sustain_release: u8, ksl_level: u8) -> Operator {
    OperatorRegisters {
        am_vib,
        attack_decay,
        sustain_release,
        waveform: 0,
        ksl_level,
    }
    .pack()
}

/// Size of a version 3 WOPL instrument record
pub const WOPL_V3_INST: usize = 66;

/// Register bytes of one WOPL operator in file order: 0x20, 0x40, 0x60, 0x80, 0xE0
pub type WoplOp = [u8; 5];

/// Builds a version 3 instrument record
pub fn wopl_instrument(
    flags: u8,
    percussion_key: u8,
    fb_conn: u8,
    modulator: WoplOp,
    carrier: WoplOp,
) -> [u8; WOPL_V3_INST] {
    let mut data = [0u8; WOPL_V3_INST];
    data[38] = percussion_key;
    data[39] = flags;
    data[40] = fb_conn;
    data[42..47].copy_from_slice(&carrier);
    data[47..52].copy_from_slice(&modulator);
    data
}

/// Blank instrument record
pub fn wopl_blank() -> [u8; WOPL_V3_INST] {
    wopl_instrument(0x04, 0, 0, [0; 5], [0; 5])
}

/// A bank inside a test WOPL file: name, LSB and the non-blank instruments
pub struct TestBank {
    pub percussion: bool,
    pub name: &'static str,
    pub lsb: u8,
    pub instruments: Vec<(usize, [u8; WOPL_V3_INST])>,
}

/// Builds a version 3 WOPL file. Melodic banks must precede percussion banks.
pub fn wopl_v3(opl_flags: u8, volume_model: u8, banks: &[TestBank]) -> Vec<u8> {
    let melodic = banks.iter().filter(|b| !b.percussion).count() as u16;
    let percussion = banks.len() as u16 - melodic;

    let mut data = b"WOPL3-BANK\0".to_vec();
    data.extend_from_slice(&3u16.to_le_bytes());
    data.extend_from_slice(&melodic.to_be_bytes());
    data.extend_from_slice(&percussion.to_be_bytes());
    data.push(opl_flags);
    data.push(volume_model);

    for bank in banks {
        let mut meta = [0u8; 34];
        meta[..bank.name.len()].copy_from_slice(bank.name.as_bytes());
        meta[32] = bank.lsb;
        data.extend_from_slice(&meta);
    }

    for bank in banks {
        let mut slots = vec![wopl_blank(); 128];
        for (patch, ins) in &bank.instruments {
            slots[*patch] = *ins;
        }
        for slot in slots {
            data.extend_from_slice(&slot);
        }
    }

    data
}
