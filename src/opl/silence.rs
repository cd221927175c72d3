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

//! Heuristic detection of inaudible OPL instruments.
//!
//! The classifier only looks at envelope and level bits; it never renders
//! audio. It is advisory: the bank tables are exported regardless of the
//! result.

use std::fmt;

use super::instrument::{FbConn, OperatorMode};
use super::operator::{EnvelopeFields, Operator};

/// Maximum code of a 4-bit envelope rate
const RATE_MAX: u8 = 0x0F;

/// Maximum attenuation of the 6-bit total level
const LEVEL_MAX: u8 = 0x3F;

/// The rule that made an operator inaudible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilenceRule {
    /// Total level at maximum attenuation
    FullyAttenuated,
    /// Attack rate zero, the envelope never rises
    NoAttack,
    /// Attack, decay and sustain all at maximum code
    InstantDecay,
    /// Attack and decay at maximum, no release and a non-sustaining envelope
    InstantDecayNoRelease,
}

impl fmt::Display for SilenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SilenceRule::FullyAttenuated => write!(f, "volume=0x3F"),
            SilenceRule::NoAttack => write!(f, "attack=0x00"),
            SilenceRule::InstantDecay => write!(f, "attack=0x0F, sustain=0x0F, decay=0x0F"),
            SilenceRule::InstantDecayNoRelease => {
                write!(f, "attack=0x0F, decay=0x0F, release=0x00, !egEn")
            }
        }
    }
}

impl EnvelopeFields {
    /// First matching silence rule, if any
    pub fn silence_rule(&self) -> Option<SilenceRule> {
        if self.level == LEVEL_MAX {
            Some(SilenceRule::FullyAttenuated)
        } else if self.attack == 0 {
            Some(SilenceRule::NoAttack)
        } else if self.attack == RATE_MAX && self.sustain == RATE_MAX && self.decay == RATE_MAX {
            Some(SilenceRule::InstantDecay)
        } else if self.attack == RATE_MAX
            && self.decay == RATE_MAX
            && self.release == 0
            && !self.eg_enabled
        {
            Some(SilenceRule::InstantDecayNoRelease)
        } else {
            None
        }
    }
}

impl Operator {
    /// Whether this operator alone produces no audible output
    pub fn is_silent(&self) -> bool {
        self.envelope_fields().silence_rule().is_some()
    }
}

/// Outcome of classifying one instrument
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SilenceReport {
    /// Whether the instrument is inaudible
    pub silent: bool,
    /// Rules hit by the audible-path operators, as (operator slot, rule)
    pub trace: Vec<(usize, SilenceRule)>,
}

/// Operator slots that reach the output for a given wiring. Each group is one
/// independent voice; the instrument is silent only if every group is.
fn output_groups(mode: OperatorMode, fb_conn: FbConn) -> Vec<&'static [usize]> {
    let pair = |additive: bool, base: usize| -> &'static [usize] {
        match (additive, base) {
            (false, 0) => &[1],
            (true, 0) => &[0, 1],
            (false, _) => &[3],
            (true, _) => &[2, 3],
        }
    };

    match mode {
        OperatorMode::TwoOp => vec![pair(fb_conn.first_additive(), 0)],
        OperatorMode::PseudoFourOp => vec![
            pair(fb_conn.first_additive(), 0),
            pair(fb_conn.second_additive(), 2),
        ],
        OperatorMode::FourOp => {
            let carriers: &'static [usize] =
                match (fb_conn.first_additive(), fb_conn.second_additive()) {
                    // FM-FM
                    (false, false) => &[3],
                    // AM-FM
                    (true, false) => &[0, 3],
                    // FM-AM
                    (false, true) => &[1, 3],
                    // AM-AM
                    (true, true) => &[0, 2, 3],
                };
            vec![carriers]
        }
    }
}

/// Classifies an instrument given its operators in store order.
pub fn classify(ops: &[Operator], fb_conn: FbConn, mode: OperatorMode) -> SilenceReport {
    assert!(
        ops.len() >= mode.operator_count(),
        "instrument needs {} operators, got {}",
        mode.operator_count(),
        ops.len()
    );

    let mut report = SilenceReport {
        silent: true,
        trace: Vec::new(),
    };

    for group in output_groups(mode, fb_conn) {
        let mut group_silent = true;
        for &slot in group {
            match ops[slot].envelope_fields().silence_rule() {
                Some(rule) => {
                    log::trace!("operator {}: == {} ==", slot, rule);
                    report.trace.push((slot, rule));
                }
                None => group_silent = false,
            }
        }
        if !group_silent {
            report.silent = false;
        }
    }

    report
}

/// Shorthand for `classify(..).silent`
pub fn is_silent(ops: &[Operator], fb_conn: FbConn, mode: OperatorMode) -> bool {
    classify(ops, fb_conn, mode).silent
}
