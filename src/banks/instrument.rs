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

//! Canonicalized instruments and their provenance labels

use super::store::Interner;
use super::{InstrumentId, OperatorId};
use crate::opl::InstrumentParams;

/// A stored instrument: scalar parameters plus references into the operator table.
///
/// Two-operator instruments carry exactly 2 references, four-operator and
/// pseudo four-operator ones exactly 4.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instrument {
    /// Scalar parameters
    pub params: InstrumentParams,
    /// Operator references in store order
    pub ops: Vec<OperatorId>,
}

/// Borrowed view of one stored instrument
#[derive(Debug, Clone, Copy)]
pub struct InstrumentEntry<'a> {
    /// Identity in the instrument table
    pub id: InstrumentId,
    /// The instrument itself
    pub instrument: &'a Instrument,
    /// Every source label that resolved to this instrument, in insertion order
    pub labels: &'a [String],
}

/// Instrument table. Identity and labels take no part in equality.
#[derive(Debug, Clone, Default)]
pub struct InstrumentStore {
    entries: Interner<Instrument>,
    labels: Vec<Vec<String>>,
}

impl InstrumentStore {
    /// Resolves `instrument` to its identity and records `label` against it
    pub fn insert(&mut self, instrument: Instrument, label: String) -> InstrumentId {
        let (idx, inserted) = self.entries.intern(instrument);
        if inserted {
            self.labels.push(vec![label]);
        } else {
            log::debug!("instrument {} reused by {}", idx, label);
            self.labels[idx].push(label);
        }
        InstrumentId(idx)
    }

    /// Instrument by identity
    pub fn get(&self, id: InstrumentId) -> Option<InstrumentEntry<'_>> {
        let instrument = self.entries.get(id.0)?;
        Some(InstrumentEntry {
            id,
            instrument,
            labels: &self.labels[id.0],
        })
    }

    /// Number of distinct instruments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All instruments in identity order
    pub fn iter(&self) -> impl Iterator<Item = InstrumentEntry<'_>> {
        self.entries
            .as_slice()
            .iter()
            .zip(&self.labels)
            .enumerate()
            .map(|(idx, (instrument, labels))| InstrumentEntry {
                id: InstrumentId(idx),
                instrument,
                labels,
            })
    }
}
