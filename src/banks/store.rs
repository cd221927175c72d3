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

//! Append-only canonicalizing storage

use std::collections::HashMap;
use std::hash::Hash;

/// Stores each distinct value once and hands out dense indices in first-seen order.
///
/// Entries are never removed or moved, so an index stays valid for the whole run.
#[derive(Debug, Clone)]
pub struct Interner<T> {
    values: Vec<T>,
    index: HashMap<T, usize>,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> Interner<T> {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `value` to its index, appending it if unseen.
    ///
    /// Returns the index and whether the value was newly inserted.
    pub fn intern(&mut self, value: T) -> (usize, bool) {
        if let Some(&idx) = self.index.get(&value) {
            return (idx, false);
        }
        let idx = self.values.len();
        self.index.insert(value.clone(), idx);
        self.values.push(value);
        (idx, true)
    }

    /// Index of `value` if already stored
    pub fn find(&self, value: &T) -> Option<usize> {
        self.index.get(value).copied()
    }
}

impl<T> Interner<T> {
    /// Value at `idx`
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.values.get(idx)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in index order
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}
