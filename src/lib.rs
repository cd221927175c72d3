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

//! Build-time compiler for OPL FM instrument banks.
//!
//! Instruments decoded from legacy bank files are canonicalized into four
//! deduplicated tables (banks, MIDI program tables, instruments, operators)
//! that reference each other by index, and exported as C source suitable for
//! embedding into a program's static data.

#![warn(missing_docs)]

pub mod banks;
pub mod export;
pub mod ingest;
pub mod manifest;
pub mod opl;
pub mod wopl;

pub use banks::{
    BankEntry, BankIndex, BankSetup, BanksDump, Instrument, InstrumentId, MidiBank, OperatorId,
    ProgramTableId,
};
pub use export::{export_banks, tables_to_string, write_tables};
pub use ingest::{ingest, BankSource, Manifest};
pub use opl::{FbConn, InstBuffer, InstrumentFlags, InstrumentParams, Operator};
