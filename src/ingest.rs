//! Feeding parsed bank files into the database

use anyhow::{bail, Context, Result};

use crate::banks::BanksDump;
use crate::wopl::WoplSource;

pub use crate::manifest::{BankDefinition, BankFormat, Manifest};

/// A per-format loader. Decodes one bank file and registers its program
/// tables through [`BanksDump::init_bank`], [`BanksDump::add_instrument`] and
/// [`BanksDump::add_midi_bank`].
pub trait BankSource {
    /// Loads the bank described by `def` into `dump`
    fn load_into(&self, dump: &mut BanksDump, def: &BankDefinition) -> Result<()>;
}

/// Loader for `format`, if this build has one
pub fn source_for(format: BankFormat) -> Option<&'static dyn BankSource> {
    match format {
        BankFormat::Wopl => Some(&WoplSource),
        _ => None,
    }
}

/// Loads every bank of `manifest` in order
pub fn ingest(dump: &mut BanksDump, manifest: &Manifest) -> Result<()> {
    for def in &manifest.banks {
        let Some(source) = source_for(def.format) else {
            bail!(
                "bank {} ('{}'): no loader for {:?} files",
                def.id,
                def.title,
                def.format
            );
        };
        source
            .load_into(dump, def)
            .with_context(|| format!("failed to load bank {} ('{}')", def.id, def.title))?;
    }

    log::info!(
        "ingested {} banks: {} program tables, {} instruments, {} operators",
        dump.banks().len(),
        dump.midi_banks().len(),
        dump.instruments().len(),
        dump.operators().len()
    );
    Ok(())
}
