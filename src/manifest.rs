//! Bank list configuration read from a TOML manifest.
//!
//! ```toml
//! [[bank]]
//! id = 0
//! title = "AIL (Star Control 3, Albion, Empire 2, etc.)"
//! format = "wopl"
//! file = "fm_banks/wopl_files/ail.wopl"
//! prefix = "sc3"
//!
//! [bank.setup]
//! volume_model = 2
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::banks::BankSetup;

/// Source file formats a bank can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankFormat {
    /// Native WOPL bank
    Wopl,
    /// Miles AIL / Global Timbre Library
    Ail,
    /// Bisqwit's ADLMIDI bank
    Bisqwit,
    /// AdLib Visual Composer BNK
    Bnk,
    /// HMI BNK2
    Bnk2,
    /// Creative IBK
    Ibk,
    /// Junglevision
    Jv,
    /// DMX OP2
    Op2,
    /// Apogee TMB
    Tmb,
    /// Electronic Arts
    Ea,
}

/// Per-bank overrides of the setup found in the bank file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupOverride {
    /// Volume scaling model
    pub volume_model: Option<u8>,
    /// Deep tremolo
    pub deep_tremolo: Option<bool>,
    /// Deep vibrato
    pub deep_vibrato: Option<bool>,
    /// Scale modulators with volume
    pub scale_modulators: Option<bool>,
}

impl SetupOverride {
    /// Applies the overrides on top of `base`
    pub fn apply(&self, base: BankSetup) -> BankSetup {
        BankSetup {
            volume_model: self.volume_model.unwrap_or(base.volume_model),
            deep_tremolo: self.deep_tremolo.unwrap_or(base.deep_tremolo),
            deep_vibrato: self.deep_vibrato.unwrap_or(base.deep_vibrato),
            scale_modulators: self.scale_modulators.unwrap_or(base.scale_modulators),
        }
    }
}

/// One `[[bank]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BankDefinition {
    /// Bank identifier; entries sharing an id extend the same bank
    pub id: usize,
    /// Display title
    pub title: String,
    /// Format of `file`
    pub format: BankFormat,
    /// Bank file, relative to the manifest
    pub file: PathBuf,
    /// Prefix of the instrument labels
    pub prefix: String,
    /// Setup overrides
    #[serde(default)]
    pub setup: SetupOverride,
}

/// The full bank list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Banks in export order
    #[serde(rename = "bank", default)]
    pub banks: Vec<BankDefinition>,
}

impl Manifest {
    /// Parses a manifest, resolving relative bank paths against `base_dir`
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(text).context("malformed bank manifest")?;
        if manifest.banks.is_empty() {
            bail!("bank manifest lists no banks");
        }
        for bank in &mut manifest.banks {
            if bank.file.is_relative() {
                bank.file = base_dir.join(&bank.file);
            }
        }
        Ok(manifest)
    }

    /// Reads and parses the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bank manifest '{}'", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, base_dir).with_context(|| format!("in '{}'", path.display()))
    }
}
