//! Export preset editing for `export_presets.cfg`
//!
//! The file is kept as an arena of raw lines. Each preset is a `[start, end)`
//! range into that arena beginning at a `[preset.N]` header, so edits are
//! index writes and every unrelated line is rendered back untouched.

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::error::PresetError;

/// Key holding the full version
pub const VERSION_KEY: &str = "application/version=";

/// Key holding the short version
pub const SHORT_VERSION_KEY: &str = "application/short_version=";

const PLATFORM_KEY: &str = "platform=";
const NAME_KEY: &str = "name=";

/// Platform whose exporter swaps `version` and `short_version`
const SWAPPED_VERSION_PLATFORM: &str = "macos";

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"\[preset\.[0-9]+\]").expect("preset header pattern is valid"))
}

/// Whether a line opens a new preset block
pub fn is_preset_header(line: &str) -> bool {
    header_regex().is_match(line)
}

/// One preset: a range of line indices into its [`PresetDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetBlock {
    start: usize,
    end: usize,
}

impl PresetBlock {
    /// Line indices covered by this block
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Index of the header line
    pub fn header_index(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split lines into preset blocks.
///
/// A block runs from its header up to the next header or the end of input.
/// Lines before the first header belong to no block.
pub fn split_into_presets<S: AsRef<str>>(lines: &[S]) -> Vec<PresetBlock> {
    let headers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_preset_header(line.as_ref()))
        .map(|(index, _)| index)
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, &start)| PresetBlock {
            start,
            end: headers.get(i + 1).copied().unwrap_or(lines.len()),
        })
        .collect()
}

/// Which version field a stamp wrote for one preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedPreset {
    pub name: Option<String>,
    pub platform: String,
    pub short: bool,
    pub changed: bool,
}

/// Parsed `export_presets.cfg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDocument {
    lines: Vec<String>,
    blocks: Vec<PresetBlock>,
}

impl PresetDocument {
    /// Parse file contents; lines are split on `\n` and kept verbatim
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.split('\n').map(String::from).collect())
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        let blocks = split_into_presets(&lines);
        Self { lines, blocks }
    }

    /// Read and parse a preset file
    pub fn load(path: &Path) -> Result<Self, PresetError> {
        if !path.exists() {
            return Err(PresetError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Write the rendered document to `path`
    pub fn save(&self, path: &Path) -> Result<(), PresetError> {
        std::fs::write(path, self.render()).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn blocks(&self) -> &[PresetBlock] {
        &self.blocks
    }

    /// Lines belonging to a block, header included
    pub fn block_lines(&self, block: PresetBlock) -> &[String] {
        &self.lines[block.range()]
    }

    /// Value of the preset's `name=` entry, unquoted
    pub fn preset_name(&self, block: PresetBlock) -> Option<String> {
        self.block_lines(block)
            .iter()
            .find(|line| line.trim_start().starts_with(NAME_KEY))
            .map(|line| unquote(&line.trim_start()[NAME_KEY.len()..]))
    }

    /// Lower-cased value of the first `platform=` line in the block
    pub fn platform(&self, block: PresetBlock) -> Option<String> {
        let line = self
            .block_lines(block)
            .iter()
            .find(|line| line.contains(PLATFORM_KEY))?;
        let value = line.rsplit('=').next()?;
        Some(unquote(value).to_lowercase())
    }

    /// Replace the first `application/version=` (or `short_version=`) line of
    /// the block with `key="value"`.
    ///
    /// Returns whether a line was written. A block without the key is left
    /// alone.
    pub fn set_version(&mut self, block: PresetBlock, value: &str, short: bool) -> bool {
        let key = if short { SHORT_VERSION_KEY } else { VERSION_KEY };

        let Some(index) = block.range().find(|&i| self.lines[i].contains(key)) else {
            debug!(key, header = block.header_index(), "version key absent in preset");
            return false;
        };

        let line_ending = if self.lines[index].ends_with('\r') { "\r" } else { "" };
        self.lines[index] = format!("{key}\"{value}\"{line_ending}");
        true
    }

    /// Stamp a build number into every preset that declares a platform.
    ///
    /// macOS presets get `application/version`, every other platform gets
    /// `application/short_version`. The engine's macOS exporter swaps the two
    /// fields, so this asymmetry is required.
    pub fn stamp_build_number(&mut self, build_number: u64) -> Vec<StampedPreset> {
        let value = build_number.to_string();
        let mut stamped = Vec::new();

        for block in self.blocks.clone() {
            let Some(platform) = self.platform(block) else {
                debug!(header = block.header_index(), "preset has no platform, skipping");
                continue;
            };

            let short = platform != SWAPPED_VERSION_PLATFORM;
            let changed = self.set_version(block, &value, short);
            stamped.push(StampedPreset {
                name: self.preset_name(block),
                platform,
                short,
                changed,
            });
        }

        stamped
    }

    /// Render the document back to text, joined by `\n`
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Stamp a build number into a preset file on disk
#[instrument(skip_all, fields(path = %path.display(), build_number = build_number))]
pub fn stamp_build_number_file(path: &Path, build_number: u64) -> Result<Vec<StampedPreset>, PresetError> {
    let mut document = PresetDocument::load(path)?;

    let names: Vec<String> = document
        .blocks()
        .iter()
        .map(|&block| document.preset_name(block).unwrap_or_else(|| "<unnamed>".to_string()))
        .collect();
    info!(presets = ?names, "stamping build number");

    let stamped = document.stamp_build_number(build_number);
    document.save(path)?;
    Ok(stamped)
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}
