// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! Sub-charsets that can be designated into an ISO-2022 register,
//! and the static table of which ones each variant and version permits.

use bitflags::bitflags;
use thiserror::Error;

/// A fixed character set that can occupy one of the G0..G3 registers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SubCharset {
    /// Undesignated register.
    #[default]
    None,
    Ascii,
    /// The right half of ISO-8859-1 (96-charset, G2 only).
    Iso8859_1,
    /// The right half of ISO-8859-7 (96-charset, G2 only).
    Iso8859_7,
    /// JIS X 0201 Roman.
    JisX0201,
    JisX0208,
    JisX0212,
    Gb2312,
    Ksc5601,
    /// JIS X 0201 Katakana, i.e. half-width katakana.
    HalfwidthKatakana,
}

impl SubCharset {
    /// Returns true if the charset needs two bytes per character.
    pub fn is_double_byte(self) -> bool {
        matches!(self,
                 SubCharset::JisX0208 | SubCharset::JisX0212 |
                 SubCharset::Gb2312 | SubCharset::Ksc5601)
    }

    /// Returns true if the charset is a 96-charset (only designatable into G2 here).
    pub fn is_96_set(self) -> bool {
        matches!(self, SubCharset::Iso8859_1 | SubCharset::Iso8859_7)
    }

    /// The escape sequence the encoder writes to designate this charset.
    /// Charsets that only live in G1 (KR/CN) have their own sequences in the variant table.
    pub fn escape(self) -> &'static [u8] {
        match self {
            SubCharset::None => b"",
            SubCharset::Ascii => b"\x1b(B",
            SubCharset::Iso8859_1 => b"\x1b.A",
            SubCharset::Iso8859_7 => b"\x1b.F",
            SubCharset::JisX0201 => b"\x1b(J",
            SubCharset::JisX0208 => b"\x1b$B",
            SubCharset::JisX0212 => b"\x1b$(D",
            SubCharset::Gb2312 => b"\x1b$A",
            SubCharset::Ksc5601 => b"\x1b$(C",
            SubCharset::HalfwidthKatakana => b"\x1b(I",
        }
    }

    fn flag(self) -> SubCharsetSet {
        match self {
            SubCharset::None => SubCharsetSet::empty(),
            SubCharset::Ascii => SubCharsetSet::ASCII,
            SubCharset::Iso8859_1 => SubCharsetSet::ISO_8859_1,
            SubCharset::Iso8859_7 => SubCharsetSet::ISO_8859_7,
            SubCharset::JisX0201 => SubCharsetSet::JIS_X0201,
            SubCharset::JisX0208 => SubCharsetSet::JIS_X0208,
            SubCharset::JisX0212 => SubCharsetSet::JIS_X0212,
            SubCharset::Gb2312 => SubCharsetSet::GB2312,
            SubCharset::Ksc5601 => SubCharsetSet::KSC5601,
            SubCharset::HalfwidthKatakana => SubCharsetSet::HALFWIDTH_KATAKANA,
        }
    }
}

bitflags! {
    /// A set of sub-charsets, used for the per-variant capability table.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct SubCharsetSet: u16 {
        const ASCII = 1 << 0;
        const ISO_8859_1 = 1 << 1;
        const ISO_8859_7 = 1 << 2;
        const JIS_X0201 = 1 << 3;
        const JIS_X0208 = 1 << 4;
        const JIS_X0212 = 1 << 5;
        const GB2312 = 1 << 6;
        const KSC5601 = 1 << 7;
        const HALFWIDTH_KATAKANA = 1 << 8;
    }
}

impl SubCharsetSet {
    /// Returns true if `cs` is in the set. `SubCharset::None` is never a member.
    pub fn has(self, cs: SubCharset) -> bool {
        cs != SubCharset::None && self.contains(cs.flag())
    }
}

/// The ISO-2022 family member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Variant {
    Jp,
    Kr,
    Cn,
}

/// ISO-2022-JP version selecting the 7-bit JIS profile (SI/SO katakana).
pub const JIS7: u8 = 3;
/// ISO-2022-JP version selecting the 8-bit JIS profile (GR katakana).
pub const JIS8: u8 = 4;

/// The order in which the encoder tries charsets that are not already designated.
pub const PREFERENCE_ORDER: [SubCharset; 9] = [
    SubCharset::Ascii,
    SubCharset::JisX0201,
    SubCharset::Iso8859_1,
    SubCharset::Iso8859_7,
    SubCharset::JisX0208,
    SubCharset::JisX0212,
    SubCharset::Gb2312,
    SubCharset::Ksc5601,
    SubCharset::HalfwidthKatakana,
];

/// Returns the sub-charsets legal for given variant and version.
/// An unknown version yields an empty set.
pub fn legal_subcharsets(variant: Variant, version: u8) -> SubCharsetSet {
    let jp0 = SubCharsetSet::ASCII | SubCharsetSet::JIS_X0201 |
              SubCharsetSet::JIS_X0208 | SubCharsetSet::HALFWIDTH_KATAKANA;
    let jp1 = jp0 | SubCharsetSet::JIS_X0212;
    let jp2 = jp1 | SubCharsetSet::GB2312 | SubCharsetSet::KSC5601 |
              SubCharsetSet::ISO_8859_1 | SubCharsetSet::ISO_8859_7;
    match (variant, version) {
        (Variant::Jp, 0) => jp0,
        (Variant::Jp, 1) => jp1,
        (Variant::Jp, 2..=4) => jp2,
        (Variant::Kr, 0..=1) => SubCharsetSet::ASCII | SubCharsetSet::KSC5601,
        (Variant::Cn, 0..=1) => SubCharsetSet::ASCII | SubCharsetSet::GB2312,
        _ => SubCharsetSet::empty(),
    }
}

/// A rejected variant/version combination.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("unsupported version {version} for {variant:?}")]
pub struct ConfigError {
    pub variant: Variant,
    pub version: u8,
}

/// Validated converter parameters.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Iso2022Config {
    pub variant: Variant,
    pub version: u8,
    /// Allows one-way fallback mappings on encoding (e.g. half-width katakana into JIS X 0208).
    pub use_fallback: bool,
}

impl Iso2022Config {
    pub fn new(variant: Variant, version: u8) -> Result<Iso2022Config, ConfigError> {
        if legal_subcharsets(variant, version).is_empty() {
            return Err(ConfigError { variant, version });
        }
        Ok(Iso2022Config { variant, version, use_fallback: false })
    }

    pub fn with_fallback(self, use_fallback: bool) -> Iso2022Config {
        Iso2022Config { use_fallback, ..self }
    }
}
