// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! Per-charset mapping between ISO-2022 byte sequences and Unicode scalar values.
//!
//! The ISO-2022 engines only see the `SubCharsetTables` trait.
//! `IndexTables` implements it on top of the WHATWG index crates,
//! translating 7-bit GL byte pairs into index pointers and back.

use crate::charset::SubCharset;

use encoding_index_japanese as japanese;
use encoding_index_korean as korean;
use encoding_index_simpchinese as simpchinese;
use encoding_index_singlebyte as singlebyte;

/// Failure of `SubCharsetTables::decode_one`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubDecodeError {
    /// The input is a valid prefix but too short; more bytes are required.
    NeedMoreBytes,
    /// The bytes are well-formed but have no Unicode mapping.
    Unmappable,
}

/// The scalar value has no representation in the requested charset.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Unmappable;

/// One or two bytes produced by `SubCharsetTables::encode_one`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MappedBytes {
    buf: [u8; 2],
    len: usize,
}

impl MappedBytes {
    pub fn single(b: u8) -> MappedBytes {
        MappedBytes { buf: [b, 0], len: 1 }
    }

    pub fn double(lead: u8, trail: u8) -> MappedBytes {
        MappedBytes { buf: [lead, trail], len: 2 }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Sub-charset conversion tables, consulted one character at a time.
///
/// All bytes are in their GL form (0x21..0x7E for 94-sets,
/// 0x20..0x7F for 96-sets) regardless of how they are shifted in the stream.
pub trait SubCharsetTables {
    /// Maps the character at the start of `input` into a scalar value,
    /// returning the value and the number of bytes it used.
    fn decode_one(&self, cs: SubCharset, input: &[u8]) -> Result<(u32, usize), SubDecodeError>;

    /// Maps a scalar value into bytes of `cs`.
    /// `use_fallback` permits one-way mappings.
    fn encode_one(&self, cs: SubCharset, scalar: u32, use_fallback: bool)
                 -> Result<MappedBytes, Unmappable>;
}

/// A sendable reference to the conversion tables.
pub type TablesRef = &'static (dyn SubCharsetTables + Send + Sync);

/// Conversion tables backed by the WHATWG indices.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexTables;

/// The default table instance.
pub static INDEX_TABLES: IndexTables = IndexTables;

const HALFWIDTH_KATAKANA_FIRST: u32 = 0xff61;
const HALFWIDTH_KATAKANA_LAST: u32 = 0xff9f;

/// JIS X 0208 codes for U+FF61..U+FF9F, used as a fallback.
static HALFWIDTH_KATAKANA_FALLBACK: [u16; 63] = [
    0x2123, 0x2156, 0x2157, 0x2122, 0x2126, 0x2572, 0x2521, 0x2523,
    0x2525, 0x2527, 0x2529, 0x2563, 0x2565, 0x2567, 0x2543, 0x213c,
    0x2522, 0x2524, 0x2526, 0x2528, 0x252a, 0x252b, 0x252d, 0x252f,
    0x2531, 0x2533, 0x2535, 0x2537, 0x2539, 0x253b, 0x253d, 0x253f,
    0x2541, 0x2544, 0x2546, 0x2548, 0x254a, 0x254b, 0x254c, 0x254d,
    0x254e, 0x254f, 0x2552, 0x2555, 0x2558, 0x255b, 0x255e, 0x255f,
    0x2560, 0x2561, 0x2562, 0x2564, 0x2566, 0x2568, 0x2569, 0x256a,
    0x256b, 0x256c, 0x256d, 0x256f, 0x2573, 0x212b, 0x212c,
];

fn is_gl94(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

/// Pointer into a 94x94 JIS index.
fn jis_pointer(lead: u8, trail: u8) -> u16 {
    (lead as u16 - 0x21) * 94 + (trail as u16 - 0x21)
}

/// Pointer into the EUC-KR and GB 18030 indices, which are laid out as 126x190.
fn euc_pointer(lead: u8, trail: u8) -> u16 {
    (lead as u16 - 0x01) * 190 + (trail as u16 + 0x80 - 0x41)
}

fn jis_bytes(ptr: u16) -> Result<MappedBytes, Unmappable> {
    if ptr == 0xffff || ptr >= 94 * 94 {
        return Err(Unmappable);
    }
    Ok(MappedBytes::double((ptr / 94) as u8 + 0x21, (ptr % 94) as u8 + 0x21))
}

/// Converts an EUC lead/trail pair back into GL bytes, accepting only GR94 codes.
fn gr94_bytes(lead: u16, trail: u16) -> Result<MappedBytes, Unmappable> {
    if !(0xa1..=0xfe).contains(&lead) || !(0xa1..=0xfe).contains(&trail) {
        return Err(Unmappable);
    }
    Ok(MappedBytes::double((lead - 0x80) as u8, (trail - 0x80) as u8))
}

fn mapped(scalar: u32) -> Result<(u32, usize), SubDecodeError> {
    if scalar == 0xffff {
        Err(SubDecodeError::Unmappable)
    } else {
        Ok((scalar, 2))
    }
}

impl SubCharsetTables for IndexTables {
    fn decode_one(&self, cs: SubCharset, input: &[u8]) -> Result<(u32, usize), SubDecodeError> {
        let b = match input.first() {
            Some(&b) => b,
            None => return Err(SubDecodeError::NeedMoreBytes),
        };

        if cs.is_double_byte() {
            let trail = match input.get(1) {
                Some(&trail) => trail,
                None => return Err(SubDecodeError::NeedMoreBytes),
            };
            if !is_gl94(b) || !is_gl94(trail) {
                return Err(SubDecodeError::Unmappable);
            }
            return match cs {
                SubCharset::JisX0208 => mapped(japanese::jis0208::forward(jis_pointer(b, trail))),
                SubCharset::JisX0212 => mapped(japanese::jis0212::forward(jis_pointer(b, trail))),
                SubCharset::Gb2312 => mapped(simpchinese::gb18030::forward(euc_pointer(b, trail))),
                _ => mapped(korean::euc_kr::forward(euc_pointer(b, trail))),
            };
        }

        if b > 0x7f {
            return Err(SubDecodeError::Unmappable);
        }
        let scalar = match cs {
            SubCharset::Ascii => b as u32,
            SubCharset::JisX0201 => match b {
                0x5c => 0xa5,
                0x7e => 0x203e,
                _ => b as u32,
            },
            SubCharset::Iso8859_1 => b as u32 + 0x80,
            SubCharset::Iso8859_7 => match singlebyte::iso_8859_7::forward(b | 0x80) {
                0xffff => return Err(SubDecodeError::Unmappable),
                ch => ch as u32,
            },
            SubCharset::HalfwidthKatakana if (0x21..=0x5f).contains(&b) =>
                b as u32 - 0x21 + HALFWIDTH_KATAKANA_FIRST,
            _ => return Err(SubDecodeError::Unmappable),
        };
        Ok((scalar, 1))
    }

    fn encode_one(&self, cs: SubCharset, scalar: u32, use_fallback: bool)
                 -> Result<MappedBytes, Unmappable> {
        match cs {
            SubCharset::None => Err(Unmappable),
            SubCharset::Ascii if scalar <= 0x7f => Ok(MappedBytes::single(scalar as u8)),
            SubCharset::Ascii => Err(Unmappable),
            SubCharset::JisX0201 => match scalar {
                0x5c | 0x7e => Err(Unmappable),
                0xa5 => Ok(MappedBytes::single(0x5c)),
                0x203e => Ok(MappedBytes::single(0x7e)),
                0..=0x7f => Ok(MappedBytes::single(scalar as u8)),
                _ => Err(Unmappable),
            },
            SubCharset::Iso8859_1 if (0xa0..=0xff).contains(&scalar) =>
                Ok(MappedBytes::single((scalar - 0x80) as u8)),
            SubCharset::Iso8859_1 => Err(Unmappable),
            SubCharset::Iso8859_7 => match singlebyte::iso_8859_7::backward(scalar) {
                b if b >= 0xa0 => Ok(MappedBytes::single(b - 0x80)),
                _ => Err(Unmappable),
            },
            SubCharset::HalfwidthKatakana
                if (HALFWIDTH_KATAKANA_FIRST..=HALFWIDTH_KATAKANA_LAST).contains(&scalar) =>
                Ok(MappedBytes::single((scalar - HALFWIDTH_KATAKANA_FIRST) as u8 + 0x21)),
            SubCharset::HalfwidthKatakana => Err(Unmappable),
            SubCharset::JisX0208 => {
                let ptr = japanese::jis0208::backward(scalar);
                if ptr == 0xffff && use_fallback &&
                   (HALFWIDTH_KATAKANA_FIRST..=HALFWIDTH_KATAKANA_LAST).contains(&scalar) {
                    let code = HALFWIDTH_KATAKANA_FALLBACK[(scalar - HALFWIDTH_KATAKANA_FIRST) as usize];
                    return Ok(MappedBytes::double((code >> 8) as u8, code as u8));
                }
                jis_bytes(ptr)
            }
            SubCharset::JisX0212 => jis_bytes(japanese::jis0212::backward(scalar)),
            SubCharset::Gb2312 => {
                let ptr = simpchinese::gb18030::backward(scalar);
                if ptr == 0xffff {
                    return Err(Unmappable);
                }
                let trail = ptr % 190;
                let trailoffset = if trail < 0x3f {0x40} else {0x41};
                gr94_bytes(ptr / 190 + 0x81, trail + trailoffset)
            }
            SubCharset::Ksc5601 => {
                let ptr = korean::euc_kr::backward(scalar);
                if ptr == 0xffff {
                    return Err(Unmappable);
                }
                gr94_bytes(ptr / 190 + 0x81, ptr % 190 + 0x41)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::SubCharset::*;

    fn dec(cs: SubCharset, input: &[u8]) -> Result<(u32, usize), SubDecodeError> {
        INDEX_TABLES.decode_one(cs, input)
    }

    fn enc(cs: SubCharset, scalar: u32) -> Result<Vec<u8>, Unmappable> {
        INDEX_TABLES.encode_one(cs, scalar, false).map(|b| b.as_slice().to_vec())
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(dec(Ascii, b"A"), Ok((0x41, 1)));
        assert_eq!(dec(JisX0201, b"\\"), Ok((0xa5, 1)));
        assert_eq!(dec(JisX0201, b"~"), Ok((0x203e, 1)));
        assert_eq!(dec(Iso8859_1, b"i"), Ok((0xe9, 1)));
        assert_eq!(dec(Iso8859_7, b"a"), Ok((0x3b1, 1)));
        assert_eq!(dec(HalfwidthKatakana, b"1"), Ok((0xff71, 1)));
        assert_eq!(dec(HalfwidthKatakana, b"\x60"), Err(SubDecodeError::Unmappable));
        assert_eq!(dec(Ascii, b""), Err(SubDecodeError::NeedMoreBytes));
        assert_eq!(dec(None, b"A"), Err(SubDecodeError::Unmappable));

        assert_eq!(enc(Ascii, 0x41), Ok(vec![0x41]));
        assert_eq!(enc(Ascii, 0xe9), Err(Unmappable));
        assert_eq!(enc(JisX0201, 0x5c), Err(Unmappable));
        assert_eq!(enc(JisX0201, 0xa5), Ok(vec![0x5c]));
        assert_eq!(enc(Iso8859_1, 0xe9), Ok(vec![0x69]));
        assert_eq!(enc(Iso8859_7, 0x3b1), Ok(vec![0x61]));
        assert_eq!(enc(Iso8859_7, 0x41), Err(Unmappable));
        assert_eq!(enc(HalfwidthKatakana, 0xff88), Ok(vec![0x48]));
    }

    #[test]
    fn test_double_byte() {
        assert_eq!(dec(JisX0208, b"\x24\x22"), Ok((0x3042, 2)));
        assert_eq!(dec(JisX0208, b"\x46\x7c"), Ok((0x65e5, 2)));
        assert_eq!(dec(JisX0208, b"\x6c\x38"), Ok((0x8c78, 2)));
        assert_eq!(dec(JisX0208, b"\x24"), Err(SubDecodeError::NeedMoreBytes));
        assert_eq!(dec(JisX0208, b"\x24\x0a"), Err(SubDecodeError::Unmappable));
        assert_eq!(dec(JisX0212, b"\x4b\x46"), Ok((0x736c, 2)));
        assert_eq!(dec(JisX0212, b"\x50\x4b"), Ok((0x793b, 2)));
        assert_eq!(dec(Gb2312, b"\x30\x21"), Ok((0x554a, 2)));
        assert_eq!(dec(Ksc5601, b"\x30\x21"), Ok((0xac00, 2)));

        assert_eq!(enc(JisX0208, 0x3042), Ok(vec![0x24, 0x22]));
        assert_eq!(enc(JisX0208, 0x30cd), Ok(vec![0x25, 0x4d]));
        assert_eq!(enc(JisX0212, 0x736c), Ok(vec![0x4b, 0x46]));
        assert_eq!(enc(Gb2312, 0x554a), Ok(vec![0x30, 0x21]));
        assert_eq!(enc(Ksc5601, 0xac00), Ok(vec![0x30, 0x21]));
        assert_eq!(enc(Ksc5601, 0xac02), Err(Unmappable)); // UHC extension, not in KS X 1001
        assert_eq!(enc(JisX0208, 0x41), Err(Unmappable));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(enc(JisX0208, 0xff71), Err(Unmappable));
        let fb = INDEX_TABLES.encode_one(JisX0208, 0xff71, true).unwrap();
        assert_eq!(fb.as_slice(), &[0x25, 0x22]);
        let fb = INDEX_TABLES.encode_one(JisX0208, 0xff9f, true).unwrap();
        assert_eq!(fb.as_slice(), &[0x21, 0x2c]);
    }
}
