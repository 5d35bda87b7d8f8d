// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! ISO-2022-JP and its relatives as complete encodings.

use crate::charset::Iso2022Config;
use crate::codec::decoder::Iso2022Decoder;
use crate::codec::encoder::Iso2022Encoder;
use crate::index::{TablesRef, INDEX_TABLES};
use crate::types::*;

/// An ISO-2022 encoding with a fixed variant and version.
///
/// ISO-2022 switches between several coded character sets in the middle of the stream:
///
/// - escape sequences designate a set into one of the registers G0 to G3
///   (e.g. `ESC $ B` puts JIS X 0208 into G0 and `ESC ( B` puts ASCII back);
/// - SO and SI invoke G1 and G0 respectively, for as long as no other shift happens;
/// - SS2 (`ESC N`) invokes G2 for a single character.
///
/// ISO-2022-JP uses G0 for everything but the ISO 8859 upper halves of ISO-2022-JP-2,
/// which go to G2. Every line starts over from ASCII, or from JIS X 0201 Roman
/// if that was designated. The encoder returns to ASCII at the end of the input.
#[derive(Clone, Copy)]
pub struct Iso2022Encoding {
    pub name: &'static str,
    pub whatwg_name: Option<&'static str>,
    pub config: Iso2022Config,
    pub tables: TablesRef,
}

impl Iso2022Encoding {
    /// Creates an encoding over the WHATWG indices.
    pub fn new(name: &'static str, config: Iso2022Config) -> Iso2022Encoding {
        Iso2022Encoding { name, whatwg_name: None, config, tables: &INDEX_TABLES }
    }
}

impl Encoding for Iso2022Encoding {
    fn name(&self) -> &'static str { self.name }
    fn whatwg_name(&self) -> Option<&'static str> { self.whatwg_name }
    fn raw_encoder(&self) -> Box<dyn RawEncoder> {
        Box::new(Iso2022Encoder::new(self.config, self.tables))
    }
    fn raw_decoder(&self) -> Box<dyn RawDecoder> {
        Box::new(Iso2022Decoder::new(self.config, self.tables))
    }
}

#[cfg(test)]
mod tests {
    use super::Iso2022Encoding;
    use crate::all::{ISO_2022_JP, ISO_2022_JP_1, ISO_2022_JP_2, JIS7, JIS8};
    use crate::charset::{Iso2022Config, Variant};
    use crate::testutils::JAPANESE_TEXT;
    use crate::types::*;

    #[test]
    fn test_round_trip() {
        let long_text = JAPANESE_TEXT.repeat(8);
        for &encoding in &[ISO_2022_JP, ISO_2022_JP_1, ISO_2022_JP_2, JIS7, JIS8] {
            for text in &[JAPANESE_TEXT, &long_text[..], "\u{ff71}\u{ff9f}A\u{a5}\n\u{3042}"] {
                let encoded = encoding.encode(text, EncoderTrap::Strict).unwrap();
                assert!(encoded.iter().all(|&b| b < 0x80) || encoding.name() == "jis8");
                let decoded = encoding.decode(&encoded, DecoderTrap::Strict).unwrap();
                assert_eq!(&decoded, text, "round trip through {}", encoding.name());
            }
        }
    }

    #[test]
    fn test_round_trip_every_bmp_scalar() {
        let kr = Iso2022Encoding::new("iso-2022-kr", Iso2022Config::new(Variant::Kr, 0).unwrap());
        let cn = Iso2022Encoding::new("iso-2022-cn", Iso2022Config::new(Variant::Cn, 0).unwrap());
        let encodings = [ISO_2022_JP, ISO_2022_JP_1, ISO_2022_JP_2, JIS7, JIS8, &kr, &cn];
        for encoding in encodings.iter() {
            let mut mapped = 0;
            for ch in (0..0x10000).filter_map(char::from_u32) {
                let text = ch.to_string();
                let encoded = match encoding.encode(&text, EncoderTrap::Strict) {
                    Ok(encoded) => encoded,
                    Err(_) => continue,
                };
                assert_eq!(encoding.decode(&encoded, DecoderTrap::Strict), Ok(text),
                           "U+{:04X} through {}", ch as u32, encoding.name());
                mapped += 1;
            }
            assert!(mapped > 0x80, "{} maps only {} scalars", encoding.name(), mapped);
        }
    }

    #[test]
    fn test_round_trip_jp2() {
        let text = "caf\u{e9} \u{3b1}\u{3b2}\u{3b3} \u{ac00}\u{b098} \u{736c}\r\n\u{e9}";
        let encoded = ISO_2022_JP_2.encode(text, EncoderTrap::Strict).unwrap();
        assert_eq!(ISO_2022_JP_2.decode(&encoded, DecoderTrap::Strict).unwrap(), text);
        assert!(ISO_2022_JP.encode(text, EncoderTrap::Strict).is_err());
    }

    #[test]
    fn test_encode_ends_in_ascii() {
        assert_eq!(ISO_2022_JP.encode("\u{3042}", EncoderTrap::Strict),
                   Ok(b"\x1b$B\x24\x22\x1b(B".to_vec()));
        assert_eq!(JIS7.encode("\u{ff71}", EncoderTrap::Strict), Ok(b"\x0e\x31\x0f".to_vec()));
        assert_eq!(ISO_2022_JP.encode("", EncoderTrap::Strict), Ok(Vec::new()));
    }

    #[test]
    fn test_encoder_traps() {
        let e = ISO_2022_JP;
        assert_eq!(e.encode("A\u{ac00}B", EncoderTrap::Strict),
                   Err(CodecError { upto: 2, cause: "unrepresentable character".into() }));
        assert_eq!(e.encode("A\u{ac00}B", EncoderTrap::Replace), Ok(b"A\x1aB".to_vec()));
        assert_eq!(e.encode("A\u{ac00}B", EncoderTrap::Ignore), Ok(b"AB".to_vec()));
        assert_eq!(e.encode("A\u{ac00}B", EncoderTrap::NcrEscape), Ok(b"A&#44032;B".to_vec()));
        assert_eq!(e.encode("\u{3042}\u{ac00}", EncoderTrap::Replace),
                   Ok(b"\x1b$B\x24\x22\x1b(B\x1a".to_vec()));
        assert_eq!(e.encode("\u{3042}\u{ac00}\u{3042}", EncoderTrap::NcrEscape),
                   Ok(b"\x1b$B\x24\x22\x1b(B&#44032;\x1b$B\x24\x22\x1b(B".to_vec()));
    }

    #[test]
    fn test_decoder_traps() {
        let e = ISO_2022_JP;
        assert_eq!(e.decode(b"A\x1b$ZB", DecoderTrap::Strict),
                   Err(CodecError { upto: 4, cause: "invalid sequence".into() }));
        assert_eq!(e.decode(b"A\x1b$ZB", DecoderTrap::Replace), Ok("A\u{fffd}B".to_string()));
        assert_eq!(e.decode(b"A\x1b$ZB", DecoderTrap::Ignore), Ok("AB".to_string()));
        assert_eq!(e.decode(b"\x1b$(D\x4b\x46", DecoderTrap::Strict),
                   Err(CodecError { upto: 4, cause: "unmapped sequence".into() }));
        assert_eq!(e.decode(b"\x1b$B\x24\x22\x24", DecoderTrap::Replace),
                   Ok("\u{3042}\u{fffd}".to_string()));
        assert_eq!(ISO_2022_JP_1.decode(b"\x1b$(D\x4b\x46", DecoderTrap::Strict),
                   Ok("\u{736c}".to_string()));
    }

    #[test]
    fn test_korean_and_chinese() {
        let kr = Iso2022Encoding::new("iso-2022-kr", Iso2022Config::new(Variant::Kr, 0).unwrap());
        let encoded = kr.encode("\u{ac00}\u{b098}\nA", EncoderTrap::Strict).unwrap();
        assert_eq!(encoded, b"\x1b$)C\x0e\x30\x21\x33\x2a\x0f\nA".to_vec());
        assert_eq!(kr.decode(&encoded, DecoderTrap::Strict).unwrap(), "\u{ac00}\u{b098}\nA");

        let cn = Iso2022Encoding::new("iso-2022-cn", Iso2022Config::new(Variant::Cn, 0).unwrap());
        let encoded = cn.encode("\u{554a}\r\n\u{554a}", EncoderTrap::Strict).unwrap();
        assert_eq!(cn.decode(&encoded, DecoderTrap::Strict).unwrap(), "\u{554a}\r\n\u{554a}");
    }

    #[test]
    fn test_names() {
        assert_eq!(ISO_2022_JP.name(), "iso-2022-jp");
        assert_eq!(ISO_2022_JP.whatwg_name(), Some("iso-2022-jp"));
        assert_eq!(ISO_2022_JP_2.whatwg_name(), None);
    }

    #[test]
    fn test_streams_are_independent() {
        let encoded = ISO_2022_JP.encode(JAPANESE_TEXT, EncoderTrap::Strict).unwrap();
        let handles: Vec<_> = (0..4).map(|_| {
            let encoded = encoded.clone();
            std::thread::spawn(move || ISO_2022_JP.decode(&encoded, DecoderTrap::Strict))
        }).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), JAPANESE_TEXT);
        }
    }
}
