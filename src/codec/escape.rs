// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! ISO-2022 escape sequence table and the incremental matcher over it.
//!
//! Every byte that may occur in a recognized escape sequence is normalized
//! into a 5-bit digit, and a sequence of up to 6 bytes is packed into a key
//! as `key = (key << 5) + digit`. Every proper prefix of a recognized
//! sequence is in the table as well, so the matcher only ever needs an
//! exact lookup of the key accumulated so far.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// The longest recognized escape sequence, in bytes.
pub const MAX_ESCAPE_LEN: usize = 6;

/// Bytes in the order of their normalized digits, starting at 1.
const ESCAPE_ALPHABET: &[u8] = b"\x1b(-$@/%ABCDEFGHIJKLMRZ.)N*+O&";

/// Byte to 5-bit digit. Bytes that never occur in an escape sequence map to 0.
static NORMALIZE: [u8; 256] = build_normalize_table();

const fn build_normalize_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < ESCAPE_ALPHABET.len() {
        table[ESCAPE_ALPHABET[i] as usize] = (i + 1) as u8;
        i += 1;
    }
    table
}

/// The meaning of a complete escape sequence, independent of the ISO-2022 variant.
/// The payload is the final byte that identifies the charset.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Escape {
    /// `ESC N`
    SingleShift2,
    /// `ESC O`
    SingleShift3,
    /// `ESC ( F`: 94-charset into G0.
    G0Set94(u8),
    /// `ESC $ F`: 94x94-charset into G0, short form for `@`, `A` and `B`.
    G0Set94x94Short(u8),
    /// `ESC $ ( F`
    G0Set94x94(u8),
    /// `ESC $ ) F`
    G1Set94x94(u8),
    /// `ESC $ * F`
    G2Set94x94(u8),
    /// `ESC $ + F`
    G3Set94x94(u8),
    /// `ESC . F`: 96-charset into G2.
    G2Set96(u8),
    /// `ESC & @`: revision announcer, always followed by a designation.
    Revision,
    /// `ESC % F`: designate other coding system, with return.
    Docs(u8),
    /// `ESC % / F`: designate other coding system, without return.
    DocsNoReturn(u8),
    /// `ESC ( B ESC - F`: ASCII into G0 and a 96-charset into G1.
    AsciiAndG1Set96(u8),
}

/// Classification of a packed key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Classification {
    Invalid,
    /// A proper prefix of some recognized sequence.
    Incomplete,
    /// A recognized sequence which is not a prefix of any other.
    Terminal,
    /// A recognized sequence which is also a prefix of a longer one.
    AmbiguousTerminal,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EscapeTableEntry {
    pub key: u32,
    pub class: Classification,
    /// Only meaningful for `Terminal` and `AmbiguousTerminal`.
    pub meaning: Option<Escape>,
}

fn single_shift_2(_: u8) -> Escape { Escape::SingleShift2 }
fn single_shift_3(_: u8) -> Escape { Escape::SingleShift3 }
fn revision(_: u8) -> Escape { Escape::Revision }

/// `(prefix, final bytes, meaning)` for each family of recognized sequences.
static SEQUENCES: &[(&[u8], &[u8], fn(u8) -> Escape)] = &[
    (b"\x1b", b"N", single_shift_2),
    (b"\x1b", b"O", single_shift_3),
    (b"\x1b(", b"@ABCDEFGHIJKR", Escape::G0Set94),
    (b"\x1b$", b"@AB", Escape::G0Set94x94Short),
    (b"\x1b$(", b"@ABCDEGHIJKLM", Escape::G0Set94x94),
    (b"\x1b$)", b"ACEG", Escape::G1Set94x94),
    (b"\x1b$*", b"H", Escape::G2Set94x94),
    (b"\x1b$+", b"IJKLM", Escape::G3Set94x94),
    (b"\x1b.", b"AF", Escape::G2Set96),
    (b"\x1b&", b"@", revision),
    (b"\x1b%", b"B", Escape::Docs),
    (b"\x1b%/", b"@ACDEF", Escape::DocsNoReturn),
    (b"\x1b(B\x1b-", b"ABCDFGHLMZ", Escape::AsciiAndG1Set96),
];

fn pack(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |key, &b| (key << 5) + NORMALIZE[b as usize] as u32)
}

fn build_table() -> Vec<EscapeTableEntry> {
    let mut entries: BTreeMap<u32, (Classification, Option<Escape>)> = BTreeMap::new();
    for &(prefix, finals, meaning) in SEQUENCES {
        for &fin in finals {
            let full = pack(prefix) << 5 | NORMALIZE[fin as usize] as u32;
            let entry = entries.entry(full).or_insert((Classification::Terminal, Some(meaning(fin))));
            if entry.0 == Classification::Incomplete {
                *entry = (Classification::AmbiguousTerminal, Some(meaning(fin)));
            }
        }
        for n in 1..=prefix.len() {
            let entry = entries.entry(pack(&prefix[..n])).or_insert((Classification::Incomplete, None));
            if entry.0 == Classification::Terminal {
                entry.0 = Classification::AmbiguousTerminal;
            }
        }
    }
    entries.into_iter()
           .map(|(key, (class, meaning))| EscapeTableEntry { key, class, meaning })
           .collect()
}

/// The table of all recognized keys, sorted by key.
pub static ESCAPE_TABLE: Lazy<Vec<EscapeTableEntry>> = Lazy::new(build_table);

/// Looks up a packed key.
pub fn lookup(key: u32) -> Option<&'static EscapeTableEntry> {
    let table: &'static [EscapeTableEntry] = &ESCAPE_TABLE;
    table.binary_search_by_key(&key, |e| e.key).ok().map(|i| &table[i])
}

/// The matcher state between two bytes of an escape sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PartialMatch {
    key: u32,
    len: u8,
}

impl PartialMatch {
    /// Nothing matched yet; the next byte should be ESC.
    pub const START: PartialMatch = PartialMatch { key: 0, len: 0 };

    /// Number of bytes matched so far.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The result of feeding one byte to the matcher.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatchStep {
    /// A valid prefix; feed the next byte with the new state.
    Incomplete(PartialMatch),
    /// No recognized sequence starts with these bytes.
    /// The length counts every byte fed, including the offending one.
    Invalid(usize),
    /// A recognized sequence and its length.
    Complete(Escape, usize),
}

/// Feeds one byte to the matcher. Never allocates.
///
/// An ambiguous terminal (`ESC ( B`, also a prefix of `ESC ( B ESC - F`)
/// completes immediately without looking ahead.
pub fn advance(partial: PartialMatch, byte: u8) -> MatchStep {
    let len = partial.len() + 1;
    let digit = NORMALIZE[byte as usize];
    if digit == 0 || len > MAX_ESCAPE_LEN {
        return MatchStep::Invalid(len);
    }
    let key = (partial.key << 5) + digit as u32;
    match lookup(key) {
        Some(&EscapeTableEntry { class: Classification::Incomplete, .. }) =>
            MatchStep::Incomplete(PartialMatch { key, len: len as u8 }),
        Some(&EscapeTableEntry { meaning: Some(meaning), .. }) => MatchStep::Complete(meaning, len),
        _ => MatchStep::Invalid(len),
    }
}

/// True if `byte` can occur somewhere in a recognized escape sequence.
pub fn is_escape_byte(byte: u8) -> bool {
    NORMALIZE[byte as usize] != 0
}

/// Runs the matcher over the start of `input`, which should begin with ESC.
/// `Incomplete` means the input ran out before a decision.
pub fn match_escape(input: &[u8]) -> MatchStep {
    let mut partial = PartialMatch::START;
    for &b in input {
        match advance(partial, b) {
            MatchStep::Incomplete(next) => partial = next,
            step => return step,
        }
    }
    MatchStep::Incomplete(partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        assert_eq!(ESCAPE_TABLE.len(), 74);
        assert!(ESCAPE_TABLE.windows(2).all(|w| w[0].key < w[1].key));
        let count = |class| ESCAPE_TABLE.iter().filter(|e| e.class == class).count();
        assert_eq!(count(Classification::Incomplete), 13);
        assert_eq!(count(Classification::Terminal), 60);
        assert_eq!(count(Classification::AmbiguousTerminal), 1);
        assert_eq!(lookup(pack(b"\x1b(B")).map(|e| e.class), Some(Classification::AmbiguousTerminal));
        assert_eq!(lookup(pack(b"\x1b$(")).map(|e| e.class), Some(Classification::Incomplete));
        assert_eq!(lookup(pack(b"\x1b$(F")), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(NORMALIZE[0x1b], 1);
        assert_eq!(NORMALIZE[b'&' as usize], 29);
        assert_eq!(NORMALIZE[b'a' as usize], 0);
        assert_eq!(NORMALIZE[0x0a], 0);
    }

    #[test]
    fn test_complete() {
        assert_eq!(match_escape(b"\x1b$B\x24\x22"), MatchStep::Complete(Escape::G0Set94x94Short(b'B'), 3));
        assert_eq!(match_escape(b"\x1b(B"), MatchStep::Complete(Escape::G0Set94(b'B'), 3));
        assert_eq!(match_escape(b"\x1b$(D"), MatchStep::Complete(Escape::G0Set94x94(b'D'), 4));
        assert_eq!(match_escape(b"\x1b.A"), MatchStep::Complete(Escape::G2Set96(b'A'), 3));
        assert_eq!(match_escape(b"\x1bN"), MatchStep::Complete(Escape::SingleShift2, 2));
        assert_eq!(match_escape(b"\x1b&@"), MatchStep::Complete(Escape::Revision, 3));
        assert_eq!(match_escape(b"\x1b%/F"), MatchStep::Complete(Escape::DocsNoReturn(b'F'), 4));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(match_escape(b"\x1bx"), MatchStep::Invalid(2));
        assert_eq!(match_escape(b"\x1b$Z"), MatchStep::Invalid(3));
        assert_eq!(match_escape(b"\x1b$(\x1b"), MatchStep::Invalid(4));
        assert_eq!(match_escape(b"A"), MatchStep::Invalid(1));
    }

    #[test]
    fn test_incomplete() {
        let partial = match match_escape(b"\x1b$(") {
            MatchStep::Incomplete(partial) => partial,
            step => panic!("unexpected {:?}", step),
        };
        assert_eq!(partial.len(), 3);
        assert_eq!(advance(partial, b'C'), MatchStep::Complete(Escape::G0Set94x94(b'C'), 4));
        assert_eq!(match_escape(b""), MatchStep::Incomplete(PartialMatch::START));
        assert!(PartialMatch::START.is_empty());
        assert!(is_escape_byte(b'$') && !is_escape_byte(b'\n'));
    }

    #[test]
    fn test_every_sequence_matches() {
        for &(prefix, finals, meaning) in SEQUENCES {
            for &fin in finals {
                let mut seq = prefix.to_vec();
                seq.push(fin);
                let expected = if prefix == b"\x1b(B\x1b-" {
                    // shadowed by the ambiguous `ESC ( B`
                    MatchStep::Complete(Escape::G0Set94(b'B'), 3)
                } else {
                    MatchStep::Complete(meaning(fin), seq.len())
                };
                assert_eq!(match_escape(&seq), expected, "{:?}", seq);
            }
        }
    }
}
