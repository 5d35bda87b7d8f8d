// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! ISO-2022 encoder engine.

use crate::charset::{legal_subcharsets, Iso2022Config, SubCharset, Variant, JIS7, JIS8,
                     PREFERENCE_ORDER};
use crate::codec::state::{Iso2022State, Register};
use crate::codec::variant;
use crate::index::{MappedBytes, TablesRef};
use crate::types::{ByteBuffer, CoderResult, RawEncoder, Utf16Cursor};
use crate::util::{self, ReadScalar, Staging, ESC, SI, SO};

const SUBSTITUTION: u8 = 0x1a;
const ASCII_ESCAPE: &[u8] = b"\x1b(B";

/// Candidate sub-charsets in the order they are tried, each at most once.
#[derive(Clone, Copy, Debug)]
struct PreferenceList {
    items: [SubCharset; 10],
    len: usize,
}

impl PreferenceList {
    fn new() -> PreferenceList {
        PreferenceList { items: [SubCharset::None; 10], len: 0 }
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn as_slice(&self) -> &[SubCharset] {
        &self.items[..self.len]
    }

    fn push(&mut self, cs: SubCharset) {
        if cs != SubCharset::None && self.len < self.items.len() && !self.as_slice().contains(&cs) {
            self.items[self.len] = cs;
            self.len += 1;
        }
    }
}

/// A streaming ISO-2022 encoder.
///
/// Every character is written together with the shift and designation bytes
/// it needs, or not at all.
#[derive(Clone)]
pub struct Iso2022Encoder {
    config: Iso2022Config,
    tables: TablesRef,
    state: Iso2022State,
    /// Rebuilt lazily; emptied whenever a designation changes.
    choices: PreferenceList,
}

impl Iso2022Encoder {
    pub fn new(config: Iso2022Config, tables: TablesRef) -> Iso2022Encoder {
        Iso2022Encoder {
            config,
            tables,
            state: Iso2022State::new(),
            choices: PreferenceList::new(),
        }
    }

    pub fn state(&self) -> &Iso2022State {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.choices.clear();
    }

    /// Encodes as much of `input` as fits into `output`.
    /// With `end_of_input` the output is returned to ASCII once the input is exhausted.
    pub fn encode(&mut self, input: &mut Utf16Cursor, output: &mut ByteBuffer,
                  end_of_input: bool) -> CoderResult {
        loop {
            let (scalar, len) = match util::read_scalar(input.remaining(), end_of_input) {
                ReadScalar::Scalar(scalar, len) => (scalar, len),
                ReadScalar::Empty if end_of_input => return self.flush(output),
                ReadScalar::Empty | ReadScalar::NeedMore => return CoderResult::Underflow,
                ReadScalar::Unpaired => return CoderResult::Malformed(1),
            };

            if scalar <= 0xff && util::is_2022_control(scalar as u8) {
                return CoderResult::Unmappable(len);
            }

            let (cs, reg, bytes) = match self.select(scalar) {
                Some(selected) => selected,
                None => return CoderResult::Unmappable(len),
            };

            let saved = self.state;
            let mut staging = Staging::new();
            self.switch_to(&mut staging, cs, reg);
            staging.push(bytes.as_slice());
            if util::is_newline(scalar) {
                variant::encoder_line_end(self.config.variant, &mut self.state);
                self.choices.clear();
            }

            if !output.write_all(staging.as_slice()) {
                self.state = saved;
                return CoderResult::Overflow;
            }
            input.advance(len);
        }
    }

    /// Returns to ASCII in G0 and the G0 register invoked. Does nothing if already there.
    pub fn flush(&mut self, output: &mut ByteBuffer) -> CoderResult {
        let saved = self.state;
        let mut staging = Staging::new();
        if self.state.active() != Register::G0 {
            staging.push(&[SI]);
            self.state.lock_shift(Register::G0);
        }
        if self.state.designation(Register::G0) != SubCharset::Ascii {
            staging.push(ASCII_ESCAPE);
            self.state.designate(Register::G0, SubCharset::Ascii);
            self.choices.clear();
        }
        if !output.write_all(staging.as_slice()) {
            self.state = saved;
            return CoderResult::Overflow;
        }
        CoderResult::Underflow
    }

    /// Writes the substitution byte from a single-byte G0 state.
    pub fn write_substitution(&mut self, output: &mut ByteBuffer) -> CoderResult {
        let saved = self.state;
        let mut staging = Staging::new();
        if self.state.active() == Register::G1 {
            staging.push(&[SI]);
            self.state.lock_shift(Register::G0);
        }
        let g0 = self.state.designation(Register::G0);
        if g0 != SubCharset::Ascii && g0 != SubCharset::JisX0201 {
            staging.push(ASCII_ESCAPE);
            self.state.designate(Register::G0, SubCharset::Ascii);
            self.choices.clear();
        }
        staging.push(&[SUBSTITUTION]);
        if !output.write_all(staging.as_slice()) {
            self.state = saved;
            return CoderResult::Overflow;
        }
        CoderResult::Underflow
    }

    fn rebuild_choices(&mut self) {
        let Iso2022Config { variant, version, .. } = self.config;
        let legal = legal_subcharsets(variant, version);

        self.choices.clear();
        if variant == Variant::Jp && (version == JIS7 || version == JIS8) {
            self.choices.push(SubCharset::HalfwidthKatakana);
        }
        for &reg in &[Register::G0, Register::G2] {
            let cs = self.state.designation(reg);
            if legal.has(cs) {
                self.choices.push(cs);
            }
        }
        for &cs in PREFERENCE_ORDER.iter() {
            if legal.has(cs) {
                self.choices.push(cs);
            }
        }
    }

    /// Finds the first candidate that can represent `scalar`.
    fn select(&mut self, scalar: u32) -> Option<(SubCharset, Register, MappedBytes)> {
        let Iso2022Config { variant, version, use_fallback } = self.config;
        if self.choices.is_empty() {
            self.rebuild_choices();
        }

        for &cs in self.choices.as_slice() {
            if cs == SubCharset::HalfwidthKatakana && variant == Variant::Jp && version == JIS8 {
                if !(0xff61..=0xff9f).contains(&scalar) {
                    continue;
                }
                // GR bytes work with any single-byte set in G0
                let g0 = self.state.designation(Register::G0);
                let g0 = if g0.is_double_byte() { SubCharset::JisX0201 } else { g0 };
                let byte = (scalar - 0xff61) as u8 + 0xa1;
                return Some((g0, Register::G0, MappedBytes::single(byte)));
            }
            if let Ok(bytes) = self.tables.encode_one(cs, scalar, use_fallback) {
                return Some((cs, variant::target_register(variant, version, cs), bytes));
            }
        }
        None
    }

    /// Stages the bytes that make `cs` in `reg` the charset of the next character.
    fn switch_to(&mut self, staging: &mut Staging, cs: SubCharset, reg: Register) {
        if reg == Register::G0 && self.state.active() == Register::G1 {
            staging.push(&[SI]);
            self.state.lock_shift(Register::G0);
        }
        if self.state.designation(reg) != cs {
            log::trace!("encoder designates {:?} into {:?}", cs, reg);
            staging.push(variant::designation_sequence(self.config.variant, reg, cs));
            self.state.designate(reg, cs);
            self.choices.clear();
        }
        match reg {
            Register::G1 if self.state.active() != Register::G1 => {
                staging.push(&[SO]);
                self.state.lock_shift(Register::G1);
            }
            Register::G2 => staging.push(&[ESC, b'N']),
            Register::G3 => staging.push(&[ESC, b'O']),
            _ => {}
        }
    }
}

impl RawEncoder for Iso2022Encoder {
    fn from_self(&self) -> Box<dyn RawEncoder> {
        Box::new(Iso2022Encoder::new(self.config, self.tables))
    }

    fn raw_feed(&mut self, input: &mut Utf16Cursor, output: &mut ByteBuffer,
                end_of_input: bool) -> CoderResult {
        self.encode(input, output, end_of_input)
    }

    fn raw_finish(&mut self, output: &mut ByteBuffer) -> CoderResult {
        self.flush(output)
    }

    fn raw_write_substitution(&mut self, output: &mut ByteBuffer) -> CoderResult {
        self.write_substitution(output)
    }

    fn raw_reset(&mut self) {
        self.reset();
    }
}
