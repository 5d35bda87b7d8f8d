// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! ISO-2022 decoder engine.

use crate::charset::{Iso2022Config, SubCharset, Variant, JIS8};
use crate::codec::escape::{self, MatchStep};
use crate::codec::state::Iso2022State;
use crate::codec::variant::{self, EscapeError};
use crate::index::TablesRef;
use crate::types::{ByteCursor, CoderResult, RawDecoder, Utf16Buffer};
use crate::util::{self, ESC, SI, SO};

fn is_gl94(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

/// A streaming ISO-2022 decoder.
///
/// Incomplete sequences at the end of the input are never buffered;
/// the input cursor is rewound to their start and `Underflow` is returned.
#[derive(Clone)]
pub struct Iso2022Decoder {
    config: Iso2022Config,
    tables: TablesRef,
    state: Iso2022State,
    /// An escape sequence was the last thing decoded (for the empty segment check).
    after_escape: bool,
}

impl Iso2022Decoder {
    pub fn new(config: Iso2022Config, tables: TablesRef) -> Iso2022Decoder {
        Iso2022Decoder { config, tables, state: Iso2022State::new(), after_escape: false }
    }

    pub fn state(&self) -> &Iso2022State {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.after_escape = false;
    }

    /// Decodes as much of `input` as fits into `output`.
    /// On `Malformed` or `Unmappable` the cursor is at the offending sequence.
    pub fn decode(&mut self, input: &mut ByteCursor, output: &mut Utf16Buffer,
                  end_of_input: bool) -> CoderResult {
        let Iso2022Config { variant, version, .. } = self.config;

        loop {
            let b = match input.peek() {
                Some(b) => b,
                None => return CoderResult::Underflow,
            };

            if b == ESC {
                if let Some(result) = self.escape(input, end_of_input) {
                    return result;
                }
                continue;
            }

            if (b == SO || b == SI) && variant::shifts_enabled(variant, version) {
                if !variant::apply_shift(variant, b, &mut self.state) {
                    log::debug!("shift {:#04x} into an undesignated register", b);
                    return CoderResult::Malformed(1);
                }
                input.advance(1);
                continue;
            }

            let saved = self.state;
            if util::is_newline(b as u32) {
                variant::decoder_line_end(variant, &mut self.state);
            }

            let (scalar, len) = match self.next_char(input.remaining(), end_of_input) {
                Ok(Some(decoded)) => decoded,
                Ok(None) => {
                    self.state = saved;
                    return CoderResult::Underflow;
                }
                Err(err) => {
                    self.state.end_single_shift();
                    self.after_escape = false;
                    return err;
                }
            };

            if !util::write_scalar(output, scalar) {
                self.state = saved;
                return CoderResult::Overflow;
            }
            input.advance(len);
            self.state.end_single_shift();
            self.after_escape = false;
        }
    }

    /// Handles the escape sequence at the cursor.
    /// Returns `None` if the sequence was applied and decoding can go on.
    fn escape(&mut self, input: &mut ByteCursor, end_of_input: bool) -> Option<CoderResult> {
        let Iso2022Config { variant, version, .. } = self.config;
        let bytes = input.remaining();

        let (escape, len) = match escape::match_escape(bytes) {
            MatchStep::Complete(escape, len) => (escape, len),
            MatchStep::Incomplete(partial) => {
                if end_of_input {
                    log::debug!("truncated escape sequence {:02x?}", bytes);
                    self.after_escape = false;
                    return Some(CoderResult::Malformed(partial.len()));
                }
                // wait for the rest without consuming the prefix
                return Some(CoderResult::Underflow);
            }
            MatchStep::Invalid(mut len) => {
                // a byte that cannot continue an escape sequence is left for the text run
                let last = bytes[len - 1];
                if len > 1 && (last == ESC || !escape::is_escape_byte(last)) {
                    len -= 1;
                }
                log::debug!("invalid escape sequence {:02x?}", &bytes[..len]);
                self.after_escape = false;
                return Some(CoderResult::Malformed(len));
            }
        };

        let empty_segment = self.after_escape && variant == Variant::Jp && version == 0;
        let result = match variant::apply_escape(variant, version, escape, &mut self.state) {
            Ok(()) if empty_segment => {
                // the designation stays in effect; the caller skips the sequence
                log::debug!("escape sequence {:02x?} follows an empty segment", &bytes[..len]);
                CoderResult::Malformed(len)
            }
            Ok(()) => {
                input.advance(len);
                self.after_escape = true;
                return None;
            }
            Err(EscapeError::Illegal) => {
                log::debug!("illegal escape sequence {:02x?}", &bytes[..len]);
                CoderResult::Malformed(len)
            }
            Err(EscapeError::Unsupported) => {
                log::debug!("unsupported escape sequence {:02x?}", &bytes[..len]);
                CoderResult::Unmappable(len)
            }
        };
        self.after_escape = false;
        Some(result)
    }

    /// Decodes the character at the start of `bytes` through the invoked register.
    /// `Ok(None)` means the character is incomplete.
    fn next_char(&self, bytes: &[u8], end_of_input: bool)
                -> Result<Option<(u32, usize)>, CoderResult> {
        let Iso2022Config { variant, version, .. } = self.config;
        let b = bytes[0];
        let cs = self.state.active_charset();

        if variant == Variant::Jp && version == JIS8 && (0xa1..=0xdf).contains(&b) &&
           !cs.is_double_byte() {
            return Ok(Some((b as u32 - 0xa1 + 0xff61, 1)));
        }

        if cs == SubCharset::None {
            log::debug!("byte {:#04x} in undesignated register {:?}", b, self.state.active());
            return Err(CoderResult::Malformed(1));
        }

        if !cs.is_double_byte() {
            if b > 0x7f {
                return Err(CoderResult::Malformed(1));
            }
            return match self.tables.decode_one(cs, &bytes[..1]) {
                Ok(decoded) => Ok(Some(decoded)),
                Err(_) => Err(CoderResult::Unmappable(1)),
            };
        }

        let trail = match bytes.get(1) {
            Some(&trail) => trail,
            None if end_of_input => return Err(CoderResult::Malformed(1)),
            None => return Ok(None),
        };
        if is_gl94(b) && is_gl94(trail) {
            match self.tables.decode_one(cs, &bytes[..2]) {
                Ok(decoded) => Ok(Some(decoded)),
                Err(_) => Err(CoderResult::Unmappable(2)),
            }
        } else if is_gl94(trail) || util::is_2022_control(trail) {
            // the trail byte may start the next character
            Err(CoderResult::Malformed(1))
        } else {
            Err(CoderResult::Malformed(2))
        }
    }
}

impl RawDecoder for Iso2022Decoder {
    fn from_self(&self) -> Box<dyn RawDecoder> {
        Box::new(Iso2022Decoder::new(self.config, self.tables))
    }

    fn raw_feed(&mut self, input: &mut ByteCursor, output: &mut Utf16Buffer,
                end_of_input: bool) -> CoderResult {
        self.decode(input, output, end_of_input)
    }

    fn raw_reset(&mut self) {
        self.reset();
    }
}
