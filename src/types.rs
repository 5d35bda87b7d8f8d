// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

/*!
 * Interface to the ISO-2022 codecs.
 *
 * # Raw incremental interface
 *
 * Methods which name starts with `raw_` constitute the raw incremental interface,
 * the lowest-available API for encoders and decoders.
 * Each call reads from an input cursor and writes into a fixed-size output buffer,
 * processing as much as both allow, and reports why it stopped:
 *
 * - `Underflow`: every complete character of the input has been processed.
 *   The input cursor is left at the start of any incomplete trailing sequence,
 *   which the caller should feed again together with more input.
 * - `Overflow`: the output buffer cannot hold the next character.
 *   Both positions are left at the start of that character;
 *   the caller should drain the output and call again.
 * - `Malformed(n)` and `Unmappable(n)`: the `n` units starting at the input cursor
 *   are in error. The caller should skip (and possibly replace) them to continue.
 *
 * The engines never hold back partial input, so the cursor positions are
 * always exact recovery points.
 */

use std::borrow::Cow;
use thiserror::Error;

/// The reason an incremental conversion call returned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CoderResult {
    /// More input is needed.
    Underflow,
    /// More output room is needed.
    Overflow,
    /// An invalid sequence of given length at the input cursor.
    Malformed(usize),
    /// A valid sequence of given length at the input cursor that cannot be converted.
    Unmappable(usize),
}

impl CoderResult {
    pub fn is_underflow(&self) -> bool {
        *self == CoderResult::Underflow
    }

    pub fn is_overflow(&self) -> bool {
        *self == CoderResult::Overflow
    }

    pub fn is_error(&self) -> bool {
        matches!(*self, CoderResult::Malformed(_) | CoderResult::Unmappable(_))
    }

    /// The length of the erroneous sequence, if any.
    pub fn length(&self) -> Option<usize> {
        match *self {
            CoderResult::Malformed(n) | CoderResult::Unmappable(n) => Some(n),
            _ => None,
        }
    }
}

/// Error information from the one-shot `Encoding::encode` and `Encoding::decode`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("{cause} at {upto}")]
pub struct CodecError {
    /// The position of the first unit after the erroneous sequence,
    /// in bytes (decoding) or UTF-16 units (encoding) of the whole input.
    pub upto: usize,
    /// A human-readable cause of the error.
    pub cause: Cow<'static, str>,
}

/// A read position over a borrowed input slice.
#[derive(Clone, Debug)]
pub struct InputCursor<'a, T> {
    data: &'a [T],
    pos: usize,
}

/// Encoded input.
pub type ByteCursor<'a> = InputCursor<'a, u8>;
/// Unicode input, as UTF-16 code units.
pub type Utf16Cursor<'a> = InputCursor<'a, u16>;

impl<'a, T: Copy> InputCursor<'a, T> {
    pub fn new(data: &'a [T]) -> InputCursor<'a, T> {
        InputCursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewinds (or skips) to an absolute position, clamped to the input length.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    pub fn advance(&mut self, n: usize) {
        self.set_position(self.pos + n);
    }

    pub fn peek(&self) -> Option<T> {
        self.data.get(self.pos).cloned()
    }

    /// Returns the next unit and advances past it.
    pub fn get(&mut self) -> Option<T> {
        let next = self.peek();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    /// The not yet processed part of the input.
    pub fn remaining(&self) -> &'a [T] {
        &self.data[self.pos..]
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }
}

/// A write position over a borrowed, fixed-size output slice.
#[derive(Debug)]
pub struct OutputBuffer<'a, T> {
    data: &'a mut [T],
    pos: usize,
}

/// Encoded output.
pub type ByteBuffer<'a> = OutputBuffer<'a, u8>;
/// Unicode output, as UTF-16 code units.
pub type Utf16Buffer<'a> = OutputBuffer<'a, u16>;

impl<'a, T: Copy> OutputBuffer<'a, T> {
    pub fn new(data: &'a mut [T]) -> OutputBuffer<'a, T> {
        OutputBuffer { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewinds to a position previously returned by `position`.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// The number of units that can still be written.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Writes all of `units`, or nothing if they do not fit.
    pub fn write_all(&mut self, units: &[T]) -> bool {
        if units.len() > self.remaining() {
            return false;
        }
        self.data[self.pos..self.pos + units.len()].copy_from_slice(units);
        self.pos += units.len();
        true
    }

    /// Everything written so far.
    pub fn written(&self) -> &[T] {
        &self.data[..self.pos]
    }
}

/// Encoder converting Unicode text into a byte sequence.
/// This is a lower level interface, and normally `Encoding::encode` should be used instead.
pub trait RawEncoder: Send + 'static {
    /// Creates a fresh `RawEncoder` instance which parameters are same as `self`.
    fn from_self(&self) -> Box<dyn RawEncoder>;

    /// Converts as much of `input` as fits into `output`.
    /// With `end_of_input`, a trailing incomplete surrogate is an error and
    /// the output is returned to the initial state once the input is exhausted.
    fn raw_feed(&mut self, input: &mut Utf16Cursor, output: &mut ByteBuffer,
                end_of_input: bool) -> CoderResult;

    /// Returns the output to the initial state. Either `Underflow` or `Overflow`.
    fn raw_finish(&mut self, output: &mut ByteBuffer) -> CoderResult;

    /// Writes the encoding's substitution sequence in place of an erroneous character.
    fn raw_write_substitution(&mut self, output: &mut ByteBuffer) -> CoderResult;

    /// Forgets all state, as if newly created.
    fn raw_reset(&mut self);

    /// A test-friendly interface to `raw_feed`. Internal use only.
    #[cfg(test)]
    fn test_feed(&mut self, input: &str) -> (CoderResult, usize, Vec<u8>) {
        let units: Vec<u16> = input.encode_utf16().collect();
        let mut buf = vec![0u8; units.len() * 12 + 16];
        let mut input = Utf16Cursor::new(&units);
        let mut output = ByteBuffer::new(&mut buf);
        let result = self.raw_feed(&mut input, &mut output, false);
        (result, input.position(), output.written().to_vec())
    }

    /// A test-friendly interface to `raw_finish`. Internal use only.
    #[cfg(test)]
    fn test_finish(&mut self) -> (CoderResult, Vec<u8>) {
        let mut buf = [0u8; 16];
        let mut output = ByteBuffer::new(&mut buf);
        let result = self.raw_finish(&mut output);
        (result, output.written().to_vec())
    }

    /// Concatenates two input sequences into one. Internal use only.
    #[cfg(test)]
    fn test_concat(&self, a: &str, b: &str) -> String {
        let mut s = a.to_string();
        s.push_str(b);
        s
    }

    /// The length of an input sequence in cursor units. Internal use only.
    #[cfg(test)]
    fn test_len(&self, s: &str) -> usize {
        s.encode_utf16().count()
    }
}

/// Decoder converting a byte sequence into Unicode text.
/// This is a lower level interface, and normally `Encoding::decode` should be used instead.
pub trait RawDecoder: Send + 'static {
    /// Creates a fresh `RawDecoder` instance which parameters are same as `self`.
    fn from_self(&self) -> Box<dyn RawDecoder>;

    /// Converts as much of `input` as fits into `output`.
    /// With `end_of_input`, a trailing incomplete sequence is an error
    /// instead of a request for more input.
    fn raw_feed(&mut self, input: &mut ByteCursor, output: &mut Utf16Buffer,
                end_of_input: bool) -> CoderResult;

    /// Forgets all state, as if newly created.
    fn raw_reset(&mut self);

    /// A test-friendly interface to `raw_feed`. Internal use only.
    #[cfg(test)]
    fn test_feed(&mut self, input: &[u8]) -> (CoderResult, usize, String) {
        self.test_feed_with(input, false)
    }

    /// Same as `test_feed` but marks the end of input. Internal use only.
    #[cfg(test)]
    fn test_feed_last(&mut self, input: &[u8]) -> (CoderResult, usize, String) {
        self.test_feed_with(input, true)
    }

    #[cfg(test)]
    fn test_feed_with(&mut self, input: &[u8], end_of_input: bool) -> (CoderResult, usize, String) {
        let mut buf = vec![0u16; input.len() * 2 + 4];
        let mut input = ByteCursor::new(input);
        let mut output = Utf16Buffer::new(&mut buf);
        let result = self.raw_feed(&mut input, &mut output, end_of_input);
        let decoded = String::from_utf16(output.written()).unwrap();
        (result, input.position(), decoded)
    }

    /// Concatenates two input sequences into one. Internal use only.
    #[cfg(test)]
    fn test_concat(&self, a: &[u8], b: &[u8]) -> Vec<u8> {
        let mut v = Vec::with_capacity(a.len() + b.len());
        v.extend_from_slice(a);
        v.extend_from_slice(b);
        v
    }

    /// The length of an input sequence in cursor units. Internal use only.
    #[cfg(test)]
    fn test_len(&self, s: &[u8]) -> usize {
        s.len()
    }
}

/// A trait object using dynamic dispatch which is a sendable reference to the encoding,
/// for code where the encoding is not known at compile-time.
pub type EncodingRef = &'static (dyn Encoding + Send + Sync);

/// Size of the intermediate buffers used by the one-shot interface.
const CHUNK_SIZE: usize = 256;

/// Character encoding.
pub trait Encoding {
    /// Returns the canonical name of given encoding.
    fn name(&self) -> &'static str;

    /// Returns a name of given encoding defined in the WHATWG Encoding standard, if any.
    fn whatwg_name(&self) -> Option<&'static str> { None }

    /// Creates a new encoder.
    fn raw_encoder(&self) -> Box<dyn RawEncoder>;

    /// Creates a new decoder.
    fn raw_decoder(&self) -> Box<dyn RawDecoder>;

    /// An easy-to-use interface to `RawEncoder`.
    /// On the encoder error `trap` decides whether to go on, and what to write instead.
    fn encode(&self, input: &str, trap: EncoderTrap) -> Result<Vec<u8>, CodecError> {
        let units: Vec<u16> = input.encode_utf16().collect();
        let mut encoder = self.raw_encoder();
        let mut input = Utf16Cursor::new(&units);
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut ret = Vec::with_capacity(units.len());

        loop {
            let mut output = ByteBuffer::new(&mut chunk);
            let result = encoder.raw_feed(&mut input, &mut output, true);
            ret.extend_from_slice(output.written());
            match result {
                CoderResult::Underflow => return Ok(ret),
                CoderResult::Overflow => {}
                CoderResult::Malformed(n) | CoderResult::Unmappable(n) => {
                    let start = input.position();
                    let upto = start + n;
                    input.set_position(upto);
                    if !trap.trap(&mut *encoder, &units[start..upto], &mut ret) {
                        let cause = match result {
                            CoderResult::Malformed(_) => "unpaired surrogate",
                            _ => "unrepresentable character",
                        };
                        return Err(CodecError { upto, cause: cause.into() });
                    }
                }
            }
        }
    }

    /// An easy-to-use interface to `RawDecoder`.
    /// On the decoder error `trap` decides whether to go on, and what to write instead.
    fn decode(&self, input: &[u8], trap: DecoderTrap) -> Result<String, CodecError> {
        let mut decoder = self.raw_decoder();
        let mut cursor = ByteCursor::new(input);
        let mut chunk = [0u16; CHUNK_SIZE];
        let mut units: Vec<u16> = Vec::with_capacity(input.len());

        loop {
            let mut output = Utf16Buffer::new(&mut chunk);
            let result = decoder.raw_feed(&mut cursor, &mut output, true);
            units.extend_from_slice(output.written());
            match result {
                CoderResult::Underflow => break,
                CoderResult::Overflow => {}
                CoderResult::Malformed(n) | CoderResult::Unmappable(n) => {
                    let upto = cursor.position() + n;
                    cursor.set_position(upto);
                    if !trap.trap(&mut units) {
                        let cause = match result {
                            CoderResult::Malformed(_) => "invalid sequence",
                            _ => "unmapped sequence",
                        };
                        return Err(CodecError { upto, cause: cause.into() });
                    }
                }
            }
        }

        String::from_utf16(&units).map_err(|_| CodecError {
            upto: input.len(), cause: "invalid UTF-16 output".into()
        })
    }
}

/// Trap, which handles decoder errors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DecoderTrap {
    /// Immediately fails on errors.
    Strict,
    /// Replaces an error with a U+FFFD.
    Replace,
    /// Silently ignores an error, effectively replacing it with an empty sequence.
    Ignore,
}

impl DecoderTrap {
    /// Handles a decoder error. May write to the output.
    /// Returns true only when it is fine to keep going.
    fn trap(&self, output: &mut Vec<u16>) -> bool {
        match *self {
            DecoderTrap::Strict => false,
            DecoderTrap::Replace => { output.push(0xfffd); true }
            DecoderTrap::Ignore => true,
        }
    }
}

/// Trap, which handles encoder errors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EncoderTrap {
    /// Immediately fails on errors.
    Strict,
    /// Replaces an error with the encoding's substitution byte.
    Replace,
    /// Silently ignores an error, effectively replacing it with an empty sequence.
    Ignore,
    /// Replaces an error with XML numeric character references (e.g. `&#1234;`).
    /// The replacement is encoded with the same encoder.
    NcrEscape,
}

impl EncoderTrap {
    /// Handles an encoder error for the UTF-16 units `input`. May write to the output.
    /// Returns true only when it is fine to keep going.
    fn trap(&self, encoder: &mut dyn RawEncoder, input: &[u16], output: &mut Vec<u8>) -> bool {
        fn drain<F>(output: &mut Vec<u8>, mut f: F) -> CoderResult
                where F: FnMut(&mut ByteBuffer) -> CoderResult {
            let mut chunk = [0u8; CHUNK_SIZE];
            loop {
                let mut buf = ByteBuffer::new(&mut chunk);
                let result = f(&mut buf);
                output.extend_from_slice(buf.written());
                if !result.is_overflow() {
                    return result;
                }
            }
        }

        match *self {
            EncoderTrap::Strict => false,
            EncoderTrap::Replace => {
                drain(output, |buf| encoder.raw_write_substitution(buf)).is_underflow()
            }
            EncoderTrap::Ignore => true,
            EncoderTrap::NcrEscape => {
                let mut escapes = String::new();
                for ch in char::decode_utf16(input.iter().cloned()) {
                    let scalar = ch.map(|c| c as u32).unwrap_or_else(|e| e.unpaired_surrogate() as u32);
                    escapes.push_str(&format!("&#{};", scalar));
                }
                let units: Vec<u16> = escapes.encode_utf16().collect();
                let mut input = Utf16Cursor::new(&units);
                drain(output, |buf| encoder.raw_feed(&mut input, buf, false)).is_underflow() &&
                    !input.has_remaining()
            }
        }
    }
}
