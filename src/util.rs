// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! Internal utilities.

use crate::types::Utf16Buffer;

pub const SO: u8 = 0x0e;
pub const SI: u8 = 0x0f;
pub const ESC: u8 = 0x1b;

/// Returns true for SO, SI and ESC, which would corrupt an ISO-2022 stream as data.
pub fn is_2022_control(b: u8) -> bool {
    matches!(b, SO | SI | ESC)
}

pub fn is_newline(scalar: u32) -> bool {
    scalar == 0x0a || scalar == 0x0d
}

/// The outcome of reading one scalar value from UTF-16 input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReadScalar {
    /// No input at all.
    Empty,
    /// A lead surrogate at the very end; its trail may follow later.
    NeedMore,
    /// A lone surrogate.
    Unpaired,
    /// A scalar value and the number of units it used.
    Scalar(u32, usize),
}

/// Reads the scalar value at the start of `units`, reassembling a surrogate pair.
pub fn read_scalar(units: &[u16], end_of_input: bool) -> ReadScalar {
    let lead = match units.first() {
        Some(&u) => u as u32,
        None => return ReadScalar::Empty,
    };
    match lead {
        0xd800..=0xdbff => match units.get(1) {
            Some(&trail) if (0xdc00..=0xdfff).contains(&trail) => {
                let scalar = 0x10000 + ((lead - 0xd800) << 10) + (trail as u32 - 0xdc00);
                ReadScalar::Scalar(scalar, 2)
            }
            Some(_) => ReadScalar::Unpaired,
            None if end_of_input => ReadScalar::Unpaired,
            None => ReadScalar::NeedMore,
        },
        0xdc00..=0xdfff => ReadScalar::Unpaired,
        _ => ReadScalar::Scalar(lead, 1),
    }
}

/// Writes a scalar value as UTF-16, or nothing if the whole of it does not fit.
pub fn write_scalar(output: &mut Utf16Buffer, scalar: u32) -> bool {
    if scalar >= 0x10000 {
        let c = scalar - 0x10000;
        output.write_all(&[(0xd800 + (c >> 10)) as u16, (0xdc00 + (c & 0x3ff)) as u16])
    } else {
        output.write_all(&[scalar as u16])
    }
}

/// A small fixed buffer where the encoder assembles shift, designation and
/// character bytes before writing them out at once.
#[derive(Clone, Copy, Debug)]
pub struct Staging {
    buf: [u8; 12],
    len: usize,
}

impl Staging {
    pub fn new() -> Staging {
        Staging { buf: [0; 12], len: 0 }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
