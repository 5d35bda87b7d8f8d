// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! Variant-specific rules of ISO-2022-JP, -KR and -CN.
//!
//! Everything here is a pure function of the variant, the version,
//! and the state it updates; the engines own the control flow.

use crate::charset::{legal_subcharsets, SubCharset, Variant, JIS7};
use crate::codec::escape::Escape;
use crate::codec::state::{Iso2022State, Register};
use crate::util::SI;

/// Why a recognized escape sequence could not be applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EscapeError {
    /// The sequence is not permitted in the current state (e.g. SS2 with empty G2).
    Illegal,
    /// The sequence is valid ISO-2022 but not supported by this variant or version.
    Unsupported,
}

/// Maps a designation escape into the register and charset it selects.
fn designation_of(variant: Variant, escape: Escape) -> Option<(Register, SubCharset)> {
    let designation = match (variant, escape) {
        (Variant::Jp, Escape::G0Set94(b'B')) => (Register::G0, SubCharset::Ascii),
        (Variant::Jp, Escape::G0Set94(b'H')) |
        (Variant::Jp, Escape::G0Set94(b'J')) => (Register::G0, SubCharset::JisX0201),
        (Variant::Jp, Escape::G0Set94(b'I')) => (Register::G0, SubCharset::HalfwidthKatakana),
        (Variant::Jp, Escape::G0Set94x94Short(b'@')) |
        (Variant::Jp, Escape::G0Set94x94Short(b'B')) |
        (Variant::Jp, Escape::Revision) => (Register::G0, SubCharset::JisX0208),
        (Variant::Jp, Escape::G0Set94x94Short(b'A')) => (Register::G0, SubCharset::Gb2312),
        (Variant::Jp, Escape::G0Set94x94(b'C')) => (Register::G0, SubCharset::Ksc5601),
        (Variant::Jp, Escape::G0Set94x94(b'D')) => (Register::G0, SubCharset::JisX0212),
        (Variant::Jp, Escape::G2Set96(b'A')) => (Register::G2, SubCharset::Iso8859_1),
        (Variant::Jp, Escape::G2Set96(b'F')) => (Register::G2, SubCharset::Iso8859_7),
        (Variant::Kr, Escape::G1Set94x94(b'C')) => (Register::G1, SubCharset::Ksc5601),
        (Variant::Cn, Escape::G1Set94x94(b'A')) => (Register::G1, SubCharset::Gb2312),
        _ => return None,
    };
    Some(designation)
}

/// Applies a complete escape sequence to the decoder state.
pub fn apply_escape(variant: Variant, version: u8, escape: Escape, state: &mut Iso2022State)
                   -> Result<(), EscapeError> {
    let shift = match (variant, escape) {
        (Variant::Jp, Escape::SingleShift2) | (Variant::Cn, Escape::SingleShift2) => Some(Register::G2),
        (Variant::Cn, Escape::SingleShift3) => Some(Register::G3),
        _ => None,
    };
    if let Some(reg) = shift {
        return if state.single_shift(reg) { Ok(()) } else { Err(EscapeError::Illegal) };
    }

    match designation_of(variant, escape) {
        Some((reg, cs)) if legal_subcharsets(variant, version).has(cs) => {
            log::trace!("{:?} designated into {:?}", cs, reg);
            state.designate(reg, cs);
            Ok(())
        }
        _ => Err(EscapeError::Unsupported),
    }
}

/// True if SI and SO act as locking shifts rather than data.
pub fn shifts_enabled(variant: Variant, version: u8) -> bool {
    match variant {
        Variant::Jp => version == JIS7,
        Variant::Kr | Variant::Cn => true,
    }
}

/// Applies SI or SO to the decoder state. Fails if SO invokes an undesignated G1.
pub fn apply_shift(variant: Variant, byte: u8, state: &mut Iso2022State) -> bool {
    if byte == SI {
        state.lock_shift(Register::G0);
        return true;
    }
    if variant == Variant::Jp {
        // JIS7 has no designation sequence for G1; SO implies katakana.
        state.designate(Register::G1, SubCharset::HalfwidthKatakana);
    }
    if state.designation(Register::G1) == SubCharset::None {
        return false;
    }
    state.lock_shift(Register::G1);
    true
}

/// The automatic reset at CR or LF while decoding.
pub fn decoder_line_end(variant: Variant, state: &mut Iso2022State) {
    match variant {
        Variant::Jp => {
            let g0 = state.designation(Register::G0);
            if g0 != SubCharset::Ascii && g0 != SubCharset::JisX0201 {
                state.designate(Register::G0, SubCharset::Ascii);
            }
            state.designate(Register::G2, SubCharset::None);
        }
        Variant::Cn => {
            state.designate(Register::G1, SubCharset::None);
            state.designate(Register::G2, SubCharset::None);
            state.designate(Register::G3, SubCharset::None);
        }
        Variant::Kr => {}
    }
    state.lock_shift(Register::G0);
}

/// The reset after writing CR or LF while encoding.
/// Returns true if any designation was dropped.
pub fn encoder_line_end(variant: Variant, state: &mut Iso2022State) -> bool {
    let before = *state;
    match variant {
        Variant::Jp => state.designate(Register::G2, SubCharset::None),
        Variant::Cn => {
            state.designate(Register::G1, SubCharset::None);
            state.designate(Register::G2, SubCharset::None);
            state.designate(Register::G3, SubCharset::None);
        }
        Variant::Kr => {}
    }
    before != *state
}

/// The register the encoder writes `cs` through.
pub fn target_register(variant: Variant, version: u8, cs: SubCharset) -> Register {
    match (variant, cs) {
        (Variant::Jp, cs) if cs.is_96_set() => Register::G2,
        (Variant::Jp, SubCharset::HalfwidthKatakana) if version == JIS7 => Register::G1,
        (Variant::Kr, SubCharset::Ksc5601) | (Variant::Cn, SubCharset::Gb2312) => Register::G1,
        _ => Register::G0,
    }
}

/// The bytes the encoder writes to designate `cs` into `reg`.
pub fn designation_sequence(variant: Variant, reg: Register, cs: SubCharset) -> &'static [u8] {
    match (variant, reg, cs) {
        (Variant::Jp, Register::G1, SubCharset::HalfwidthKatakana) => b"",
        (Variant::Kr, Register::G1, SubCharset::Ksc5601) => b"\x1b$)C",
        (Variant::Cn, Register::G1, SubCharset::Gb2312) => b"\x1b$)A",
        _ => cs.escape(),
    }
}
