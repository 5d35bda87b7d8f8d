// This is a part of rust-encoding.
// Copyright (c) 2013-2015, Kang Seonghoon.
// See README.md and LICENSE.txt for details.

//! Register designations and shift state shared by the ISO-2022 engines.

use crate::charset::SubCharset;

/// One of the four ISO-2022 graphic registers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Register {
    G0 = 0,
    G1 = 1,
    G2 = 2,
    G3 = 3,
}

impl Register {
    pub fn index(self) -> usize {
        self as usize
    }

    /// True for G2 and G3, which are only ever invoked by a single shift.
    pub fn is_single_shift(self) -> bool {
        self >= Register::G2
    }
}

/// Designations of G0..G3 and the invoked register.
///
/// This is a small value type: the engines snapshot it by copy before
/// emitting a character and restore it when the output buffer runs out.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Iso2022State {
    designation: [SubCharset; 4],
    active: Register,
    previous_active: Register,
}

impl Default for Iso2022State {
    fn default() -> Iso2022State {
        Iso2022State::new()
    }
}

impl Iso2022State {
    /// The initial state: ASCII in G0 and invoked, everything else undesignated.
    pub fn new() -> Iso2022State {
        Iso2022State {
            designation: [SubCharset::Ascii, SubCharset::None, SubCharset::None, SubCharset::None],
            active: Register::G0,
            previous_active: Register::G0,
        }
    }

    pub fn reset(&mut self) {
        *self = Iso2022State::new();
    }

    pub fn designation(&self, reg: Register) -> SubCharset {
        self.designation[reg.index()]
    }

    pub fn designate(&mut self, reg: Register, cs: SubCharset) {
        self.designation[reg.index()] = cs;
    }

    pub fn active(&self) -> Register {
        self.active
    }

    /// The charset of the invoked register, possibly `SubCharset::None`.
    pub fn active_charset(&self) -> SubCharset {
        self.designation(self.active)
    }

    /// Locking shift (SI/SO).
    pub fn lock_shift(&mut self, reg: Register) {
        self.active = reg;
    }

    /// Invokes G2 or G3 for a single character.
    /// Fails if the register has no designation.
    pub fn single_shift(&mut self, reg: Register) -> bool {
        if self.designation(reg) == SubCharset::None {
            return false;
        }
        if !self.active.is_single_shift() {
            self.previous_active = self.active;
        }
        self.active = reg;
        true
    }

    /// Returns from a single shift after one character; no-op under a locking shift.
    pub fn end_single_shift(&mut self) {
        if self.active.is_single_shift() {
            self.active = self.previous_active;
        }
    }
}
