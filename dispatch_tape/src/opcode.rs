// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opcode byte values for the interpreter's instruction subset.
//!
//! This module is a small wrapper around generated opcode tables.

include!("opcodes_gen.rs");

impl Opcode {
    /// Returns the opcode byte value.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Parses an opcode from its byte value.
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        Self::from_u8(b)
    }

    /// Returns `PUSHn` for `n` in `0..=32`.
    #[must_use]
    pub const fn push(n: usize) -> Option<Self> {
        if n > 32 {
            return None;
        }
        Self::from_u8(Self::Push0 as u8 + n as u8)
    }

    /// Returns `DUPn` for `n` in `1..=16`.
    #[must_use]
    pub const fn dup(n: usize) -> Option<Self> {
        if n == 0 || n > 16 {
            return None;
        }
        Self::from_u8(Self::Dup1 as u8 + (n - 1) as u8)
    }

    /// Returns `SWAPn` for `n` in `1..=16`.
    #[must_use]
    pub const fn swap(n: usize) -> Option<Self> {
        if n == 0 || n > 16 {
            return None;
        }
        Self::from_u8(Self::Swap1 as u8 + (n - 1) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::Opcode;

    #[test]
    fn opcode_values_are_stable() {
        assert_eq!(Opcode::CallDataSize as u8, 0x36);
        assert_eq!(Opcode::CodeCopy as u8, 0x39);
        assert_eq!(Opcode::ReturnDataSize as u8, 0x3d);
        assert_eq!(Opcode::DelegateCall as u8, 0xf4);
        assert_eq!(Opcode::Push20 as u8, 0x73);
        assert_eq!(Opcode::Swap4 as u8, 0x93);
        assert_eq!(Opcode::JumpDest as u8, 0x5b);
    }

    #[test]
    fn opcode_terminator_classification() {
        assert!(Opcode::Return.is_terminator());
        assert!(Opcode::Revert.is_terminator());
        assert!(Opcode::JumpI.is_terminator());
        assert!(!Opcode::JumpDest.is_terminator());
        assert!(!Opcode::DelegateCall.is_terminator());
    }

    #[test]
    fn families_resolve() {
        assert_eq!(Opcode::push(0), Some(Opcode::Push0));
        assert_eq!(Opcode::push(2), Some(Opcode::Push2));
        assert_eq!(Opcode::push(33), None);
        assert_eq!(Opcode::dup(2), Some(Opcode::Dup2));
        assert_eq!(Opcode::swap(16), Some(Opcode::Swap16));
        assert_eq!(Opcode::swap(0), None);
        assert_eq!(Opcode::Push32.immediate_len(), 32);
        assert_eq!(Opcode::DelegateCall.stack_in(), 6);
        assert_eq!(Opcode::Swap4.stack_out(), 5);
    }

    #[test]
    fn every_byte_roundtrips() {
        for b in 0..=u8::MAX {
            if let Some(op) = Opcode::from_byte(b) {
                assert_eq!(op.byte(), b, "{}", op.mnemonic());
            }
        }
    }
}
