// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-width value types shared by the image builder, the argument reader and the VM.
//!
//! - [`Address`] is the 20-byte identifier of a program (a dispatcher or its target).
//! - [`Word`] is a 256-bit unsigned integer stored big-endian, which is also the VM stack slot.

use core::fmt;

/// A 20-byte program identifier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Byte width of an address.
    pub const LEN: usize = 20;

    /// The zero address. Hosts return it to signal a failed instantiation.
    pub const ZERO: Self = Self([0; 20]);

    /// Builds an address whose low 8 bytes are `v` (big-endian) and whose other bytes are zero.
    #[must_use]
    pub const fn from_low_u64(v: u64) -> Self {
        let mut out = [0_u8; 20];
        let b = v.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            out[12 + i] = b[i];
            i += 1;
        }
        Self(out)
    }

    /// Returns `true` for [`Address::ZERO`].
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// A 256-bit unsigned integer, big-endian.
///
/// Ordering of the byte array is numeric ordering, so the derived `Ord` is meaningful.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(pub [u8; 32]);

impl Word {
    /// Byte width of a word.
    pub const LEN: usize = 32;

    /// `0`.
    pub const ZERO: Self = Self([0; 32]);

    /// `1`.
    pub const ONE: Self = Self::from_u64(1);

    /// `2^256 - 1`.
    pub const MAX: Self = Self([0xff; 32]);

    /// Widens `v`.
    #[must_use]
    pub const fn from_u64(v: u64) -> Self {
        let mut out = [0_u8; 32];
        let b = v.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            out[24 + i] = b[i];
            i += 1;
        }
        Self(out)
    }

    /// Widens `v`.
    #[must_use]
    pub const fn from_u128(v: u128) -> Self {
        let mut out = [0_u8; 32];
        let b = v.to_be_bytes();
        let mut i = 0;
        while i < 16 {
            out[16 + i] = b[i];
            i += 1;
        }
        Self(out)
    }

    /// Returns the low 64 bits (truncating).
    #[must_use]
    pub fn low_u64(&self) -> u64 {
        let mut b = [0_u8; 8];
        b.copy_from_slice(&self.0[24..]);
        u64::from_be_bytes(b)
    }

    /// Returns the value as `u64` if it fits.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.0[..24]
            .iter()
            .all(|&b| b == 0)
            .then(|| self.low_u64())
    }

    /// Returns the value as `usize` if it fits.
    #[must_use]
    pub fn to_usize(&self) -> Option<usize> {
        self.to_u64().and_then(|v| usize::try_from(v).ok())
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 32]
    }

    /// Returns the leading 20 bytes as an [`Address`].
    ///
    /// This is how a packed address field is read: the address occupies the high-order bytes and
    /// the low-order 12 bytes belong to whatever follows it.
    #[must_use]
    pub fn leading_address(&self) -> Address {
        let mut out = [0_u8; 20];
        out.copy_from_slice(&self.0[..20]);
        Address(out)
    }

    /// Returns the low-order 20 bytes as an [`Address`].
    #[must_use]
    pub fn low_address(&self) -> Address {
        let mut out = [0_u8; 20];
        out.copy_from_slice(&self.0[12..]);
        Address(out)
    }

    /// Modular addition.
    #[must_use]
    pub fn wrapping_add(&self, rhs: &Self) -> Self {
        let mut out = [0_u8; 32];
        let mut carry = 0_u16;
        for i in (0..32).rev() {
            let s = u16::from(self.0[i]) + u16::from(rhs.0[i]) + carry;
            out[i] = s as u8;
            carry = s >> 8;
        }
        Self(out)
    }

    /// Modular subtraction.
    #[must_use]
    pub fn wrapping_sub(&self, rhs: &Self) -> Self {
        let mut out = [0_u8; 32];
        let mut borrow = 0_i16;
        for i in (0..32).rev() {
            let mut d = i16::from(self.0[i]) - i16::from(rhs.0[i]) - borrow;
            if d < 0 {
                d += 256;
                borrow = 1;
            } else {
                borrow = 0;
            }
            out[i] = d as u8;
        }
        Self(out)
    }

    /// Logical shift left; shifts of 256 bits or more yield zero.
    #[must_use]
    pub fn shl(&self, bits: usize) -> Self {
        if bits >= 256 {
            return Self::ZERO;
        }
        let bytes = bits / 8;
        let rem = (bits % 8) as u32;
        let mut out = [0_u8; 32];
        for i in 0..32 - bytes {
            let hi = self.0[i + bytes];
            let lo = self.0.get(i + bytes + 1).copied().unwrap_or(0);
            out[i] = if rem == 0 {
                hi
            } else {
                (hi << rem) | (lo >> (8 - rem))
            };
        }
        Self(out)
    }

    /// Logical shift right; shifts of 256 bits or more yield zero.
    #[must_use]
    pub fn shr(&self, bits: usize) -> Self {
        if bits >= 256 {
            return Self::ZERO;
        }
        let bytes = bits / 8;
        let rem = (bits % 8) as u32;
        let mut out = [0_u8; 32];
        for i in bytes..32 {
            let lo = self.0[i - bytes];
            let hi = if i - bytes == 0 { 0 } else { self.0[i - bytes - 1] };
            out[i] = if rem == 0 {
                lo
            } else {
                (lo >> rem) | (hi << (8 - rem))
            };
        }
        Self(out)
    }

    /// Bitwise and.
    #[must_use]
    pub fn bitand(&self, rhs: &Self) -> Self {
        let mut out = self.0;
        for (a, b) in out.iter_mut().zip(rhs.0) {
            *a &= b;
        }
        Self(out)
    }
}

impl From<u64> for Word {
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl From<Address> for Word {
    /// Places the address in the low-order 20 bytes, the way it sits on the VM stack.
    fn from(a: Address) -> Self {
        let mut out = [0_u8; 32];
        out[12..].copy_from_slice(&a.0);
        Self(out)
    }
}

impl From<[u8; 32]> for Word {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn add_and_sub_wrap() {
        assert_eq!(Word::MAX.wrapping_add(&Word::ONE), Word::ZERO);
        assert_eq!(Word::ZERO.wrapping_sub(&Word::ONE), Word::MAX);
        assert_eq!(
            Word::from_u64(0xff).wrapping_add(&Word::from_u64(1)),
            Word::from_u64(0x100)
        );
        assert_eq!(
            Word::from_u64(0x100).wrapping_sub(&Word::from_u64(1)),
            Word::from_u64(0xff)
        );
    }

    #[test]
    fn shifts_move_across_byte_boundaries() {
        assert_eq!(Word::ONE.shl(12), Word::from_u64(1 << 12));
        assert_eq!(Word::from_u64(1 << 12).shr(12), Word::ONE);
        assert_eq!(Word::ONE.shl(255).shr(255), Word::ONE);
        assert_eq!(Word::MAX.shr(256), Word::ZERO);
        assert_eq!(Word::MAX.shl(8 * 31).0[0], 0xff);
        assert_eq!(Word::MAX.shl(8 * 31).0[1], 0x00);
    }

    #[test]
    fn address_placement() {
        let a = Address([0x11; 20]);
        let w = Word::from(a);
        assert_eq!(w.low_address(), a);
        assert_eq!(w.shl(96).leading_address(), a);
        assert_eq!(Address::from_low_u64(0x42).0[19], 0x42);
    }

    #[test]
    fn usize_conversion_is_checked() {
        assert_eq!(Word::from_u64(7).to_usize(), Some(7));
        assert_eq!(Word::MAX.to_usize(), None);
        assert_eq!(Word::MAX.low_u64(), u64::MAX);
    }

    #[test]
    fn hex_display() {
        assert_eq!(
            format!("{}", Address::from_low_u64(0xab)),
            "0x00000000000000000000000000000000000000ab"
        );
    }
}
