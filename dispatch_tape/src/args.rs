// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading and writing the config blob carried by a dispatched call.
//!
//! A call forwarded by a dispatcher looks like this:
//!
//! ```text
//! [caller input][config L][extraLength 2]      extraLength = L + 2
//! ^0            ^offset()                  ^S
//! ```
//!
//! [`Args`] locates the config using nothing but the call size `S` and the trailing two bytes,
//! then reads fixed-width fields at caller-chosen offsets into it. The blob has no schema: the
//! caller that packed it (see [`Packer`]) and the code that reads it agree on offsets out of band.
//!
//! Reads are never bounds checked. Anything past the end of the input (including positions whose
//! computation overflows) reads as zero, and a read that runs past the config lands in the trailer.

use alloc::vec::Vec;

use crate::format::{Writer, copy_padded, load_padded};
use crate::layout::TRAILER_LEN;
use crate::word::{Address, Word};

/// A reader over the input of one delegated call.
#[derive(Copy, Clone, Debug)]
pub struct Args<'a> {
    input: &'a [u8],
}

impl<'a> Args<'a> {
    /// Wraps the full input of the current call.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    /// Returns the call size `S`.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    /// Returns the big-endian value of the last two input bytes (zero if `S < 2`).
    #[must_use]
    pub fn extra_length(&self) -> u16 {
        match self.input.len().checked_sub(TRAILER_LEN) {
            Some(at) => u16::from_be_bytes([self.input[at], self.input[at + 1]]),
            None => 0,
        }
    }

    /// Returns where the config starts: `S - extraLength`.
    ///
    /// Wraps if the trailer claims more bytes than the call has. Every read from a wrapped offset
    /// overflows and yields zeros.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.input
            .len()
            .wrapping_sub(usize::from(self.extra_length()))
    }

    fn at(&self, o: usize) -> Option<usize> {
        self.offset().checked_add(o)
    }

    fn load<const W: usize>(&self, o: usize) -> [u8; W] {
        load_padded(self.input, self.at(o))
    }

    /// Reads the 20-byte address at config offset `o`.
    #[must_use]
    pub fn address(&self, o: usize) -> Address {
        Address(self.load(o))
    }

    /// Reads the 32-byte word at config offset `o`.
    #[must_use]
    pub fn uint256(&self, o: usize) -> Word {
        Word(self.load(o))
    }

    /// Reads 32 raw bytes at config offset `o`.
    #[must_use]
    pub fn bytes32(&self, o: usize) -> [u8; 32] {
        self.load(o)
    }

    /// Reads a big-endian `u128` at config offset `o`.
    #[must_use]
    pub fn uint128(&self, o: usize) -> u128 {
        u128::from_be_bytes(self.load(o))
    }

    /// Reads a big-endian `u64` at config offset `o`.
    #[must_use]
    pub fn uint64(&self, o: usize) -> u64 {
        u64::from_be_bytes(self.load(o))
    }

    /// Reads a big-endian `u32` at config offset `o`.
    #[must_use]
    pub fn uint32(&self, o: usize) -> u32 {
        u32::from_be_bytes(self.load(o))
    }

    /// Reads a big-endian `u16` at config offset `o`.
    #[must_use]
    pub fn uint16(&self, o: usize) -> u16 {
        u16::from_be_bytes(self.load(o))
    }

    /// Reads the byte at config offset `o`.
    #[must_use]
    pub fn uint8(&self, o: usize) -> u8 {
        self.load::<1>(o)[0]
    }

    /// Reads `n` consecutive 32-byte words starting at config offset `o`.
    #[must_use]
    pub fn uint256_array(&self, o: usize, n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| {
                let pos = i
                    .checked_mul(Word::LEN)
                    .and_then(|d| d.checked_add(o))
                    .and_then(|d| self.at(d));
                Word(load_padded(self.input, pos))
            })
            .collect()
    }

    /// Copies `len` bytes starting at config offset `o`.
    #[must_use]
    pub fn bytes(&self, o: usize, len: usize) -> Vec<u8> {
        let mut out = alloc::vec![0_u8; len];
        copy_padded(&mut out, self.input, self.at(o));
        out
    }

    /// Reads the 20 bytes just before the trailer.
    ///
    /// This skips the offset computation and agrees with [`Args::address`]`(0)` whenever the
    /// config is exactly one address.
    #[must_use]
    pub fn only_address(&self) -> Address {
        let pos = self.input.len().checked_sub(Address::LEN + TRAILER_LEN);
        Address(load_padded(self.input, pos))
    }

    /// Returns the bytes the original caller sent, without the config and trailer.
    ///
    /// Empty when the trailer claims more bytes than the call has.
    #[must_use]
    pub fn caller_input(&self) -> &'a [u8] {
        self.input.get(..self.offset()).unwrap_or(&[])
    }
}

/// Builds a tightly packed config blob, field by field.
#[derive(Clone, Debug, Default)]
pub struct Packer {
    out: Writer,
}

impl Packer {
    /// Creates an empty blob.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current blob length, which is also the offset of the next field.
    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Returns `true` if nothing has been packed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Appends a 20-byte address.
    pub fn address(&mut self, a: Address) -> &mut Self {
        self.out.write_bytes(a.as_bytes());
        self
    }

    /// Appends a 32-byte word.
    pub fn uint256(&mut self, w: Word) -> &mut Self {
        self.out.write_bytes(&w.0);
        self
    }

    /// Appends 32 raw bytes.
    pub fn bytes32(&mut self, b: [u8; 32]) -> &mut Self {
        self.out.write_bytes(&b);
        self
    }

    /// Appends a big-endian `u128`.
    pub fn uint128(&mut self, v: u128) -> &mut Self {
        self.out.write_u128_be(v);
        self
    }

    /// Appends a big-endian `u64`.
    pub fn uint64(&mut self, v: u64) -> &mut Self {
        self.out.write_u64_be(v);
        self
    }

    /// Appends a big-endian `u32`.
    pub fn uint32(&mut self, v: u32) -> &mut Self {
        self.out.write_u32_be(v);
        self
    }

    /// Appends a big-endian `u16`.
    pub fn uint16(&mut self, v: u16) -> &mut Self {
        self.out.write_u16_be(v);
        self
    }

    /// Appends one byte.
    pub fn uint8(&mut self, v: u8) -> &mut Self {
        self.out.write_u8(v);
        self
    }

    /// Appends raw bytes.
    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.out.write_bytes(b);
        self
    }

    /// Returns the packed blob.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.out.into_vec()
    }
}
