// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Byte-level encoding/decoding primitives.
//!
//! Two read disciplines live here:
//! - [`Reader`] is a bounds-checked cursor used when inspecting artifacts (deployed code,
//!   bytecode listings). Running off the end is an error.
//! - [`load_padded`] mirrors how a running program sees its input: bytes past the end read as
//!   zero and nothing is ever reported.

use alloc::vec::Vec;
use core::fmt;

/// A decode error for dispatcher artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended unexpectedly.
    UnexpectedEof,
    /// A length/offset was out of bounds.
    OutOfBounds,
    /// A fixed byte of the dispatcher template did not match.
    TemplateMismatch {
        /// Byte offset of the first mismatch.
        at: usize,
    },
    /// The embedded length constant disagrees with the trailer or the code size.
    LengthMismatch {
        /// The length implied by the artifact's size.
        expected: u16,
        /// The length found in the artifact.
        found: u16,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::TemplateMismatch { at } => write!(f, "template mismatch at byte {at}"),
            Self::LengthMismatch { expected, found } => {
                write!(f, "length mismatch (expected {expected}, found {found})")
            }
        }
    }
}

impl core::error::Error for DecodeError {}

/// A simple byte reader with bounds checks.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Returns the current cursor offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(DecodeError::OutOfBounds)?;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(DecodeError::UnexpectedEof)?;
        self.offset = end;
        Ok(slice)
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Reads a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let b = self.take(N)?;
        let mut out = [0_u8; N];
        out.copy_from_slice(b);
        Ok(out)
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.take(len)
    }

    /// Reads up to `len` bytes, stopping at the end of input.
    pub fn read_bytes_truncated(&mut self, len: usize) -> &'a [u8] {
        let n = len.min(self.remaining());
        let start = self.offset;
        self.offset += n;
        &self.bytes[start..start + n]
    }
}

/// A simple byte writer.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Creates an empty writer with room for `cap` bytes.
    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(cap),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a reference to the written bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the writer and returns the underlying byte buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Appends a `u8`.
    pub fn write_u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    /// Appends a big-endian `u16`.
    pub fn write_u16_be(&mut self, v: u16) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Appends a big-endian `u32`.
    pub fn write_u32_be(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Appends a big-endian `u64`.
    pub fn write_u64_be(&mut self, v: u64) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Appends a big-endian `u128`.
    pub fn write_u128_be(&mut self, v: u128) {
        self.bytes.extend_from_slice(&v.to_be_bytes());
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, b: &[u8]) {
        self.bytes.extend_from_slice(b);
    }
}

/// Loads `W` bytes starting at `pos`, zero-filling anything past the end of `bytes`.
///
/// `None` stands for a position that overflowed while being computed; it reads as all zeros, the
/// same as any other position past the end.
#[must_use]
pub fn load_padded<const W: usize>(bytes: &[u8], pos: Option<usize>) -> [u8; W] {
    let mut out = [0_u8; W];
    if let Some(pos) = pos
        && let Some(avail) = bytes.get(pos..)
    {
        let n = avail.len().min(W);
        out[..n].copy_from_slice(&avail[..n]);
    }
    out
}

/// Copies `src[pos..pos + dst.len()]` into `dst`, zero-filling past the end of `src`.
pub fn copy_padded(dst: &mut [u8], src: &[u8], pos: Option<usize>) {
    dst.fill(0);
    if let Some(pos) = pos
        && let Some(avail) = src.get(pos..)
    {
        let n = avail.len().min(dst.len());
        dst[..n].copy_from_slice(&avail[..n]);
    }
}
