// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place image construction around a caller-owned config buffer.
//!
//! When the config bytes already sit inside a larger buffer with at least
//! [`PREFIX_LEN`] bytes before them and [`TRAILER_LEN`] bytes after them, the init code can be
//! formed by temporarily overwriting those neighbours instead of copying the config into a fresh
//! allocation. The neighbours are saved first and written back when the guard drops, so they are
//! restored on success, on failure, and during unwinding.

use core::ops::Range;

use crate::image::write_prefix;
use crate::layout::{self, LayoutError, PREFIX_LEN, TRAILER_LEN};
use crate::word::Address;

struct Restore<'a> {
    buf: &'a mut [u8],
    head_at: usize,
    head: [u8; PREFIX_LEN],
    tail_at: usize,
    tail: [u8; TRAILER_LEN],
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        self.buf[self.head_at..self.head_at + PREFIX_LEN].copy_from_slice(&self.head);
        self.buf[self.tail_at..self.tail_at + TRAILER_LEN].copy_from_slice(&self.tail);
    }
}

/// Forms the init code for `target` around `buf[config]`, passes it to `f`, then restores `buf`.
///
/// Returns whatever `f` returns. Layout problems are reported before `buf` is modified.
pub fn with_scratch_image<R>(
    buf: &mut [u8],
    config: Range<usize>,
    target: Address,
    f: impl FnOnce(&[u8]) -> R,
) -> Result<R, LayoutError> {
    if config.start > config.end || config.end > buf.len() {
        return Err(LayoutError::InvalidWindow);
    }
    if config.start < PREFIX_LEN {
        return Err(LayoutError::MissingHeadroom {
            needed: PREFIX_LEN,
            available: config.start,
        });
    }
    let tailroom = buf.len() - config.end;
    if tailroom < TRAILER_LEN {
        return Err(LayoutError::MissingTailroom {
            needed: TRAILER_LEN,
            available: tailroom,
        });
    }

    let len = config.len();
    let extra = layout::extra_length(len)?;
    let mut prefix = [0_u8; PREFIX_LEN];
    write_prefix(&mut prefix, target, len)?;

    let head_at = config.start - PREFIX_LEN;
    let tail_at = config.end;
    let mut head = [0_u8; PREFIX_LEN];
    head.copy_from_slice(&buf[head_at..config.start]);
    let mut tail = [0_u8; TRAILER_LEN];
    tail.copy_from_slice(&buf[tail_at..tail_at + TRAILER_LEN]);

    let mut guard = Restore {
        buf,
        head_at,
        head,
        tail_at,
        tail,
    };
    guard.buf[head_at..config.start].copy_from_slice(&prefix);
    guard.buf[tail_at..tail_at + TRAILER_LEN].copy_from_slice(&extra.to_be_bytes());

    let out = f(&guard.buf[head_at..tail_at + TRAILER_LEN]);
    drop(guard);
    Ok(out)
}
