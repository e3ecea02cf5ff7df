// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small fixed-length bitset.

use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BitSet {
    bits: Vec<u64>,
    len: usize,
}

impl BitSet {
    #[must_use]
    pub(crate) fn new_empty(len: usize) -> Self {
        Self {
            bits: vec![0; len.div_ceil(64)],
            len,
        }
    }

    #[must_use]
    pub(crate) fn get(&self, idx: usize) -> bool {
        if idx >= self.len {
            return false;
        }
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    pub(crate) fn set(&mut self, idx: usize) {
        if idx >= self.len {
            return;
        }
        self.bits[idx / 64] |= 1_u64 << (idx % 64);
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::BitSet;

    #[test]
    fn set_and_get_across_words() {
        let mut s = BitSet::new_empty(130);
        for i in [0, 63, 64, 129] {
            s.set(i);
        }
        s.set(130);
        assert!(s.get(0) && s.get(63) && s.get(64) && s.get(129));
        assert!(!s.get(1) && !s.get(130));
        assert_eq!(s.count(), 4);
    }
}
