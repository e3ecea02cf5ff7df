// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Valid jump targets.
//!
//! A byte is a valid destination iff it is a `JUMPDEST` opcode reached by a linear scan that
//! steps over push immediates. A `0x5b` inside push data is not a destination.

use crate::analysis::bitset::BitSet;
use crate::opcode::Opcode;

/// Marks every valid jump destination in `code`.
#[must_use]
pub(crate) fn jumpdests(code: &[u8]) -> BitSet {
    let mut out = BitSet::new_empty(code.len());
    let mut pc = 0;
    while pc < code.len() {
        let b = code[pc];
        match Opcode::from_byte(b) {
            Some(Opcode::JumpDest) => {
                out.set(pc);
                pc += 1;
            }
            Some(op) => pc += 1 + op.immediate_len(),
            None => pc += 1,
        }
    }
    out
}
