// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small bytecode assembler.
//!
//! [`Asm`] appends instructions and resolves forward jumps through labels. Placing a label emits
//! the `JUMPDEST` it names, and pushing a label reserves a fixed-width immediate that is patched
//! in [`Asm::finish`].

use alloc::vec::Vec;
use core::fmt;

use crate::opcode::Opcode;
use crate::word::{Address, Word};

/// A label for jump targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label(u32);

/// A label that has not been placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedLabel;

impl fmt::Display for UnresolvedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label was referenced but never placed")
    }
}

impl core::error::Error for UnresolvedLabel {}

/// A bytecode builder error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsmError {
    /// A referenced label was never placed.
    UnresolvedLabel,
    /// A label's position does not fit the immediate reserved for it.
    LabelOutOfRange {
        /// Where the label was placed.
        pc: usize,
        /// Width of the reserved immediate.
        width: usize,
    },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedLabel => write!(f, "unresolved label"),
            Self::LabelOutOfRange { pc, width } => {
                write!(f, "label at pc {pc} does not fit in {width} byte(s)")
            }
        }
    }
}

impl core::error::Error for AsmError {}

impl From<UnresolvedLabel> for AsmError {
    fn from(_: UnresolvedLabel) -> Self {
        Self::UnresolvedLabel
    }
}

#[derive(Clone, Debug)]
struct Fixup {
    at: usize,
    width: usize,
    label: Label,
}

/// Bytecode builder.
#[derive(Clone, Debug, Default)]
pub struct Asm {
    bytes: Vec<u8>,
    labels: Vec<Option<usize>>,
    fixups: Vec<Fixup>,
}

impl Asm {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current byte offset ("pc") in the output.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.bytes.len()
    }

    /// Allocates a new label.
    #[must_use]
    pub fn label(&mut self) -> Label {
        let id = u32::try_from(self.labels.len()).unwrap_or(u32::MAX);
        self.labels.push(None);
        Label(id)
    }

    /// Places `label` at the current `pc` and emits its `JUMPDEST`.
    pub fn place(&mut self, label: Label) -> Result<&mut Self, UnresolvedLabel> {
        let pc = self.pc();
        let slot = self
            .labels
            .get_mut(label.0 as usize)
            .ok_or(UnresolvedLabel)?;
        *slot = Some(pc);
        Ok(self.op(Opcode::JumpDest))
    }

    /// Emits an instruction without an immediate.
    ///
    /// For `PUSHn` this emits the bare opcode; use the `push_*` methods instead.
    pub fn op(&mut self, op: Opcode) -> &mut Self {
        self.bytes.push(op.byte());
        self
    }

    /// Emits `PUSH1 v`.
    pub fn push1(&mut self, v: u8) -> &mut Self {
        self.op(Opcode::Push1);
        self.bytes.push(v);
        self
    }

    /// Emits `PUSH2 v`.
    pub fn push2(&mut self, v: u16) -> &mut Self {
        self.op(Opcode::Push2);
        self.bytes.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Emits `PUSH20 a`.
    pub fn push_address(&mut self, a: Address) -> &mut Self {
        self.op(Opcode::Push20);
        self.bytes.extend_from_slice(a.as_bytes());
        self
    }

    /// Emits the shortest push of `w` (`PUSH0` for zero).
    pub fn push_word(&mut self, w: Word) -> &mut Self {
        let skip = w.0.iter().take_while(|&&b| b == 0).count();
        let imm = &w.0[skip..];
        let op = match Opcode::push(imm.len()) {
            Some(op) => op,
            None => Opcode::Push32,
        };
        self.op(op);
        self.bytes.extend_from_slice(imm);
        self
    }

    /// Emits the shortest push of `v`.
    pub fn push_u64(&mut self, v: u64) -> &mut Self {
        self.push_word(Word::from_u64(v))
    }

    /// Emits `PUSH2 <pc of label>`.
    pub fn push_label(&mut self, label: Label) -> &mut Self {
        self.push_label_width(label, 2)
    }

    /// Emits `PUSH1 <pc of label>`. The label must land below pc 256.
    pub fn push_label_short(&mut self, label: Label) -> &mut Self {
        self.push_label_width(label, 1)
    }

    fn push_label_width(&mut self, label: Label, width: usize) -> &mut Self {
        let op = match Opcode::push(width) {
            Some(op) => op,
            None => Opcode::Push2,
        };
        self.op(op);
        let at = self.bytes.len();
        self.bytes.resize(at + width, 0);
        self.fixups.push(Fixup { at, width, label });
        self
    }

    /// Emits raw bytes (data or hand-encoded instructions).
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Finalizes and returns the encoded bytecode.
    pub fn finish(mut self) -> Result<Vec<u8>, AsmError> {
        for f in &self.fixups {
            let Some(pc) = self.labels.get(f.label.0 as usize).and_then(|x| *x) else {
                return Err(AsmError::UnresolvedLabel);
            };
            let be = (pc as u64).to_be_bytes();
            let (high, low) = be.split_at(be.len() - f.width);
            if high.iter().any(|&b| b != 0) {
                return Err(AsmError::LabelOutOfRange { pc, width: f.width });
            }
            self.bytes[f.at..f.at + f.width].copy_from_slice(low);
        }
        Ok(self.bytes)
    }
}
