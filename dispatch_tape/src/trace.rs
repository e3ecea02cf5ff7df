// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for `dispatch_tape`.
//!
//! Tracing is optional and is designed to be `no_std` friendly.
//! The VM only emits events requested by a [`TraceMask`].
//!
//! To enable tracing, pass a [`TraceMask`] and [`TraceSink`] to [`Vm::run`].

#[cfg(doc)]
use crate::vm::Vm;

use crate::vm::TrapInfo;
use crate::word::Address;

/// A set of trace events requested by a [`TraceSink`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceMask(u32);

impl core::ops::BitOr for TraceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for TraceMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl TraceMask {
    /// No tracing.
    pub const NONE: Self = Self(0);
    /// Trace run boundaries.
    ///
    /// Enables:
    /// - [`TraceSink::run_start`]
    /// - [`TraceSink::run_end`]
    pub const RUN: Self = Self(1 << 0);
    /// Trace each executed instruction.
    ///
    /// Enables:
    /// - [`TraceSink::instr`]
    pub const INSTR: Self = Self(1 << 1);
    /// Trace delegated calls.
    ///
    /// Enables:
    /// - [`TraceSink::scope_enter`]
    /// - [`TraceSink::scope_exit`]
    pub const CALL: Self = Self(1 << 2);
    /// Everything.
    pub const ALL: Self = Self(0b111);

    /// Returns `true` if this mask includes all bits in `other`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// The kind of scope being entered/exited.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// A `DELEGATECALL` into `target`.
    DelegateCall {
        /// Code being borrowed.
        target: Address,
    },
}

/// Run outcome for tracing.
#[derive(Clone, Debug)]
pub enum TraceOutcome<'a> {
    /// The run ended with `RETURN` or `STOP`.
    Return,
    /// The run ended with `REVERT`.
    Revert,
    /// Trapped.
    Trap(&'a TrapInfo),
}

/// A trace sink that can receive VM events.
pub trait TraceSink {
    /// Returns the set of events the sink wants.
    fn mask(&self) -> TraceMask {
        TraceMask::NONE
    }

    /// Called at the start of a VM run.
    ///
    /// Called only if `mask()` includes [`TraceMask::RUN`].
    fn run_start(&mut self, _code: &[u8], _input_len: usize) {}

    /// Called for each executed instruction, before it executes.
    ///
    /// Called only if `mask()` includes [`TraceMask::INSTR`].
    ///
    /// - `pc`: byte offset of the instruction
    /// - `opcode`: opcode byte
    /// - `stack_depth`: items on the stack before the instruction runs
    /// - `fuel`: fuel left before the instruction is charged
    fn instr(&mut self, _pc: usize, _opcode: u8, _stack_depth: usize, _fuel: u64) {}

    /// Called when a delegated call starts.
    ///
    /// Called only if `mask()` includes [`TraceMask::CALL`].
    fn scope_enter(&mut self, _kind: ScopeKind, _pc: usize, _fuel: u64) {}

    /// Called when a delegated call returns to the VM.
    ///
    /// `success` is what the call pushes onto the stack.
    fn scope_exit(&mut self, _kind: ScopeKind, _pc: usize, _success: bool) {}

    /// Called at the end of a VM run.
    ///
    /// Called only if `mask()` includes [`TraceMask::RUN`].
    fn run_end(&mut self, _code: &[u8], _outcome: TraceOutcome<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::TraceMask;

    #[test]
    fn masks_compose() {
        let mut m = TraceMask::RUN;
        assert!(!m.contains(TraceMask::CALL));
        m |= TraceMask::CALL;
        assert!(m.contains(TraceMask::RUN | TraceMask::CALL));
        assert!(!m.contains(TraceMask::INSTR));
        assert!(TraceMask::ALL.contains(m));
        assert!(m.contains(TraceMask::NONE));
    }
}
