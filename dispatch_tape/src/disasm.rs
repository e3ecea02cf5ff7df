// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disassembler for dispatcher bytecode.
//!
//! This module provides:
//! - A structured view ([`Disassembly`], [`InstrView`]) for tooling/tests.
//! - A human-readable text format via [`core::fmt::Display`].
//!
//! Code recognized as a dispatcher (deployed or init code) is split at the config: the
//! instructions are listed, and the config and trailer are shown as one `.data` line instead of
//! being decoded as garbage instructions.

#![allow(clippy::module_name_repetitions, reason = "public API module")]

use alloc::vec::Vec;
use core::fmt;

use crate::analysis::jumpdest::jumpdests;
use crate::image::DispatcherCode;
use crate::layout::{CONSTRUCTOR_LEN, PREFIX_LEN, RUNTIME_LEN, TEMPLATE, is_template_hole};
use crate::opcode::Opcode;

/// One decoded instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InstrView<'a> {
    pc: usize,
    byte: u8,
    imm: &'a [u8],
    width: usize,
    jumpdest: bool,
}

impl<'a> InstrView<'a> {
    /// Byte offset of the instruction.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// The raw opcode byte.
    #[must_use]
    pub fn byte(&self) -> u8 {
        self.byte
    }

    /// The opcode, or `None` for a byte the VM does not understand.
    #[must_use]
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_byte(self.byte)
    }

    /// The immediate bytes actually present in the code.
    #[must_use]
    pub fn immediate(&self) -> &'a [u8] {
        self.imm
    }

    /// Returns `true` if the code ends before the immediate does.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.imm.len() < self.width
    }

    /// Returns `true` if this is a valid jump destination.
    #[must_use]
    pub fn is_jumpdest(&self) -> bool {
        self.jumpdest
    }
}

impl fmt::Display for InstrView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}: ", self.pc)?;
        match self.opcode() {
            Some(op) => write!(f, "{}", op.mnemonic())?,
            None => write!(f, "<0x{:02x}>", self.byte)?,
        }
        if self.width != 0 {
            write!(f, " 0x")?;
            for b in self.imm {
                write!(f, "{b:02x}")?;
            }
        }
        if self.is_truncated() {
            write!(f, " ; truncated ({} of {} bytes)", self.imm.len(), self.width)?;
        }
        Ok(())
    }
}

/// What the code was recognized as.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CodeKind<'a> {
    /// Arbitrary bytecode.
    Plain,
    /// Deployed dispatcher code.
    Dispatcher(DispatcherCode<'a>),
    /// Dispatcher init code (constructor included).
    DispatcherInit(DispatcherCode<'a>),
}

/// A disassembled code blob.
#[derive(Clone, Debug)]
pub struct Disassembly<'a> {
    kind: CodeKind<'a>,
    instrs: Vec<InstrView<'a>>,
    data_pc: usize,
    data: &'a [u8],
}

impl<'a> Disassembly<'a> {
    /// What the code was recognized as.
    #[must_use]
    pub fn kind(&self) -> CodeKind<'a> {
        self.kind
    }

    /// The decoded instructions.
    #[must_use]
    pub fn instrs(&self) -> &[InstrView<'a>] {
        &self.instrs
    }

    /// Trailing bytes shown as data (config and trailer of a dispatcher; empty otherwise).
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

fn constructor_matches(code: &[u8]) -> bool {
    code.iter()
        .zip(&TEMPLATE[..CONSTRUCTOR_LEN])
        .enumerate()
        .all(|(at, (have, want))| is_template_hole(at) || have == want)
}

/// Disassembles `code`.
#[must_use]
pub fn disassemble(code: &[u8]) -> Disassembly<'_> {
    let (kind, split) = if let Ok(d) = DispatcherCode::parse(code) {
        (CodeKind::Dispatcher(d), RUNTIME_LEN)
    } else if let Some(rt) = code.get(CONSTRUCTOR_LEN..)
        && constructor_matches(code)
        && let Ok(d) = DispatcherCode::parse(rt)
    {
        (CodeKind::DispatcherInit(d), PREFIX_LEN)
    } else {
        (CodeKind::Plain, code.len())
    };

    let (text, data) = code.split_at(split);
    let dests = jumpdests(text);
    let mut instrs = Vec::new();
    let mut pc = 0;
    while pc < text.len() {
        let byte = text[pc];
        let width = Opcode::from_byte(byte).map_or(0, Opcode::immediate_len);
        let end = (pc + 1 + width).min(text.len());
        instrs.push(InstrView {
            pc,
            byte,
            imm: &text[pc + 1..end],
            width,
            jumpdest: dests.get(pc),
        });
        pc = pc + 1 + width;
    }

    Disassembly {
        kind,
        instrs,
        data_pc: split,
        data,
    }
}

impl fmt::Display for Disassembly<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CodeKind::Plain => {}
            CodeKind::Dispatcher(d) | CodeKind::DispatcherInit(d) => {
                let what = if matches!(self.kind, CodeKind::Dispatcher(_)) {
                    "dispatcher"
                } else {
                    "dispatcher init"
                };
                writeln!(
                    f,
                    "; {what} target={} config={} bytes extra_length={}",
                    d.target(),
                    d.config().len(),
                    d.extra_length()
                )?;
            }
        }
        let mut label = 0;
        for iv in &self.instrs {
            if iv.is_jumpdest() {
                writeln!(f, "  @L{label}:")?;
                label += 1;
            }
            writeln!(f, "  {iv}")?;
        }
        if !self.data.is_empty() {
            write!(f, "  {:06}: .data 0x", self.data_pc)?;
            for b in self.data {
                write!(f, "{b:02x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
