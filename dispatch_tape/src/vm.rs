// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A stack interpreter for dispatcher bytecode.
//!
//! The VM runs one frame of code over 256-bit words: the dispatcher's constructor, its runtime
//! body, or any other program built from the [`Opcode`] subset. Storage and delegated calls go
//! through the [`Host`]; everything else (stack, memory, return-data buffer) lives in the frame.
//!
//! Fuel is charged per instruction, plus one unit per 32-byte word copied or newly allocated.
//! `GAS` reports the fuel left. `DELEGATECALL` forwards at most all but 1/64 of it.

use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use crate::analysis::bitset::BitSet;
use crate::analysis::jumpdest::jumpdests;
use crate::format::{copy_padded, load_padded};
use crate::host::{Host, HostError};
use crate::opcode::Opcode;
use crate::trace::{ScopeKind, TraceMask, TraceOutcome, TraceSink};
use crate::word::{Address, Word};

/// Execution limits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Fuel budget for the run.
    pub fuel: u64,
    /// Maximum number of stack items.
    pub max_stack: usize,
    /// Maximum memory size in bytes.
    pub max_memory: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            fuel: 10_000_000,
            max_stack: 1024,
            max_memory: 4 << 20,
        }
    }
}

/// A runtime trap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Fuel limit exceeded.
    FuelExceeded,
    /// An instruction needed more stack items than there were.
    StackUnderflow,
    /// The stack would grow past [`Limits::max_stack`].
    StackOverflow,
    /// The byte is not an opcode the VM understands.
    InvalidOpcode(u8),
    /// The designated invalid instruction (`0xfe`) was executed.
    InvalidInstruction,
    /// A jump target is not a `JUMPDEST`.
    InvalidJump {
        /// The requested destination.
        dest: Word,
    },
    /// Memory would grow past [`Limits::max_memory`].
    MemoryLimit,
    /// A memory offset or size does not fit in the address space.
    OffsetOverflow,
    /// `RETURNDATACOPY` read past the end of the return-data buffer.
    ReturnDataOutOfBounds,
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FuelExceeded => write!(f, "fuel limit exceeded"),
            Self::StackUnderflow => write!(f, "stack underflow"),
            Self::StackOverflow => write!(f, "stack overflow"),
            Self::InvalidOpcode(b) => write!(f, "invalid opcode 0x{b:02x}"),
            Self::InvalidInstruction => write!(f, "invalid instruction"),
            Self::InvalidJump { dest } => write!(f, "invalid jump destination {dest}"),
            Self::MemoryLimit => write!(f, "memory limit exceeded"),
            Self::OffsetOverflow => write!(f, "memory offset overflow"),
            Self::ReturnDataOutOfBounds => write!(f, "return data out of bounds"),
        }
    }
}

impl core::error::Error for Trap {}

/// A trap annotated with location information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrapInfo {
    /// Byte offset of the trapping instruction.
    pub pc: usize,
    /// Trap kind.
    pub trap: Trap,
}

impl fmt::Display for TrapInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trap at pc={}: {}", self.pc, self.trap)
    }
}

impl core::error::Error for TrapInfo {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.trap)
    }
}

/// What to run.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    /// Code being executed.
    pub code: &'a [u8],
    /// Call input (`CALLDATA*`).
    pub input: &'a [u8],
    /// Account the code runs as (`ADDRESS`).
    pub address: Address,
    /// Account that made the call (`CALLER`).
    pub caller: Address,
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// `RETURN` or `STOP`. State changes stand.
    Return(Vec<u8>),
    /// `REVERT`. State changes of the frame are discarded by the host.
    Revert(Vec<u8>),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Return`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Return(_))
    }

    /// Returns the output bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Return(d) | Self::Revert(d) => d,
        }
    }

    /// Consumes the outcome and returns the output bytes.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        match self {
            Self::Return(d) | Self::Revert(d) => d,
        }
    }
}

enum Step {
    Next(usize),
    Halt(Outcome),
}

/// Per-run state.
struct Machine {
    fuel: u64,
    stack: Vec<Word>,
    memory: Vec<u8>,
    return_data: Vec<u8>,
    jumpdests: BitSet,
}

impl Machine {
    fn new(fuel: u64, code: &[u8]) -> Self {
        Self {
            fuel,
            stack: Vec::new(),
            memory: Vec::new(),
            return_data: Vec::new(),
            jumpdests: jumpdests(code),
        }
    }

    fn charge(&mut self, units: u64) -> Result<(), Trap> {
        self.fuel = self.fuel.checked_sub(units).ok_or(Trap::FuelExceeded)?;
        Ok(())
    }

    fn pop(&mut self) -> Result<Word, Trap> {
        self.stack.pop().ok_or(Trap::StackUnderflow)
    }

    fn push(&mut self, w: Word) {
        self.stack.push(w);
    }

    fn check_stack(&self, op: Opcode, max: usize) -> Result<(), Trap> {
        let depth = self.stack.len();
        let after = depth
            .checked_sub(op.stack_in())
            .ok_or(Trap::StackUnderflow)?
            + op.stack_out();
        if after > max {
            return Err(Trap::StackOverflow);
        }
        Ok(())
    }

    /// Resolves `[offset, offset + size)`, growing memory to cover it.
    ///
    /// A zero-sized range never touches memory, whatever its offset.
    fn expand(&mut self, offset: &Word, size: &Word, max: usize) -> Result<Range<usize>, Trap> {
        if size.is_zero() {
            return Ok(0..0);
        }
        let start = offset.to_usize().ok_or(Trap::OffsetOverflow)?;
        let len = size.to_usize().ok_or(Trap::OffsetOverflow)?;
        let end = start.checked_add(len).ok_or(Trap::OffsetOverflow)?;
        let rounded = end
            .checked_next_multiple_of(Word::LEN)
            .ok_or(Trap::OffsetOverflow)?;
        if rounded > self.memory.len() {
            if rounded > max {
                return Err(Trap::MemoryLimit);
            }
            self.charge(((rounded - self.memory.len()) / Word::LEN) as u64)?;
            self.memory.resize(rounded, 0);
        }
        Ok(start..end)
    }

    fn copy_from(&mut self, src: &[u8], max: usize) -> Result<(), Trap> {
        let dest = self.pop()?;
        let offset = self.pop()?;
        let size = self.pop()?;
        let range = self.expand(&dest, &size, max)?;
        self.charge(words(range.len()))?;
        copy_padded(&mut self.memory[range], src, offset.to_usize());
        Ok(())
    }

    fn output(&mut self, max: usize) -> Result<Vec<u8>, Trap> {
        let offset = self.pop()?;
        let size = self.pop()?;
        let range = self.expand(&offset, &size, max)?;
        Ok(self.memory[range].to_vec())
    }
}

fn words(len: usize) -> u64 {
    len.div_ceil(Word::LEN) as u64
}

fn flag(b: bool) -> Word {
    Word::from_u64(u64::from(b))
}

/// A bytecode interpreter bound to a host.
pub struct Vm<H: Host> {
    host: H,
    limits: Limits,
}

impl<H: Host> fmt::Debug for Vm<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vm")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Vm<H> {
    /// Creates a new VM with `host` and `limits`.
    #[must_use]
    pub fn new(host: H, limits: Limits) -> Self {
        Self { host, limits }
    }

    /// Returns the limits each run starts with.
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the VM and returns the host.
    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Executes `frame` until it halts.
    ///
    /// Returns the outcome and the fuel used. Running off the end of the code is an implicit
    /// `STOP`.
    ///
    /// Tracing is controlled by `trace_mask`; pass `None` for `trace` to disable tracing.
    pub fn run(
        &mut self,
        frame: &Frame<'_>,
        trace_mask: TraceMask,
        mut trace: Option<&mut dyn TraceSink>,
    ) -> Result<(Outcome, u64), TrapInfo> {
        if trace_mask.contains(TraceMask::RUN)
            && let Some(t) = trace.as_mut()
        {
            let t: &mut dyn TraceSink = &mut **t;
            t.run_start(frame.code, frame.input.len());
        }

        let mut m = Machine::new(self.limits.fuel, frame.code);
        let result = self.run_body(&mut m, frame, trace_mask, &mut trace);

        if trace_mask.contains(TraceMask::RUN)
            && let Some(t) = trace.as_mut()
        {
            let outcome = match &result {
                Ok(Outcome::Return(_)) => TraceOutcome::Return,
                Ok(Outcome::Revert(_)) => TraceOutcome::Revert,
                Err(e) => TraceOutcome::Trap(e),
            };
            let t: &mut dyn TraceSink = &mut **t;
            t.run_end(frame.code, outcome);
        }

        let used = self.limits.fuel - m.fuel;
        result.map(|o| (o, used))
    }

    fn run_body(
        &mut self,
        m: &mut Machine,
        frame: &Frame<'_>,
        trace_mask: TraceMask,
        trace: &mut Option<&mut dyn TraceSink>,
    ) -> Result<Outcome, TrapInfo> {
        let mut pc = 0;
        loop {
            let Some(&byte) = frame.code.get(pc) else {
                return Ok(Outcome::Return(Vec::new()));
            };

            if trace_mask.contains(TraceMask::INSTR)
                && let Some(t) = trace.as_mut()
            {
                let t: &mut dyn TraceSink = &mut **t;
                t.instr(pc, byte, m.stack.len(), m.fuel);
            }

            match self
                .step(m, frame, pc, byte, trace_mask, trace)
                .map_err(|trap| TrapInfo { pc, trap })?
            {
                Step::Next(next) => pc = next,
                Step::Halt(outcome) => return Ok(outcome),
            }
        }
    }

    fn step(
        &mut self,
        m: &mut Machine,
        frame: &Frame<'_>,
        pc: usize,
        byte: u8,
        trace_mask: TraceMask,
        trace: &mut Option<&mut dyn TraceSink>,
    ) -> Result<Step, Trap> {
        m.charge(1)?;
        let op = Opcode::from_byte(byte).ok_or(Trap::InvalidOpcode(byte))?;
        m.check_stack(op, self.limits.max_stack)?;
        let max_mem = self.limits.max_memory;
        let next = pc + 1 + op.immediate_len();

        match op {
            Opcode::Stop => return Ok(Step::Halt(Outcome::Return(Vec::new()))),
            Opcode::Add => {
                let (a, b) = (m.pop()?, m.pop()?);
                m.push(a.wrapping_add(&b));
            }
            Opcode::Sub => {
                let (a, b) = (m.pop()?, m.pop()?);
                m.push(a.wrapping_sub(&b));
            }
            Opcode::Lt => {
                let (a, b) = (m.pop()?, m.pop()?);
                m.push(flag(a < b));
            }
            Opcode::Gt => {
                let (a, b) = (m.pop()?, m.pop()?);
                m.push(flag(a > b));
            }
            Opcode::Eq => {
                let (a, b) = (m.pop()?, m.pop()?);
                m.push(flag(a == b));
            }
            Opcode::IsZero => {
                let a = m.pop()?;
                m.push(flag(a.is_zero()));
            }
            Opcode::And => {
                let (a, b) = (m.pop()?, m.pop()?);
                m.push(a.bitand(&b));
            }
            Opcode::Shl => {
                let (shift, value) = (m.pop()?, m.pop()?);
                m.push(value.shl(shift.to_usize().unwrap_or(256)));
            }
            Opcode::Shr => {
                let (shift, value) = (m.pop()?, m.pop()?);
                m.push(value.shr(shift.to_usize().unwrap_or(256)));
            }
            Opcode::Address => m.push(Word::from(frame.address)),
            Opcode::Caller => m.push(Word::from(frame.caller)),
            Opcode::CallDataLoad => {
                let at = m.pop()?;
                m.push(Word(load_padded(frame.input, at.to_usize())));
            }
            Opcode::CallDataSize => m.push(Word::from_u64(frame.input.len() as u64)),
            Opcode::CallDataCopy => m.copy_from(frame.input, max_mem)?,
            Opcode::CodeSize => m.push(Word::from_u64(frame.code.len() as u64)),
            Opcode::CodeCopy => m.copy_from(frame.code, max_mem)?,
            Opcode::ReturnDataSize => m.push(Word::from_u64(m.return_data.len() as u64)),
            Opcode::ReturnDataCopy => {
                let dest = m.pop()?;
                let offset = m.pop()?;
                let size = m.pop()?;
                let start = offset.to_usize().ok_or(Trap::ReturnDataOutOfBounds)?;
                let len = size.to_usize().ok_or(Trap::ReturnDataOutOfBounds)?;
                let end = start
                    .checked_add(len)
                    .filter(|&end| end <= m.return_data.len())
                    .ok_or(Trap::ReturnDataOutOfBounds)?;
                let range = m.expand(&dest, &size, max_mem)?;
                m.charge(words(len))?;
                let Machine {
                    memory,
                    return_data,
                    ..
                } = m;
                memory[range].copy_from_slice(&return_data[start..end]);
            }
            Opcode::Pop => {
                m.pop()?;
            }
            Opcode::MLoad => {
                let offset = m.pop()?;
                let range = m.expand(&offset, &Word::from_u64(32), max_mem)?;
                let mut w = [0_u8; 32];
                w.copy_from_slice(&m.memory[range]);
                m.push(Word(w));
            }
            Opcode::MStore => {
                let (offset, value) = (m.pop()?, m.pop()?);
                let range = m.expand(&offset, &Word::from_u64(32), max_mem)?;
                m.memory[range].copy_from_slice(&value.0);
            }
            Opcode::SLoad => {
                let key = m.pop()?;
                let v = self.host.sload(&key);
                m.push(v);
            }
            Opcode::SStore => {
                let (key, value) = (m.pop()?, m.pop()?);
                self.host.sstore(key, value);
            }
            Opcode::Jump => {
                let dest = m.pop()?;
                return Ok(Step::Next(m.jump_target(dest)?));
            }
            Opcode::JumpI => {
                let (dest, cond) = (m.pop()?, m.pop()?);
                if !cond.is_zero() {
                    return Ok(Step::Next(m.jump_target(dest)?));
                }
            }
            Opcode::Gas => m.push(Word::from_u64(m.fuel)),
            Opcode::JumpDest => {}
            Opcode::Return => return Ok(Step::Halt(Outcome::Return(m.output(max_mem)?))),
            Opcode::Revert => return Ok(Step::Halt(Outcome::Revert(m.output(max_mem)?))),
            Opcode::DelegateCall => self.delegate_call(m, pc, trace_mask, trace)?,
            Opcode::Invalid => return Err(Trap::InvalidInstruction),
            _ => {
                let b = op.byte();
                if let Some(n) = push_width(b) {
                    let imm: [u8; 32] = load_padded(frame.code, Some(pc + 1));
                    let mut w = [0_u8; 32];
                    w[32 - n..].copy_from_slice(&imm[..n]);
                    m.push(Word(w));
                } else if (Opcode::Dup1.byte()..=Opcode::Dup16.byte()).contains(&b) {
                    let n = usize::from(b - Opcode::Dup1.byte()) + 1;
                    let w = m.stack[m.stack.len() - n];
                    m.push(w);
                } else if (Opcode::Swap1.byte()..=Opcode::Swap16.byte()).contains(&b) {
                    let n = usize::from(b - Opcode::Swap1.byte()) + 1;
                    let top = m.stack.len() - 1;
                    m.stack.swap(top, top - n);
                } else {
                    return Err(Trap::InvalidOpcode(b));
                }
            }
        }
        Ok(Step::Next(next))
    }

    fn delegate_call(
        &mut self,
        m: &mut Machine,
        pc: usize,
        trace_mask: TraceMask,
        trace: &mut Option<&mut dyn TraceSink>,
    ) -> Result<(), Trap> {
        let max_mem = self.limits.max_memory;
        let gas = m.pop()?;
        let target = m.pop()?.low_address();
        let (args_offset, args_size) = (m.pop()?, m.pop()?);
        let (ret_offset, ret_size) = (m.pop()?, m.pop()?);
        let args = m.expand(&args_offset, &args_size, max_mem)?;
        let ret = m.expand(&ret_offset, &ret_size, max_mem)?;

        // All but 1/64 of the remaining fuel.
        let forwarded = gas
            .to_u64()
            .unwrap_or(u64::MAX)
            .min(m.fuel - m.fuel / 64);
        let kind = ScopeKind::DelegateCall { target };
        if trace_mask.contains(TraceMask::CALL)
            && let Some(t) = trace.as_mut()
        {
            let t: &mut dyn TraceSink = &mut **t;
            t.scope_enter(kind, pc, forwarded);
        }

        let input = m.memory[args].to_vec();
        let success = match self.host.delegate_call(target, &input, forwarded) {
            Ok((outcome, used)) => {
                m.fuel -= used.min(forwarded);
                let ok = outcome.is_success();
                m.return_data = outcome.into_data();
                ok
            }
            Err(e) => {
                if e == HostError::Aborted {
                    m.fuel -= forwarded;
                }
                m.return_data.clear();
                false
            }
        };
        let n = ret.len().min(m.return_data.len());
        m.memory[ret.start..ret.start + n].copy_from_slice(&m.return_data[..n]);

        if trace_mask.contains(TraceMask::CALL)
            && let Some(t) = trace.as_mut()
        {
            let t: &mut dyn TraceSink = &mut **t;
            t.scope_exit(kind, pc, success);
        }
        m.push(flag(success));
        Ok(())
    }
}

impl Machine {
    fn jump_target(&self, dest: Word) -> Result<usize, Trap> {
        match dest.to_usize() {
            Some(pc) if self.jumpdests.get(pc) => Ok(pc),
            _ => Err(Trap::InvalidJump { dest }),
        }
    }
}

fn push_width(b: u8) -> Option<usize> {
    let lo = Opcode::Push0.byte();
    let hi = Opcode::Push32.byte();
    (lo..=hi).contains(&b).then(|| usize::from(b - lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::DispatcherImage;
    use crate::layout::CONSTRUCTOR_LEN;
    use alloc::collections::BTreeMap;
    use alloc::vec;

    #[derive(Default)]
    struct TestHost {
        storage: BTreeMap<Word, Word>,
        calls: Vec<(Address, Vec<u8>, u64)>,
        revert: bool,
        fail: Option<HostError>,
    }

    impl Host for TestHost {
        fn delegate_call(
            &mut self,
            target: Address,
            input: &[u8],
            fuel: u64,
        ) -> Result<(Outcome, u64), HostError> {
            self.calls.push((target, input.to_vec(), fuel));
            if let Some(e) = &self.fail {
                return Err(e.clone());
            }
            let echo = input.to_vec();
            if self.revert {
                Ok((Outcome::Revert(echo), 10))
            } else {
                Ok((Outcome::Return(echo), 10))
            }
        }

        fn sload(&mut self, key: &Word) -> Word {
            self.storage.get(key).copied().unwrap_or_default()
        }

        fn sstore(&mut self, key: Word, value: Word) {
            self.storage.insert(key, value);
        }
    }

    type RunResult = Result<(Outcome, u64), TrapInfo>;

    fn run(code: &[u8], input: &[u8], host: TestHost) -> (RunResult, TestHost) {
        let mut vm = Vm::new(host, Limits::default());
        let frame = Frame {
            code,
            input,
            address: Address::from_low_u64(0xaa),
            caller: Address::from_low_u64(0xcc),
        };
        let r = vm.run(&frame, TraceMask::NONE, None);
        (r, vm.into_host())
    }

    fn returned(r: RunResult) -> Vec<u8> {
        match r {
            Ok((Outcome::Return(d), _)) => d,
            other => panic!("expected return, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_and_return() {
        // PUSH1 2; PUSH1 3; ADD; PUSH0; MSTORE; PUSH1 32; PUSH0; RETURN
        let code = [0x60, 2, 0x60, 3, 0x01, 0x5f, 0x52, 0x60, 32, 0x5f, 0xf3];
        let (r, _) = run(&code, &[], TestHost::default());
        assert_eq!(returned(r), Word::from_u64(5).0.to_vec());
    }

    #[test]
    fn sub_and_compare_operand_order() {
        // PUSH1 3; PUSH1 10; SUB -> 7; DUP1; PUSH1 8; GT -> (8 > 7)
        let code = [
            0x60, 3, 0x60, 10, 0x03, 0x80, 0x60, 8, 0x11, 0x5f, 0x52, 0x60, 32, 0x5f, 0xf3,
        ];
        let (r, _) = run(&code, &[], TestHost::default());
        assert_eq!(returned(r), Word::ONE.0.to_vec());
    }

    #[test]
    fn running_off_the_end_stops() {
        let (r, _) = run(&[0x5f, 0x50], &[], TestHost::default());
        let (outcome, used) = r.unwrap();
        assert_eq!(outcome, Outcome::Return(Vec::new()));
        assert_eq!(used, 2);
    }

    #[test]
    fn calldata_reads_zero_fill() {
        // PUSH1 2; CALLDATALOAD; PUSH0; MSTORE; PUSH1 32; PUSH0; RETURN
        let code = [0x60, 2, 0x35, 0x5f, 0x52, 0x60, 32, 0x5f, 0xf3];
        let (r, _) = run(&code, &[1, 2, 3, 4], TestHost::default());
        let mut want = [0_u8; 32];
        want[..2].copy_from_slice(&[3, 4]);
        assert_eq!(returned(r), want.to_vec());
    }

    #[test]
    fn jumps_must_land_on_jumpdest_outside_push_data() {
        // PUSH1 4; JUMP; INVALID; JUMPDEST; STOP
        let ok = [0x60, 4, 0x56, 0xfe, 0x5b, 0x00];
        assert!(run(&ok, &[], TestHost::default()).0.is_ok());

        // PUSH1 1; JUMP  (target is PUSH data containing 0x5b)
        let bad = [0x60, 0x5b, 0x60, 1, 0x56];
        let (r, _) = run(&bad, &[], TestHost::default());
        assert_eq!(
            r.unwrap_err(),
            TrapInfo {
                pc: 4,
                trap: Trap::InvalidJump {
                    dest: Word::from_u64(1)
                }
            }
        );
    }

    #[test]
    fn traps() {
        let (r, _) = run(&[0x01], &[], TestHost::default());
        assert_eq!(r.unwrap_err().trap, Trap::StackUnderflow);
        let (r, _) = run(&[0x0c], &[], TestHost::default());
        assert_eq!(r.unwrap_err().trap, Trap::InvalidOpcode(0x0c));
        let (r, _) = run(&[0xfe], &[], TestHost::default());
        assert_eq!(r.unwrap_err().trap, Trap::InvalidInstruction);
        // PUSH1 1; PUSH0; PUSH0; RETURNDATACOPY: one byte out of an empty buffer.
        let (r, _) = run(&[0x60, 1, 0x5f, 0x5f, 0x3e], &[], TestHost::default());
        assert_eq!(r.unwrap_err().trap, Trap::ReturnDataOutOfBounds);
    }

    #[test]
    fn fuel_and_stack_limits() {
        // JUMPDEST; PUSH0; JUMP  (loops forever)
        let spin = [0x5b, 0x5f, 0x56];
        let mut vm = Vm::new(
            TestHost::default(),
            Limits {
                fuel: 100,
                ..Limits::default()
            },
        );
        let frame = Frame {
            code: &spin,
            input: &[],
            address: Address::ZERO,
            caller: Address::ZERO,
        };
        assert_eq!(
            vm.run(&frame, TraceMask::NONE, None).unwrap_err().trap,
            Trap::FuelExceeded
        );

        // JUMPDEST; PUSH0; PUSH0; JUMP  (grows the stack by one per lap)
        let grow = [0x5b, 0x5f, 0x5f, 0x56];
        let mut vm = Vm::new(
            TestHost::default(),
            Limits {
                max_stack: 8,
                ..Limits::default()
            },
        );
        let frame = Frame {
            code: &grow,
            ..frame
        };
        assert_eq!(
            vm.run(&frame, TraceMask::NONE, None).unwrap_err().trap,
            Trap::StackOverflow
        );
    }

    #[test]
    fn storage_goes_through_the_host() {
        // PUSH1 9; PUSH1 1; SSTORE; PUSH1 1; SLOAD; PUSH0; MSTORE; PUSH1 32; PUSH0; RETURN
        let code = [
            0x60, 9, 0x60, 1, 0x55, 0x60, 1, 0x54, 0x5f, 0x52, 0x60, 32, 0x5f, 0xf3,
        ];
        let (r, host) = run(&code, &[], TestHost::default());
        assert_eq!(returned(r), Word::from_u64(9).0.to_vec());
        assert_eq!(host.storage.get(&Word::ONE), Some(&Word::from_u64(9)));
    }

    #[test]
    fn gas_reports_remaining_fuel() {
        // GAS; PUSH0; MSTORE; PUSH1 32; PUSH0; RETURN
        let code = [0x5a, 0x5f, 0x52, 0x60, 32, 0x5f, 0xf3];
        let (r, _) = run(&code, &[], TestHost::default());
        let out = returned(r);
        let mut w = [0_u8; 32];
        w.copy_from_slice(&out);
        assert_eq!(Word(w).to_u64(), Some(Limits::default().fuel - 1));
    }

    #[test]
    fn constructor_returns_runtime() {
        let image = DispatcherImage::build(Address([0x11; 20]), b"abc").unwrap();
        let (r, _) = run(image.init_code(), &[], TestHost::default());
        assert_eq!(returned(r), image.runtime_code());
    }

    #[test]
    fn runtime_appends_config_and_forwards_verbatim() {
        let target = Address([0x11; 20]);
        let image = DispatcherImage::build(target, b"abc").unwrap();
        let runtime = &image.init_code()[CONSTRUCTOR_LEN..];

        let (r, host) = run(runtime, b"hello", TestHost::default());
        let mut want = b"hello".to_vec();
        want.extend_from_slice(b"abc");
        want.extend_from_slice(&[0, 5]);
        assert_eq!(returned(r), want);
        assert_eq!(host.calls.len(), 1);
        assert_eq!(host.calls[0].0, target);
        assert_eq!(host.calls[0].1, want);
        let forwarded = host.calls[0].2;
        assert!(forwarded < Limits::default().fuel);
        assert!(forwarded > Limits::default().fuel / 64 * 62);

        let (r, _) = run(
            runtime,
            b"hello",
            TestHost {
                revert: true,
                ..TestHost::default()
            },
        );
        assert_eq!(r.unwrap().0, Outcome::Revert(want));

        let (r, _) = run(
            runtime,
            b"hello",
            TestHost {
                fail: Some(HostError::Aborted),
                ..TestHost::default()
            },
        );
        let (outcome, used) = r.unwrap();
        assert_eq!(outcome, Outcome::Revert(vec![]));
        assert!(used > Limits::default().fuel / 64 * 62);
    }

    #[derive(Default)]
    struct Counter {
        runs: usize,
        instrs: usize,
        scopes: usize,
        ended_ok: bool,
    }

    impl TraceSink for Counter {
        fn mask(&self) -> TraceMask {
            TraceMask::ALL
        }

        fn run_start(&mut self, _code: &[u8], _input_len: usize) {
            self.runs += 1;
        }

        fn instr(&mut self, _pc: usize, _opcode: u8, _stack_depth: usize, _fuel: u64) {
            self.instrs += 1;
        }

        fn scope_enter(&mut self, _kind: ScopeKind, _pc: usize, _fuel: u64) {
            self.scopes += 1;
        }

        fn run_end(&mut self, _code: &[u8], outcome: TraceOutcome<'_>) {
            self.ended_ok = matches!(outcome, TraceOutcome::Return);
        }
    }

    #[test]
    fn trace_sink_sees_the_run() {
        let image = DispatcherImage::build(Address([0x11; 20]), &[]).unwrap();
        let mut vm = Vm::new(TestHost::default(), Limits::default());
        let frame = Frame {
            code: image.runtime_code(),
            input: &[],
            address: Address::ZERO,
            caller: Address::ZERO,
        };
        let mut sink = Counter::default();
        let mask = sink.mask();
        let (_, used) = vm.run(&frame, mask, Some(&mut sink)).unwrap();
        assert_eq!(sink.runs, 1);
        assert_eq!(sink.scopes, 1);
        assert!(sink.ended_ok);
        // 28 instructions in the runtime body on the success path.
        assert_eq!(sink.instrs, 28);
        assert!(used >= 28);
    }
}
