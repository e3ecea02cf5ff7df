// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// @generated by dispatch_tape_codegen. Do not edit by hand.

/// Instruction opcodes understood by the interpreter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Halts with empty return data.
    Stop = 0x00,
    /// Wrapping addition.
    Add = 0x01,
    /// Wrapping subtraction (`a - b` with `a` on top).
    Sub = 0x03,
    /// Unsigned less-than (`a < b` with `a` on top).
    Lt = 0x10,
    /// Unsigned greater-than (`a > b` with `a` on top).
    Gt = 0x11,
    /// Equality.
    Eq = 0x14,
    /// Pushes `1` if the top item is zero, else `0`.
    IsZero = 0x15,
    /// Bitwise and.
    And = 0x16,
    /// Shift left; the shift amount is on top.
    Shl = 0x1B,
    /// Logical shift right; the shift amount is on top.
    Shr = 0x1C,
    /// Pushes the address whose storage is in use.
    Address = 0x30,
    /// Pushes the caller of the current frame.
    Caller = 0x33,
    /// Loads a 32-byte input word, zero-filled past the end.
    CallDataLoad = 0x35,
    /// Pushes the input size in bytes.
    CallDataSize = 0x36,
    /// Copies input bytes to memory, zero-filled past the end.
    CallDataCopy = 0x37,
    /// Pushes the size of the executing code.
    CodeSize = 0x38,
    /// Copies executing code to memory, zero-filled past the end.
    CodeCopy = 0x39,
    /// Pushes the size of the last call's return data.
    ReturnDataSize = 0x3D,
    /// Copies the last call's return data to memory.
    ReturnDataCopy = 0x3E,
    /// Discards the top item.
    Pop = 0x50,
    /// Loads a 32-byte memory word.
    MLoad = 0x51,
    /// Stores a 32-byte memory word.
    MStore = 0x52,
    /// Loads a storage slot of the current storage context.
    SLoad = 0x54,
    /// Stores a storage slot of the current storage context.
    SStore = 0x55,
    /// Unconditional jump to a `JUMPDEST`.
    Jump = 0x56,
    /// Conditional jump to a `JUMPDEST`.
    JumpI = 0x57,
    /// Pushes the remaining fuel.
    Gas = 0x5A,
    /// Marks a valid jump target.
    JumpDest = 0x5B,
    /// Pushes `0`.
    Push0 = 0x5F,
    /// Pushes a 1-byte big-endian immediate.
    Push1 = 0x60,
    /// Pushes a 2-byte big-endian immediate.
    Push2 = 0x61,
    /// Pushes a 3-byte big-endian immediate.
    Push3 = 0x62,
    /// Pushes a 4-byte big-endian immediate.
    Push4 = 0x63,
    /// Pushes a 5-byte big-endian immediate.
    Push5 = 0x64,
    /// Pushes a 6-byte big-endian immediate.
    Push6 = 0x65,
    /// Pushes a 7-byte big-endian immediate.
    Push7 = 0x66,
    /// Pushes a 8-byte big-endian immediate.
    Push8 = 0x67,
    /// Pushes a 9-byte big-endian immediate.
    Push9 = 0x68,
    /// Pushes a 10-byte big-endian immediate.
    Push10 = 0x69,
    /// Pushes a 11-byte big-endian immediate.
    Push11 = 0x6A,
    /// Pushes a 12-byte big-endian immediate.
    Push12 = 0x6B,
    /// Pushes a 13-byte big-endian immediate.
    Push13 = 0x6C,
    /// Pushes a 14-byte big-endian immediate.
    Push14 = 0x6D,
    /// Pushes a 15-byte big-endian immediate.
    Push15 = 0x6E,
    /// Pushes a 16-byte big-endian immediate.
    Push16 = 0x6F,
    /// Pushes a 17-byte big-endian immediate.
    Push17 = 0x70,
    /// Pushes a 18-byte big-endian immediate.
    Push18 = 0x71,
    /// Pushes a 19-byte big-endian immediate.
    Push19 = 0x72,
    /// Pushes a 20-byte big-endian immediate.
    Push20 = 0x73,
    /// Pushes a 21-byte big-endian immediate.
    Push21 = 0x74,
    /// Pushes a 22-byte big-endian immediate.
    Push22 = 0x75,
    /// Pushes a 23-byte big-endian immediate.
    Push23 = 0x76,
    /// Pushes a 24-byte big-endian immediate.
    Push24 = 0x77,
    /// Pushes a 25-byte big-endian immediate.
    Push25 = 0x78,
    /// Pushes a 26-byte big-endian immediate.
    Push26 = 0x79,
    /// Pushes a 27-byte big-endian immediate.
    Push27 = 0x7A,
    /// Pushes a 28-byte big-endian immediate.
    Push28 = 0x7B,
    /// Pushes a 29-byte big-endian immediate.
    Push29 = 0x7C,
    /// Pushes a 30-byte big-endian immediate.
    Push30 = 0x7D,
    /// Pushes a 31-byte big-endian immediate.
    Push31 = 0x7E,
    /// Pushes a 32-byte big-endian immediate.
    Push32 = 0x7F,
    /// Duplicates stack item 1.
    Dup1 = 0x80,
    /// Duplicates stack item 2.
    Dup2 = 0x81,
    /// Duplicates stack item 3.
    Dup3 = 0x82,
    /// Duplicates stack item 4.
    Dup4 = 0x83,
    /// Duplicates stack item 5.
    Dup5 = 0x84,
    /// Duplicates stack item 6.
    Dup6 = 0x85,
    /// Duplicates stack item 7.
    Dup7 = 0x86,
    /// Duplicates stack item 8.
    Dup8 = 0x87,
    /// Duplicates stack item 9.
    Dup9 = 0x88,
    /// Duplicates stack item 10.
    Dup10 = 0x89,
    /// Duplicates stack item 11.
    Dup11 = 0x8A,
    /// Duplicates stack item 12.
    Dup12 = 0x8B,
    /// Duplicates stack item 13.
    Dup13 = 0x8C,
    /// Duplicates stack item 14.
    Dup14 = 0x8D,
    /// Duplicates stack item 15.
    Dup15 = 0x8E,
    /// Duplicates stack item 16.
    Dup16 = 0x8F,
    /// Swaps the top item with stack item 2.
    Swap1 = 0x90,
    /// Swaps the top item with stack item 3.
    Swap2 = 0x91,
    /// Swaps the top item with stack item 4.
    Swap3 = 0x92,
    /// Swaps the top item with stack item 5.
    Swap4 = 0x93,
    /// Swaps the top item with stack item 6.
    Swap5 = 0x94,
    /// Swaps the top item with stack item 7.
    Swap6 = 0x95,
    /// Swaps the top item with stack item 8.
    Swap7 = 0x96,
    /// Swaps the top item with stack item 9.
    Swap8 = 0x97,
    /// Swaps the top item with stack item 10.
    Swap9 = 0x98,
    /// Swaps the top item with stack item 11.
    Swap10 = 0x99,
    /// Swaps the top item with stack item 12.
    Swap11 = 0x9A,
    /// Swaps the top item with stack item 13.
    Swap12 = 0x9B,
    /// Swaps the top item with stack item 14.
    Swap13 = 0x9C,
    /// Swaps the top item with stack item 15.
    Swap14 = 0x9D,
    /// Swaps the top item with stack item 16.
    Swap15 = 0x9E,
    /// Swaps the top item with stack item 17.
    Swap16 = 0x9F,
    /// Halts, returning a memory range.
    Return = 0xF3,
    /// Runs another program's code against the current storage context.
    DelegateCall = 0xF4,
    /// Halts, reverting state and returning a memory range.
    Revert = 0xFD,
    /// Designated invalid instruction.
    Invalid = 0xFE,
}

impl Opcode {
    /// Parses an opcode from its byte value.
    #[must_use]
    pub const fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Self::Stop),
            0x01 => Some(Self::Add),
            0x03 => Some(Self::Sub),
            0x10 => Some(Self::Lt),
            0x11 => Some(Self::Gt),
            0x14 => Some(Self::Eq),
            0x15 => Some(Self::IsZero),
            0x16 => Some(Self::And),
            0x1B => Some(Self::Shl),
            0x1C => Some(Self::Shr),
            0x30 => Some(Self::Address),
            0x33 => Some(Self::Caller),
            0x35 => Some(Self::CallDataLoad),
            0x36 => Some(Self::CallDataSize),
            0x37 => Some(Self::CallDataCopy),
            0x38 => Some(Self::CodeSize),
            0x39 => Some(Self::CodeCopy),
            0x3D => Some(Self::ReturnDataSize),
            0x3E => Some(Self::ReturnDataCopy),
            0x50 => Some(Self::Pop),
            0x51 => Some(Self::MLoad),
            0x52 => Some(Self::MStore),
            0x54 => Some(Self::SLoad),
            0x55 => Some(Self::SStore),
            0x56 => Some(Self::Jump),
            0x57 => Some(Self::JumpI),
            0x5A => Some(Self::Gas),
            0x5B => Some(Self::JumpDest),
            0x5F => Some(Self::Push0),
            0x60 => Some(Self::Push1),
            0x61 => Some(Self::Push2),
            0x62 => Some(Self::Push3),
            0x63 => Some(Self::Push4),
            0x64 => Some(Self::Push5),
            0x65 => Some(Self::Push6),
            0x66 => Some(Self::Push7),
            0x67 => Some(Self::Push8),
            0x68 => Some(Self::Push9),
            0x69 => Some(Self::Push10),
            0x6A => Some(Self::Push11),
            0x6B => Some(Self::Push12),
            0x6C => Some(Self::Push13),
            0x6D => Some(Self::Push14),
            0x6E => Some(Self::Push15),
            0x6F => Some(Self::Push16),
            0x70 => Some(Self::Push17),
            0x71 => Some(Self::Push18),
            0x72 => Some(Self::Push19),
            0x73 => Some(Self::Push20),
            0x74 => Some(Self::Push21),
            0x75 => Some(Self::Push22),
            0x76 => Some(Self::Push23),
            0x77 => Some(Self::Push24),
            0x78 => Some(Self::Push25),
            0x79 => Some(Self::Push26),
            0x7A => Some(Self::Push27),
            0x7B => Some(Self::Push28),
            0x7C => Some(Self::Push29),
            0x7D => Some(Self::Push30),
            0x7E => Some(Self::Push31),
            0x7F => Some(Self::Push32),
            0x80 => Some(Self::Dup1),
            0x81 => Some(Self::Dup2),
            0x82 => Some(Self::Dup3),
            0x83 => Some(Self::Dup4),
            0x84 => Some(Self::Dup5),
            0x85 => Some(Self::Dup6),
            0x86 => Some(Self::Dup7),
            0x87 => Some(Self::Dup8),
            0x88 => Some(Self::Dup9),
            0x89 => Some(Self::Dup10),
            0x8A => Some(Self::Dup11),
            0x8B => Some(Self::Dup12),
            0x8C => Some(Self::Dup13),
            0x8D => Some(Self::Dup14),
            0x8E => Some(Self::Dup15),
            0x8F => Some(Self::Dup16),
            0x90 => Some(Self::Swap1),
            0x91 => Some(Self::Swap2),
            0x92 => Some(Self::Swap3),
            0x93 => Some(Self::Swap4),
            0x94 => Some(Self::Swap5),
            0x95 => Some(Self::Swap6),
            0x96 => Some(Self::Swap7),
            0x97 => Some(Self::Swap8),
            0x98 => Some(Self::Swap9),
            0x99 => Some(Self::Swap10),
            0x9A => Some(Self::Swap11),
            0x9B => Some(Self::Swap12),
            0x9C => Some(Self::Swap13),
            0x9D => Some(Self::Swap14),
            0x9E => Some(Self::Swap15),
            0x9F => Some(Self::Swap16),
            0xF3 => Some(Self::Return),
            0xF4 => Some(Self::DelegateCall),
            0xFD => Some(Self::Revert),
            0xFE => Some(Self::Invalid),
            _ => None,
        }
    }

    /// Returns the assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Stop => "STOP",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Eq => "EQ",
            Self::IsZero => "ISZERO",
            Self::And => "AND",
            Self::Shl => "SHL",
            Self::Shr => "SHR",
            Self::Address => "ADDRESS",
            Self::Caller => "CALLER",
            Self::CallDataLoad => "CALLDATALOAD",
            Self::CallDataSize => "CALLDATASIZE",
            Self::CallDataCopy => "CALLDATACOPY",
            Self::CodeSize => "CODESIZE",
            Self::CodeCopy => "CODECOPY",
            Self::ReturnDataSize => "RETURNDATASIZE",
            Self::ReturnDataCopy => "RETURNDATACOPY",
            Self::Pop => "POP",
            Self::MLoad => "MLOAD",
            Self::MStore => "MSTORE",
            Self::SLoad => "SLOAD",
            Self::SStore => "SSTORE",
            Self::Jump => "JUMP",
            Self::JumpI => "JUMPI",
            Self::Gas => "GAS",
            Self::JumpDest => "JUMPDEST",
            Self::Push0 => "PUSH0",
            Self::Push1 => "PUSH1",
            Self::Push2 => "PUSH2",
            Self::Push3 => "PUSH3",
            Self::Push4 => "PUSH4",
            Self::Push5 => "PUSH5",
            Self::Push6 => "PUSH6",
            Self::Push7 => "PUSH7",
            Self::Push8 => "PUSH8",
            Self::Push9 => "PUSH9",
            Self::Push10 => "PUSH10",
            Self::Push11 => "PUSH11",
            Self::Push12 => "PUSH12",
            Self::Push13 => "PUSH13",
            Self::Push14 => "PUSH14",
            Self::Push15 => "PUSH15",
            Self::Push16 => "PUSH16",
            Self::Push17 => "PUSH17",
            Self::Push18 => "PUSH18",
            Self::Push19 => "PUSH19",
            Self::Push20 => "PUSH20",
            Self::Push21 => "PUSH21",
            Self::Push22 => "PUSH22",
            Self::Push23 => "PUSH23",
            Self::Push24 => "PUSH24",
            Self::Push25 => "PUSH25",
            Self::Push26 => "PUSH26",
            Self::Push27 => "PUSH27",
            Self::Push28 => "PUSH28",
            Self::Push29 => "PUSH29",
            Self::Push30 => "PUSH30",
            Self::Push31 => "PUSH31",
            Self::Push32 => "PUSH32",
            Self::Dup1 => "DUP1",
            Self::Dup2 => "DUP2",
            Self::Dup3 => "DUP3",
            Self::Dup4 => "DUP4",
            Self::Dup5 => "DUP5",
            Self::Dup6 => "DUP6",
            Self::Dup7 => "DUP7",
            Self::Dup8 => "DUP8",
            Self::Dup9 => "DUP9",
            Self::Dup10 => "DUP10",
            Self::Dup11 => "DUP11",
            Self::Dup12 => "DUP12",
            Self::Dup13 => "DUP13",
            Self::Dup14 => "DUP14",
            Self::Dup15 => "DUP15",
            Self::Dup16 => "DUP16",
            Self::Swap1 => "SWAP1",
            Self::Swap2 => "SWAP2",
            Self::Swap3 => "SWAP3",
            Self::Swap4 => "SWAP4",
            Self::Swap5 => "SWAP5",
            Self::Swap6 => "SWAP6",
            Self::Swap7 => "SWAP7",
            Self::Swap8 => "SWAP8",
            Self::Swap9 => "SWAP9",
            Self::Swap10 => "SWAP10",
            Self::Swap11 => "SWAP11",
            Self::Swap12 => "SWAP12",
            Self::Swap13 => "SWAP13",
            Self::Swap14 => "SWAP14",
            Self::Swap15 => "SWAP15",
            Self::Swap16 => "SWAP16",
            Self::Return => "RETURN",
            Self::DelegateCall => "DELEGATECALL",
            Self::Revert => "REVERT",
            Self::Invalid => "INVALID",
        }
    }

    /// Returns the number of immediate bytes that follow the opcode byte.
    #[must_use]
    pub const fn immediate_len(self) -> usize {
        match self {
            Self::Push1 => 1,
            Self::Push2 => 2,
            Self::Push3 => 3,
            Self::Push4 => 4,
            Self::Push5 => 5,
            Self::Push6 => 6,
            Self::Push7 => 7,
            Self::Push8 => 8,
            Self::Push9 => 9,
            Self::Push10 => 10,
            Self::Push11 => 11,
            Self::Push12 => 12,
            Self::Push13 => 13,
            Self::Push14 => 14,
            Self::Push15 => 15,
            Self::Push16 => 16,
            Self::Push17 => 17,
            Self::Push18 => 18,
            Self::Push19 => 19,
            Self::Push20 => 20,
            Self::Push21 => 21,
            Self::Push22 => 22,
            Self::Push23 => 23,
            Self::Push24 => 24,
            Self::Push25 => 25,
            Self::Push26 => 26,
            Self::Push27 => 27,
            Self::Push28 => 28,
            Self::Push29 => 29,
            Self::Push30 => 30,
            Self::Push31 => 31,
            Self::Push32 => 32,
            _ => 0,
        }
    }

    /// Returns the number of stack items the opcode consumes.
    #[must_use]
    pub const fn stack_in(self) -> usize {
        match self {
            Self::Add => 2,
            Self::Sub => 2,
            Self::Lt => 2,
            Self::Gt => 2,
            Self::Eq => 2,
            Self::IsZero => 1,
            Self::And => 2,
            Self::Shl => 2,
            Self::Shr => 2,
            Self::CallDataLoad => 1,
            Self::CallDataCopy => 3,
            Self::CodeCopy => 3,
            Self::ReturnDataCopy => 3,
            Self::Pop => 1,
            Self::MLoad => 1,
            Self::MStore => 2,
            Self::SLoad => 1,
            Self::SStore => 2,
            Self::Jump => 1,
            Self::JumpI => 2,
            Self::Dup1 => 1,
            Self::Dup2 => 2,
            Self::Dup3 => 3,
            Self::Dup4 => 4,
            Self::Dup5 => 5,
            Self::Dup6 => 6,
            Self::Dup7 => 7,
            Self::Dup8 => 8,
            Self::Dup9 => 9,
            Self::Dup10 => 10,
            Self::Dup11 => 11,
            Self::Dup12 => 12,
            Self::Dup13 => 13,
            Self::Dup14 => 14,
            Self::Dup15 => 15,
            Self::Dup16 => 16,
            Self::Swap1 => 2,
            Self::Swap2 => 3,
            Self::Swap3 => 4,
            Self::Swap4 => 5,
            Self::Swap5 => 6,
            Self::Swap6 => 7,
            Self::Swap7 => 8,
            Self::Swap8 => 9,
            Self::Swap9 => 10,
            Self::Swap10 => 11,
            Self::Swap11 => 12,
            Self::Swap12 => 13,
            Self::Swap13 => 14,
            Self::Swap14 => 15,
            Self::Swap15 => 16,
            Self::Swap16 => 17,
            Self::Return => 2,
            Self::DelegateCall => 6,
            Self::Revert => 2,
            _ => 0,
        }
    }

    /// Returns the number of stack items the opcode leaves behind.
    #[must_use]
    pub const fn stack_out(self) -> usize {
        match self {
            Self::Add => 1,
            Self::Sub => 1,
            Self::Lt => 1,
            Self::Gt => 1,
            Self::Eq => 1,
            Self::IsZero => 1,
            Self::And => 1,
            Self::Shl => 1,
            Self::Shr => 1,
            Self::Address => 1,
            Self::Caller => 1,
            Self::CallDataLoad => 1,
            Self::CallDataSize => 1,
            Self::CodeSize => 1,
            Self::ReturnDataSize => 1,
            Self::MLoad => 1,
            Self::SLoad => 1,
            Self::Gas => 1,
            Self::Push0 => 1,
            Self::Push1 => 1,
            Self::Push2 => 1,
            Self::Push3 => 1,
            Self::Push4 => 1,
            Self::Push5 => 1,
            Self::Push6 => 1,
            Self::Push7 => 1,
            Self::Push8 => 1,
            Self::Push9 => 1,
            Self::Push10 => 1,
            Self::Push11 => 1,
            Self::Push12 => 1,
            Self::Push13 => 1,
            Self::Push14 => 1,
            Self::Push15 => 1,
            Self::Push16 => 1,
            Self::Push17 => 1,
            Self::Push18 => 1,
            Self::Push19 => 1,
            Self::Push20 => 1,
            Self::Push21 => 1,
            Self::Push22 => 1,
            Self::Push23 => 1,
            Self::Push24 => 1,
            Self::Push25 => 1,
            Self::Push26 => 1,
            Self::Push27 => 1,
            Self::Push28 => 1,
            Self::Push29 => 1,
            Self::Push30 => 1,
            Self::Push31 => 1,
            Self::Push32 => 1,
            Self::Dup1 => 2,
            Self::Dup2 => 3,
            Self::Dup3 => 4,
            Self::Dup4 => 5,
            Self::Dup5 => 6,
            Self::Dup6 => 7,
            Self::Dup7 => 8,
            Self::Dup8 => 9,
            Self::Dup9 => 10,
            Self::Dup10 => 11,
            Self::Dup11 => 12,
            Self::Dup12 => 13,
            Self::Dup13 => 14,
            Self::Dup14 => 15,
            Self::Dup15 => 16,
            Self::Dup16 => 17,
            Self::Swap1 => 2,
            Self::Swap2 => 3,
            Self::Swap3 => 4,
            Self::Swap4 => 5,
            Self::Swap5 => 6,
            Self::Swap6 => 7,
            Self::Swap7 => 8,
            Self::Swap8 => 9,
            Self::Swap9 => 10,
            Self::Swap10 => 11,
            Self::Swap11 => 12,
            Self::Swap12 => 13,
            Self::Swap13 => 14,
            Self::Swap14 => 15,
            Self::Swap15 => 16,
            Self::Swap16 => 17,
            Self::DelegateCall => 1,
            _ => 0,
        }
    }

    /// Returns `true` if the opcode ends a basic block.
    #[must_use]
    pub const fn is_terminator(self) -> bool {
        matches!(
            self,
            Self::Stop
                | Self::Jump
                | Self::JumpI
                | Self::Return
                | Self::Revert
                | Self::Invalid
        )
    }
}
