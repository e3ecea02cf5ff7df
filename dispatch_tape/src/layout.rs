// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher image layout.
//!
//! ```text
//! init code:  [constructor 10][runtime body 53][config L][extraLength 2]
//! runtime:                    [runtime body 53][config L][extraLength 2]
//! ```
//!
//! `extraLength = L + 2` is stored twice: as the `PUSH2` immediate the runtime body uses to size
//! its code copy, and as the big-endian trailer that target-side readers find at the end of every
//! forwarded call. The constructor's `PUSH2 runSize` holds `53 + extraLength`.
//!
//! Constructor (10 bytes):
//!
//! ```text
//! 61 rrrr   PUSH2 runSize      r
//! 3d        RETURNDATASIZE     0 r
//! 81        DUP2               r 0 r
//! 60 0a     PUSH1 0x0a         10 r 0 r
//! 3d        RETURNDATASIZE     0 10 r 0 r
//! 39        CODECOPY           0 r           mem[0..r) = runtime
//! f3        RETURN
//! ```
//!
//! Runtime body (53 bytes, pcs relative to the runtime):
//!
//! ```text
//! 00 3d3d3d3d  RETURNDATASIZE x4   0 0 0 0
//! 04 61 eeee   PUSH2 extra         e 0 0 0 0
//! 07 80        DUP1                e e 0 0 0 0
//! 08 60 35     PUSH1 0x35          0x35 e e 0 0 0 0
//! 0a 36        CALLDATASIZE        cds 0x35 e e 0 0 0 0
//! 0b 39        CODECOPY            e 0 0 0 0      mem[cds..cds+e) = config ++ trailer
//! 0c 36        CALLDATASIZE        cds e 0 0 0 0
//! 0d 3d3d      RETURNDATASIZE x2   0 0 cds e 0 0 0 0
//! 0f 37        CALLDATACOPY        e 0 0 0 0      mem[0..cds) = calldata
//! 10 36        CALLDATASIZE        cds e 0 0 0 0
//! 11 01        ADD                 cds+e 0 0 0 0
//! 12 3d        RETURNDATASIZE      0 cds+e 0 0 0 0
//! 13 73 t*20   PUSH20 target       t 0 cds+e 0 0 0 0
//! 28 5a        GAS                 g t 0 cds+e 0 0 0 0
//! 29 f4        DELEGATECALL        ok 0 0
//! 2a 3d3d      RETURNDATASIZE x2   rds rds ok 0 0
//! 2c 93        SWAP4               0 rds ok 0 rds
//! 2d 80        DUP1                0 0 rds ok 0 rds
//! 2e 3e        RETURNDATACOPY      ok 0 rds       mem[0..rds) = return data
//! 2f 60 33     PUSH1 0x33          0x33 ok 0 rds
//! 31 57        JUMPI               0 rds
//! 32 fd        REVERT
//! 33 5b        JUMPDEST            0 rds
//! 34 f3        RETURN
//! ```

use core::fmt;

/// Length of the copy-and-return constructor.
pub const CONSTRUCTOR_LEN: usize = 10;

/// Length of the runtime body (everything before the config bytes in the deployed code).
pub const RUNTIME_LEN: usize = 53;

/// Length of constructor + runtime body.
pub const PREFIX_LEN: usize = CONSTRUCTOR_LEN + RUNTIME_LEN;

/// Length of the `extraLength` trailer.
pub const TRAILER_LEN: usize = 2;

/// Offset of the config bytes within the deployed (runtime) code.
pub const CONFIG_CODE_OFFSET: usize = RUNTIME_LEN;

/// Largest config blob for which both `extraLength` and `runSize` fit their 16-bit immediates.
pub const MAX_CONFIG_LEN: usize = u16::MAX as usize - RUNTIME_LEN - TRAILER_LEN;

/// Byte offset of the big-endian `runSize` immediate within the init code.
pub const RUN_SIZE_AT: usize = 1;

/// Byte offset of the big-endian `extraLength` immediate within the init code.
pub const EXTRA_LENGTH_AT: usize = CONSTRUCTOR_LEN + 5;

/// Byte offset of the 20-byte target within the init code.
pub const TARGET_AT: usize = CONSTRUCTOR_LEN + 20;

/// Runtime pc of the `JUMPDEST` taken when the delegated call succeeds.
pub const SUCCESS_JUMPDEST: usize = 0x33;

/// The constructor and runtime body with all holes zeroed.
#[rustfmt::skip]
pub const TEMPLATE: [u8; PREFIX_LEN] = [
    // constructor
    0x61, 0x00, 0x00, 0x3d, 0x81, 0x60, 0x0a, 0x3d, 0x39, 0xf3,
    // runtime: copy config + trailer from code, then calldata
    0x3d, 0x3d, 0x3d, 0x3d, 0x61, 0x00, 0x00, 0x80, 0x60, 0x35, 0x36, 0x39, 0x36, 0x3d, 0x3d,
    0x37, 0x36, 0x01, 0x3d,
    // runtime: PUSH20 target
    0x73, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // runtime: delegate and forward the result
    0x5a, 0xf4, 0x3d, 0x3d, 0x93, 0x80, 0x3e, 0x60, 0x33, 0x57, 0xfd, 0x5b, 0xf3,
];

/// Returns `true` if `at` is inside one of the template's holes.
#[must_use]
pub const fn is_template_hole(at: usize) -> bool {
    (at >= RUN_SIZE_AT && at < RUN_SIZE_AT + 2)
        || (at >= EXTRA_LENGTH_AT && at < EXTRA_LENGTH_AT + 2)
        || (at >= TARGET_AT && at < TARGET_AT + 20)
}

/// A layout constraint was violated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The config blob cannot be described by the 16-bit size immediates.
    ConfigTooLarge {
        /// Length of the rejected blob.
        len: usize,
    },
    /// A scratch window did not leave enough room before the config bytes.
    MissingHeadroom {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
    /// A scratch window did not leave enough room after the config bytes.
    MissingTailroom {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
    /// The config range does not lie inside the buffer.
    InvalidWindow,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigTooLarge { len } => {
                write!(f, "config of {len} bytes exceeds the maximum of {MAX_CONFIG_LEN}")
            }
            Self::MissingHeadroom { needed, available } => {
                write!(f, "scratch headroom too small (need {needed}, have {available})")
            }
            Self::MissingTailroom { needed, available } => {
                write!(f, "scratch tailroom too small (need {needed}, have {available})")
            }
            Self::InvalidWindow => write!(f, "config range outside buffer"),
        }
    }
}

impl core::error::Error for LayoutError {}

/// Returns `extraLength` (`len + 2`) for a config of `len` bytes.
pub fn extra_length(len: usize) -> Result<u16, LayoutError> {
    if len > MAX_CONFIG_LEN {
        return Err(LayoutError::ConfigTooLarge { len });
    }
    u16::try_from(len + TRAILER_LEN).map_err(|_| LayoutError::ConfigTooLarge { len })
}

/// Returns the deployed code size (`53 + extraLength`) for a config of `len` bytes.
pub fn run_size(len: usize) -> Result<u16, LayoutError> {
    let extra = extra_length(len)?;
    u16::try_from(RUNTIME_LEN + usize::from(extra)).map_err(|_| LayoutError::ConfigTooLarge { len })
}

/// Returns the init code size (`63 + extraLength`) for a config of `len` bytes.
pub fn init_code_len(len: usize) -> Result<usize, LayoutError> {
    Ok(PREFIX_LEN + usize::from(extra_length(len)?))
}
