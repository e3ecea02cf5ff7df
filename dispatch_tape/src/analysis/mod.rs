// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Internal code analyses shared by the VM and the disassembler.

pub(crate) mod bitset;
pub(crate) mod jumpdest;
