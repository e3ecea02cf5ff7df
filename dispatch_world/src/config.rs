// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use dispatch_tape::vm::Limits;

/// World configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Limits for every bytecode frame. Nested frames get the fuel their caller forwards.
    pub limits: Limits,
    /// Maximum nesting of calls and instantiations.
    pub max_call_depth: usize,
    /// Largest runtime code an instantiation may install, if bounded.
    pub max_code_size: Option<usize>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            max_call_depth: 1024,
            max_code_size: None,
        }
    }
}
