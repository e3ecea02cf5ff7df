// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `dispatch_tape`. Run them with `cargo bench -p dispatch_tape_wind_tunnel`.
