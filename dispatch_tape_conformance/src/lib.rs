// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance tests for `dispatch_tape`. The tests live in `tests/`.
