// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disassembler example.
//!
//! Run with:
//! `cargo run -p dispatch_tape --example disasm`

use dispatch_tape::args::Packer;
use dispatch_tape::disasm::disassemble;
use dispatch_tape::image::DispatcherImage;
use dispatch_tape::word::{Address, Word};

fn main() {
    let mut config = Packer::new();
    config
        .address(Address::from_low_u64(0xbeef))
        .uint256(Word::from_u64(1_000))
        .uint8(3);

    let image = DispatcherImage::build(Address::from_low_u64(0x1000), &config.finish()).unwrap();
    println!("{}", disassemble(image.init_code()));
    println!("{}", disassemble(image.runtime_code()));
}
