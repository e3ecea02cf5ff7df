// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `dispatch_tape`: minimal delegating dispatchers with immutable, code-embedded arguments.
//!
//! A dispatcher is a tiny program that forwards every call to one shared target with
//! `DELEGATECALL`, appending a config blob baked into its own code. Many dispatchers can share a
//! target while each carries different immutable parameters.
//!
//! - [`image`] and [`layout`] build the dispatcher's init code byte for byte.
//! - [`factory`] hands the image to a [`host::Deployer`] and reports failures.
//! - [`scratch`] builds the image in place around a caller's buffer and restores it afterwards.
//! - [`args`] is the target side: it finds the config in the forwarded call and reads fields.
//! - [`vm`] interprets the bytecode, so dispatchers can be run and tested without a chain.
//!
//! ## Example
//!
//! ```no_run
//! use dispatch_tape::args::{Args, Packer};
//! use dispatch_tape::image::DispatcherImage;
//! use dispatch_tape::word::Address;
//!
//! let target = Address::from_low_u64(0x1000);
//! let owner = Address::from_low_u64(0xbeef);
//!
//! let mut config = Packer::new();
//! config.address(owner).uint64(30);
//! let image = DispatcherImage::build(target, &config.finish())?;
//! assert_eq!(image.target(), target);
//!
//! // What the target sees when the dispatcher forwards a 4-byte call.
//! let mut input = vec![0xa9, 0x05, 0x9c, 0xbb];
//! input.extend_from_slice(&image.runtime_code()[53..]);
//! let args = Args::new(&input);
//! assert_eq!(args.offset(), 4);
//! assert_eq!(args.address(0), owner);
//! assert_eq!(args.uint64(20), 30);
//! # Ok::<(), dispatch_tape::layout::LayoutError>(())
//! ```

#![no_std]

extern crate alloc;

pub(crate) mod analysis;
pub mod args;
pub mod asm;
pub mod disasm;
pub mod factory;
pub mod format;
pub mod host;
pub mod image;
pub mod layout;
pub mod opcode;
pub mod scratch;
pub mod trace;
pub mod vm;
pub mod word;
