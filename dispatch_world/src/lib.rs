// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory host for `dispatch_tape` dispatchers.
//!
//! A [`World`] holds accounts with bytecode or native [`Program`]s and storage. It runs bytecode
//! on the `dispatch_tape` VM, deploys init code through its [`Deployer`] impl, and rolls back
//! every frame that reverts or traps. That is enough to deploy a dispatcher, call it, and watch
//! the shared target act on the dispatcher's storage with the dispatcher's config.
//!
//! ## Example
//!
//! ```no_run
//! use dispatch_tape::factory::create;
//! use dispatch_world::{CallContext, Reply, World};
//!
//! let mut world = World::default();
//! let target = world.install(|ctx: &mut CallContext<'_>| -> Reply {
//!     // The dispatcher appended its config; echo it back.
//!     let args = ctx.args();
//!     Ok(args.bytes(0, 3))
//! });
//! let dispatcher = create(&mut world, target, b"abc")?;
//! let out = world.call(World::ORIGIN, dispatcher, &[0x12, 0x34, 0x56, 0x78])?;
//! assert_eq!(out.data(), b"abc");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Events are emitted with `tracing`: calls, reverts, and instantiations at `debug`, frame entry
//! and exit at `trace`.
//!
//! [`Deployer`]: dispatch_tape::host::Deployer

mod config;
mod context;
mod journal;
mod world;

pub use config::WorldConfig;
pub use context::{CallContext, Program, Reply};
pub use world::{CallError, World};
