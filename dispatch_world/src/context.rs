// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native programs and the context they run in.

use dispatch_tape::args::Args;
use dispatch_tape::host::{AddressPredictor, Deployer};
use dispatch_tape::vm::Outcome;
use dispatch_tape::word::{Address, Word};

use crate::world::{CallError, World};

/// What a [`Program`] answers: `Ok` returns data, `Err` reverts with it.
pub type Reply = Result<Vec<u8>, Vec<u8>>;

/// Code implemented in Rust rather than bytecode.
///
/// `Ok` returns the bytes to the caller; `Err` reverts with them, discarding every state change
/// the invocation made.
pub trait Program {
    /// Handles one call.
    fn invoke(&self, ctx: &mut CallContext<'_>) -> Reply;
}

impl<F> Program for F
where
    F: Fn(&mut CallContext<'_>) -> Reply,
{
    fn invoke(&self, ctx: &mut CallContext<'_>) -> Reply {
        self(ctx)
    }
}

/// What a [`Program`] can see and do during one call.
///
/// Under a delegated call, [`CallContext::address`] is the dispatcher and
/// [`CallContext::caller`] is whoever called the dispatcher: the program runs on the
/// dispatcher's behalf and its storage is the dispatcher's.
pub struct CallContext<'a> {
    world: &'a mut World,
    input: &'a [u8],
    address: Address,
    caller: Address,
}

impl core::fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallContext")
            .field("address", &self.address)
            .field("caller", &self.caller)
            .field("input_len", &self.input.len())
            .finish_non_exhaustive()
    }
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        world: &'a mut World,
        input: &'a [u8],
        address: Address,
        caller: Address,
    ) -> Self {
        Self {
            world,
            input,
            address,
            caller,
        }
    }

    /// The full call input.
    #[must_use]
    pub fn input(&self) -> &[u8] {
        self.input
    }

    /// A config reader over the call input.
    #[must_use]
    pub fn args(&self) -> Args<'_> {
        Args::new(self.input)
    }

    /// The account this call runs as.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The account that made the call.
    #[must_use]
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Read-only view of the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &*self.world
    }

    /// Reads a storage slot of [`CallContext::address`].
    #[must_use]
    pub fn sload(&self, key: &Word) -> Word {
        self.world.storage(self.address, key)
    }

    /// Writes a storage slot of [`CallContext::address`].
    pub fn sstore(&mut self, key: Word, value: Word) {
        self.world.sstore(self.address, key, value);
    }

    /// Calls `to` as [`CallContext::address`].
    pub fn call(&mut self, to: Address, input: &[u8]) -> Result<Outcome, CallError> {
        let fuel = self.world.config().limits.fuel;
        self.world
            .execute(to, to, self.address, input, fuel)
            .map(|(outcome, _)| outcome)
    }

    /// Runs `target`'s code against this account, keeping the caller.
    pub fn delegate_call(&mut self, target: Address, input: &[u8]) -> Result<Outcome, CallError> {
        let fuel = self.world.config().limits.fuel;
        self.world
            .execute(target, self.address, self.caller, input, fuel)
            .map(|(outcome, _)| outcome)
    }
}

impl Deployer for CallContext<'_> {
    fn instantiate(&mut self, init_code: &[u8]) -> Address {
        self.world.instantiate_as(self.address, init_code, None)
    }

    fn instantiate_salted(&mut self, init_code: &[u8], salt: Word) -> Address {
        self.world.instantiate_as(self.address, init_code, Some(salt))
    }
}

impl AddressPredictor for CallContext<'_> {
    fn predict_salted(&self, init_code: &[u8], salt: Word) -> Address {
        World::predict_as(self.address, init_code, salt)
    }
}
