// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::rc::Rc;

use dispatch_tape::host::{
    AddressPredictor, Deployer, Host, HostError, salted_address, sequential_address,
};
use dispatch_tape::trace::TraceMask;
use dispatch_tape::vm::{Frame, Limits, Outcome, TrapInfo, Vm};
use dispatch_tape::word::{Address, Word};
use hashbrown::HashMap;

use crate::config::WorldConfig;
use crate::context::{CallContext, Program};
use crate::journal::{Change, Checkpoint, Journal};

#[derive(Clone, Default)]
enum Code {
    #[default]
    Empty,
    Bytecode(Rc<[u8]>),
    Native(Rc<dyn Program>),
}

#[derive(Default)]
struct Account {
    code: Code,
    nonce: u64,
    storage: HashMap<Word, Word>,
}

impl Account {
    fn is_occupied(&self) -> bool {
        self.nonce != 0 || !matches!(self.code, Code::Empty)
    }
}

/// Why a call could not complete.
///
/// A revert is not an error: it is reported as [`Outcome::Revert`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallError {
    /// Calls were nested deeper than [`WorldConfig::max_call_depth`].
    DepthExceeded,
    /// Bytecode trapped (this includes running out of fuel).
    Trap(TrapInfo),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthExceeded => write!(f, "call depth exceeded"),
            Self::Trap(t) => write!(f, "call aborted: {t}"),
        }
    }
}

impl core::error::Error for CallError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::DepthExceeded => None,
            Self::Trap(t) => Some(t),
        }
    }
}

/// An in-memory set of accounts that bytecode and native programs run against.
///
/// Every frame is transactional: a revert or an error undoes the frame's storage writes, nonce
/// bumps, and instantiations, while leaving the caller's earlier changes alone.
pub struct World {
    config: WorldConfig,
    accounts: HashMap<Address, Account>,
    journal: Journal,
    depth: usize,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("accounts", &self.accounts.len())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// The account that installs programs and deploys through the world's own [`Deployer`] impl.
    pub const ORIGIN: Address = Address::from_low_u64(0x6f72_6967_696e);

    /// Creates an empty world.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            accounts: HashMap::new(),
            journal: Journal::default(),
            depth: 0,
        }
    }

    /// The world's configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Installs a native program at a fresh address.
    pub fn install<P: Program + 'static>(&mut self, program: P) -> Address {
        self.install_at_fresh(Code::Native(Rc::new(program)))
    }

    /// Installs runtime bytecode at a fresh address, skipping any constructor.
    pub fn install_code(&mut self, code: impl Into<Vec<u8>>) -> Address {
        let code: Vec<u8> = code.into();
        self.install_at_fresh(Code::Bytecode(code.into()))
    }

    fn install_at_fresh(&mut self, code: Code) -> Address {
        let nonce = self.bump_nonce(Self::ORIGIN);
        let address = sequential_address(Self::ORIGIN, nonce);
        let account = self.accounts.entry(address).or_default();
        account.code = code;
        account.nonce = 1;
        tracing::debug!(%address, "installed program");
        address
    }

    /// The bytecode at `address`, or `None` for native programs and empty accounts.
    #[must_use]
    pub fn code(&self, address: Address) -> Option<&[u8]> {
        match &self.accounts.get(&address)?.code {
            Code::Bytecode(code) => Some(code),
            Code::Empty | Code::Native(_) => None,
        }
    }

    /// Returns `true` if `address` holds bytecode or a native program.
    #[must_use]
    pub fn has_code(&self, address: Address) -> bool {
        self.accounts
            .get(&address)
            .is_some_and(|a| !matches!(a.code, Code::Empty))
    }

    /// The nonce of `address` (zero for unknown accounts).
    #[must_use]
    pub fn nonce(&self, address: Address) -> u64 {
        self.accounts.get(&address).map_or(0, |a| a.nonce)
    }

    /// Reads a storage slot; unset slots read as zero.
    #[must_use]
    pub fn storage(&self, address: Address, key: &Word) -> Word {
        self.accounts
            .get(&address)
            .and_then(|a| a.storage.get(key))
            .copied()
            .unwrap_or(Word::ZERO)
    }

    pub(crate) fn sstore(&mut self, address: Address, key: Word, value: Word) {
        let account = self.accounts.entry(address).or_default();
        let prev = if value.is_zero() {
            account.storage.remove(&key)
        } else {
            account.storage.insert(key, value)
        };
        self.journal.record(Change::Storage { address, key, prev });
    }

    /// Calls `to` from `caller` with `input`, using the configured fuel budget.
    pub fn call(
        &mut self,
        caller: Address,
        to: Address,
        input: &[u8],
    ) -> Result<Outcome, CallError> {
        tracing::debug!(%caller, %to, input_len = input.len(), "call");
        let fuel = self.config.limits.fuel;
        let result = self
            .execute(to, to, caller, input, fuel)
            .map(|(outcome, _)| outcome);
        self.commit_if_outermost();
        result
    }

    /// Runs the code of `code_address` as `address`.
    ///
    /// Returns the outcome and the fuel consumed. Native programs consume no fuel.
    pub(crate) fn execute(
        &mut self,
        code_address: Address,
        address: Address,
        caller: Address,
        input: &[u8],
        fuel: u64,
    ) -> Result<(Outcome, u64), CallError> {
        if self.depth >= self.config.max_call_depth {
            tracing::debug!(depth = self.depth, %code_address, "call depth exceeded");
            return Err(CallError::DepthExceeded);
        }
        let code = self
            .accounts
            .get(&code_address)
            .map(|a| a.code.clone())
            .unwrap_or_default();

        let cp = self.journal.checkpoint();
        self.depth += 1;
        tracing::trace!(
            depth = self.depth,
            %code_address,
            %address,
            %caller,
            input_len = input.len(),
            "frame enter"
        );
        let result = match code {
            Code::Empty => Ok((Outcome::Return(Vec::new()), 0)),
            Code::Bytecode(code) => self.run_bytecode(&code, address, caller, input, fuel),
            Code::Native(program) => {
                let mut ctx = CallContext::new(self, input, address, caller);
                let outcome = match program.invoke(&mut ctx) {
                    Ok(data) => Outcome::Return(data),
                    Err(data) => Outcome::Revert(data),
                };
                Ok((outcome, 0))
            }
        };
        self.depth -= 1;

        match &result {
            Ok((Outcome::Return(data), used)) => {
                tracing::trace!(%address, fuel_used = used, return_len = data.len(), "frame returned");
            }
            Ok((Outcome::Revert(data), _)) => {
                tracing::debug!(%address, revert_len = data.len(), "frame reverted");
                self.rollback(cp);
            }
            Err(e) => {
                tracing::debug!(%address, error = %e, "frame aborted");
                self.rollback(cp);
            }
        }
        result
    }

    fn run_bytecode(
        &mut self,
        code: &[u8],
        address: Address,
        caller: Address,
        input: &[u8],
        fuel: u64,
    ) -> Result<(Outcome, u64), CallError> {
        let limits = Limits {
            fuel,
            ..self.config.limits
        };
        let frame = Frame {
            code,
            input,
            address,
            caller,
        };
        let host = FrameHost {
            world: self,
            address,
            caller,
        };
        let mut vm = Vm::new(host, limits);
        vm.run(&frame, TraceMask::NONE, None)
            .map_err(CallError::Trap)
    }

    /// Creates an account from `init_code` on behalf of `deployer`.
    ///
    /// Returns [`Address::ZERO`] on failure: a reverting or trapping constructor, an occupied
    /// address, runtime code over [`WorldConfig::max_code_size`], or too much nesting. A
    /// sequential deployer's nonce stays spent after a failed constructor.
    pub(crate) fn instantiate_as(
        &mut self,
        deployer: Address,
        init_code: &[u8],
        salt: Option<Word>,
    ) -> Address {
        if self.depth >= self.config.max_call_depth {
            tracing::debug!(%deployer, "instantiation too deep");
            return Address::ZERO;
        }
        let address = match salt {
            Some(salt) => salted_address(deployer, &salt, init_code),
            None => {
                let nonce = self.bump_nonce(deployer);
                sequential_address(deployer, nonce)
            }
        };
        if self.accounts.get(&address).is_some_and(Account::is_occupied) {
            tracing::debug!(%deployer, %address, "instantiation collided with an existing account");
            return Address::ZERO;
        }

        let cp = self.journal.checkpoint();
        let account = self.accounts.entry(address).or_default();
        account.nonce = 1;
        self.journal.record(Change::Created { address });

        let fuel = self.config.limits.fuel;
        self.depth += 1;
        let result = self.run_bytecode(init_code, address, deployer, &[], fuel);
        self.depth -= 1;

        let runtime = match result {
            Ok((Outcome::Return(runtime), _)) => runtime,
            Ok((Outcome::Revert(_), _)) => {
                tracing::debug!(%deployer, %address, "constructor reverted");
                self.rollback(cp);
                return Address::ZERO;
            }
            Err(e) => {
                tracing::debug!(%deployer, %address, error = %e, "constructor aborted");
                self.rollback(cp);
                return Address::ZERO;
            }
        };
        if let Some(max) = self.config.max_code_size
            && runtime.len() > max
        {
            tracing::debug!(%address, len = runtime.len(), max, "runtime code too large");
            self.rollback(cp);
            return Address::ZERO;
        }

        if let Some(account) = self.accounts.get_mut(&address) {
            account.code = Code::Bytecode(runtime.into());
        }
        tracing::debug!(%deployer, %address, salted = salt.is_some(), "instantiated");
        address
    }

    pub(crate) fn predict_as(deployer: Address, init_code: &[u8], salt: Word) -> Address {
        salted_address(deployer, &salt, init_code)
    }

    fn bump_nonce(&mut self, address: Address) -> u64 {
        let account = self.accounts.entry(address).or_default();
        let prev = account.nonce;
        account.nonce = prev.wrapping_add(1);
        self.journal.record(Change::Nonce { address, prev });
        prev
    }

    fn rollback(&mut self, cp: Checkpoint) {
        for change in self.journal.unwind(cp) {
            match change {
                Change::Storage { address, key, prev } => {
                    if let Some(account) = self.accounts.get_mut(&address) {
                        match prev {
                            Some(v) => {
                                account.storage.insert(key, v);
                            }
                            None => {
                                account.storage.remove(&key);
                            }
                        }
                    }
                }
                Change::Created { address } => {
                    self.accounts.remove(&address);
                }
                Change::Nonce { address, prev } => {
                    if let Some(account) = self.accounts.get_mut(&address) {
                        account.nonce = prev;
                    }
                }
            }
        }
    }

    fn commit_if_outermost(&mut self) {
        if self.depth == 0 {
            tracing::trace!(changes = self.journal.len(), "commit");
            self.journal.clear();
        }
    }
}

impl Deployer for World {
    fn instantiate(&mut self, init_code: &[u8]) -> Address {
        let address = self.instantiate_as(Self::ORIGIN, init_code, None);
        self.commit_if_outermost();
        address
    }

    fn instantiate_salted(&mut self, init_code: &[u8], salt: Word) -> Address {
        let address = self.instantiate_as(Self::ORIGIN, init_code, Some(salt));
        self.commit_if_outermost();
        address
    }
}

impl AddressPredictor for World {
    fn predict_salted(&self, init_code: &[u8], salt: Word) -> Address {
        Self::predict_as(Self::ORIGIN, init_code, salt)
    }
}

/// The [`Host`] a bytecode frame sees: storage of its own account, and delegated calls that keep
/// its account and caller.
struct FrameHost<'w> {
    world: &'w mut World,
    address: Address,
    caller: Address,
}

impl Host for FrameHost<'_> {
    fn delegate_call(
        &mut self,
        target: Address,
        input: &[u8],
        fuel: u64,
    ) -> Result<(Outcome, u64), HostError> {
        self.world
            .execute(target, self.address, self.caller, input, fuel)
            .map_err(|e| match e {
                CallError::DepthExceeded => HostError::DepthExceeded,
                CallError::Trap(_) => HostError::Aborted,
            })
    }

    fn sload(&mut self, key: &Word) -> Word {
        self.world.storage(self.address, key)
    }

    fn sstore(&mut self, key: Word, value: Word) {
        self.world.sstore(self.address, key, value);
    }
}
