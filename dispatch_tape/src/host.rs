// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host interfaces.
//!
//! The interpreter delegates everything outside the running frame to an embedder-provided
//! [`Host`]: storage of the executing account and delegated calls into other code. Program
//! creation is a separate, narrower seam: [`Deployer`] turns an init-code image into a new
//! identifier, and that is all the factory needs.

use core::fmt;

use crate::vm::Outcome;
use crate::word::{Address, Word};

/// Errors a host can report for a delegated call.
///
/// A delegated call that fails this way looks like a revert with empty return data to the code
/// that made it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// Nested calls went deeper than the host allows.
    DepthExceeded,
    /// The callee ran out of fuel or trapped.
    Aborted,
    /// The host failed for its own reasons.
    Failed,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthExceeded => write!(f, "call depth exceeded"),
            Self::Aborted => write!(f, "callee aborted"),
            Self::Failed => write!(f, "host call failed"),
        }
    }
}

impl core::error::Error for HostError {}

/// The environment of one executing frame.
///
/// A `Host` is bound to the account the frame runs as: `sload`/`sstore` address that account's
/// storage, and `delegate_call` runs foreign code against it.
pub trait Host {
    /// Runs `target`'s code with `input`, keeping the current account's storage and identity.
    ///
    /// `fuel` is the budget handed to the callee. Returns the callee's outcome and the fuel it
    /// consumed.
    fn delegate_call(
        &mut self,
        target: Address,
        input: &[u8],
        fuel: u64,
    ) -> Result<(Outcome, u64), HostError>;

    /// Reads a storage slot of the current account.
    fn sload(&mut self, key: &Word) -> Word;

    /// Writes a storage slot of the current account.
    fn sstore(&mut self, key: Word, value: Word);
}

/// Turns init code into a live program.
pub trait Deployer {
    /// Runs `init_code` and installs what it returns under a fresh identifier.
    ///
    /// Returns [`Address::ZERO`] on failure.
    fn instantiate(&mut self, init_code: &[u8]) -> Address;

    /// Like [`Deployer::instantiate`], but the identifier is a function of `init_code` and `salt`.
    ///
    /// Returns [`Address::ZERO`] on failure, including when the identifier is already taken.
    fn instantiate_salted(&mut self, init_code: &[u8], salt: Word) -> Address;
}

/// Computes salted identifiers ahead of instantiation.
pub trait AddressPredictor {
    /// Returns the identifier [`Deployer::instantiate_salted`] would assign.
    fn predict_salted(&self, init_code: &[u8], salt: Word) -> Address;
}

/// A stable 64-bit digest of some bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeHash(pub u64);

/// Computes the digest of `code`.
#[must_use]
pub fn code_hash(code: &[u8]) -> CodeHash {
    let mut h = Fnv1a64::new();
    h.update(b"dispatch_tape:code\0");
    h.update(&(code.len() as u64).to_le_bytes());
    h.update(code);
    CodeHash(h.finish())
}

/// Derives the identifier for a salted instantiation by `deployer`.
///
/// Content-addressed: the same deployer, salt and init code always give the same identifier.
#[must_use]
pub fn salted_address(deployer: Address, salt: &Word, init_code: &[u8]) -> Address {
    let digest = code_hash(init_code);
    let mut out = [0_u8; Address::LEN];
    for (lane, chunk) in out.chunks_mut(8).enumerate() {
        let mut h = Fnv1a64::new();
        h.update(b"dispatch_tape:salted\0");
        h.update(&[lane as u8]);
        h.update(deployer.as_bytes());
        h.update(&salt.0);
        h.update(&digest.0.to_le_bytes());
        let v = h.finish().to_be_bytes();
        chunk.copy_from_slice(&v[..chunk.len()]);
    }
    Address(out)
}

/// Derives the identifier for the `nonce`-th plain instantiation by `deployer`.
#[must_use]
pub fn sequential_address(deployer: Address, nonce: u64) -> Address {
    let mut out = [0_u8; Address::LEN];
    for (lane, chunk) in out.chunks_mut(8).enumerate() {
        let mut h = Fnv1a64::new();
        h.update(b"dispatch_tape:sequential\0");
        h.update(&[lane as u8]);
        h.update(deployer.as_bytes());
        h.update(&nonce.to_le_bytes());
        let v = h.finish().to_be_bytes();
        chunk.copy_from_slice(&v[..chunk.len()]);
    }
    Address(out)
}

#[derive(Copy, Clone, Debug)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self(Self::OFFSET)
    }

    fn update(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }

    fn finish(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn code_hash_is_content_addressed() {
        assert_eq!(code_hash(b"abc"), code_hash(b"abc"));
        assert_ne!(code_hash(b"abc"), code_hash(b"abd"));
        assert_ne!(code_hash(b""), code_hash(b"\0"));
    }

    #[test]
    fn salted_addresses_depend_on_every_input() {
        let d = Address::from_low_u64(1);
        let s = Word::from_u64(7);
        let base = salted_address(d, &s, b"code");
        assert_eq!(base, salted_address(d, &s, b"code"));
        assert_ne!(base, salted_address(Address::from_low_u64(2), &s, b"code"));
        assert_ne!(base, salted_address(d, &Word::from_u64(8), b"code"));
        assert_ne!(base, salted_address(d, &s, b"cod3"));
        assert!(!base.is_zero());
    }

    #[test]
    fn sequential_addresses_are_distinct() {
        let d = Address::from_low_u64(1);
        let a: Vec<Address> = (0..64).map(|n| sequential_address(d, n)).collect();
        for (i, x) in a.iter().enumerate() {
            for y in &a[i + 1..] {
                assert_ne!(x, y);
            }
        }
        assert!(a.iter().all(|x| !x.is_zero()));
    }
}
