// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Many vaults, one implementation.
//!
//! Shows:
//! - One native vault program shared by several dispatchers
//! - Per-vault immutable config (owner, fee) read from the forwarded call
//! - Per-vault storage, with failed withdrawals rolled back
//! - A salted vault at a predicted address, and the disassembly of a deployed dispatcher
//!
//! Run with `RUST_LOG=dispatch_world=debug` to see the world's events.

use anyhow::{Context as _, bail};
use dispatch_tape::args::Packer;
use dispatch_tape::disasm::disassemble;
use dispatch_tape::factory::{create, create_salted, predict_salted};
use dispatch_tape::vm::Outcome;
use dispatch_tape::word::{Address, Word};
use dispatch_world::{CallContext, Reply, World};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const ALICE: Address = Address::from_low_u64(0xa11ce);
const BOB: Address = Address::from_low_u64(0xb0b);

const DEPOSIT: u8 = 1;
const WITHDRAW: u8 = 2;
const BALANCE: u8 = 3;

const BALANCE_SLOT: Word = Word::ZERO;
const FEES_SLOT: Word = Word::ONE;

/// Config layout: `owner: address @ 0`, `fee_bps: uint16 @ 20`.
fn vault_config(owner: Address, fee_bps: u16) -> Vec<u8> {
    let mut p = Packer::new();
    p.address(owner).uint16(fee_bps);
    p.finish()
}

fn request(op: u8, amount: u64) -> Vec<u8> {
    let mut p = Packer::new();
    p.uint8(op).uint64(amount);
    p.finish()
}

fn vault(ctx: &mut CallContext<'_>) -> Reply {
    let args = ctx.args();
    let owner = args.address(0);
    let fee_bps = u64::from(args.uint16(20));
    let call = args.caller_input();
    let op = call.first().copied().unwrap_or(0);
    let amount = call
        .get(1..9)
        .and_then(|b| b.try_into().ok())
        .map_or(0, u64::from_be_bytes);

    let balance = ctx.sload(&BALANCE_SLOT).low_u64();
    match op {
        DEPOSIT => {
            let fee = amount * fee_bps / 10_000;
            let fees = ctx.sload(&FEES_SLOT).low_u64();
            ctx.sstore(BALANCE_SLOT, Word::from_u64(balance + amount - fee));
            ctx.sstore(FEES_SLOT, Word::from_u64(fees + fee));
            Ok(Word::from_u64(balance + amount - fee).0.to_vec())
        }
        WITHDRAW => {
            // A refused withdrawal reverts, which undoes this write.
            ctx.sstore(BALANCE_SLOT, Word::from_u64(balance.wrapping_sub(amount)));
            if ctx.caller() != owner {
                return Err(b"not the owner".to_vec());
            }
            if amount > balance {
                return Err(b"insufficient balance".to_vec());
            }
            Ok(Word::from_u64(balance - amount).0.to_vec())
        }
        BALANCE => Ok(Word::from_u64(balance).0.to_vec()),
        _ => Err(b"unknown operation".to_vec()),
    }
}

fn returned(out: Outcome) -> anyhow::Result<u64> {
    match out {
        Outcome::Return(data) => {
            let word: [u8; 32] = data.try_into().ok().context("short return")?;
            Ok(Word(word).low_u64())
        }
        Outcome::Revert(data) => bail!("reverted: {}", String::from_utf8_lossy(&data)),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut world = World::default();
    let implementation = world.install(vault);

    let alice_vault = create(&mut world, implementation, &vault_config(ALICE, 30))?;
    let bob_vault = create(&mut world, implementation, &vault_config(BOB, 0))?;
    tracing::info!(%implementation, %alice_vault, %bob_vault, "vaults deployed");

    let after = returned(world.call(ALICE, alice_vault, &request(DEPOSIT, 10_000))?)?;
    println!("alice deposits 10000 at 30 bps -> balance {after}");
    let after = returned(world.call(ALICE, bob_vault, &request(DEPOSIT, 10_000))?)?;
    println!("alice deposits 10000 into bob's vault -> balance {after}");

    match returned(world.call(BOB, alice_vault, &request(WITHDRAW, 500))?) {
        Ok(_) => bail!("bob withdrew from alice's vault"),
        Err(e) => println!("bob withdraws from alice's vault -> {e}"),
    }
    let after = returned(world.call(ALICE, alice_vault, &request(BALANCE, 0))?)?;
    println!("alice's vault balance is still {after}");

    let after = returned(world.call(ALICE, alice_vault, &request(WITHDRAW, 4_000))?)?;
    println!("alice withdraws 4000 -> balance {after}");
    println!(
        "fees kept by alice's vault: {}",
        world.storage(alice_vault, &FEES_SLOT).low_u64()
    );

    let salt = Word::from_u64(2026);
    let config = vault_config(BOB, 10);
    let predicted = predict_salted(&world, implementation, &config, salt)?;
    let salted = create_salted(&mut world, implementation, &config, salt)?;
    println!("salted vault predicted at {predicted}, created at {salted}");

    let code = world.code(bob_vault).context("bob's vault has no code")?;
    println!("\n{}", disassemble(code));
    Ok(())
}
