// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(missing_docs, reason = "integration test crate")]

//! Dispatcher properties, checked end to end: images are deployed into a [`World`], called, and
//! the shared target decodes its config from the forwarded call.

use dispatch_tape::args::{Args, Packer};
use dispatch_tape::factory::{CreateError, create, create_in_window, create_salted, predict_salted};
use dispatch_tape::host::Deployer;
use dispatch_tape::image::DispatcherCode;
use dispatch_tape::layout::{LayoutError, MAX_CONFIG_LEN, PREFIX_LEN, RUNTIME_LEN, TRAILER_LEN};
use dispatch_tape::word::{Address, Word};
use dispatch_world::{CallContext, Reply, World, WorldConfig};

fn echo(ctx: &mut CallContext<'_>) -> Reply {
    Ok(ctx.input().to_vec())
}

fn be_u64(b: &[u8]) -> u64 {
    let mut buf = [0_u8; 8];
    buf.copy_from_slice(&b[..8]);
    u64::from_be_bytes(buf)
}

/// Counts instantiation attempts and forwards them to a world.
struct Counting<'w> {
    world: &'w mut World,
    calls: usize,
}

impl Deployer for Counting<'_> {
    fn instantiate(&mut self, init_code: &[u8]) -> Address {
        self.calls += 1;
        self.world.instantiate(init_code)
    }

    fn instantiate_salted(&mut self, init_code: &[u8], salt: Word) -> Address {
        self.calls += 1;
        self.world.instantiate_salted(init_code, salt)
    }
}

#[test]
fn deployed_code_ends_with_config_and_trailer() {
    let mut world = World::default();
    let target = world.install(echo);
    let configs: [&[u8]; 4] = [b"", b"\x01", &[0xab; 20], &[7; 300]];
    for config in configs {
        let d = create(&mut world, target, config).unwrap();
        let code = world.code(d).unwrap();
        assert_eq!(code.len(), RUNTIME_LEN + config.len() + TRAILER_LEN);

        let extra = u16::try_from(config.len() + 2).unwrap();
        let mut tail = config.to_vec();
        tail.extend_from_slice(&extra.to_be_bytes());
        assert!(code.ends_with(&tail));

        let parsed = DispatcherCode::parse(code).unwrap();
        assert_eq!(parsed.target(), target);
        assert_eq!(parsed.config(), config);
        assert_eq!(parsed.extra_length(), extra);
    }
}

#[test]
fn offset_is_the_caller_input_length() {
    let mut world = World::default();
    let probe = world.install(|ctx: &mut CallContext<'_>| -> Reply {
        let args = ctx.args();
        let mut p = Packer::new();
        p.uint64(args.offset() as u64)
            .uint64(args.input_len() as u64)
            .uint16(args.extra_length())
            .bytes(args.caller_input());
        Ok(p.finish())
    });
    let config = [0x33; 33];
    let d = create(&mut world, probe, &config).unwrap();

    for caller_len in [0_usize, 4, 37, 100] {
        let input = vec![0x11; caller_len];
        let out = world.call(World::ORIGIN, d, &input).unwrap();
        assert!(out.is_success());
        let data = out.data();
        assert_eq!(be_u64(&data[0..]), caller_len as u64);
        assert_eq!(be_u64(&data[8..]), (caller_len + config.len() + 2) as u64);
        assert_eq!(&data[16..18], &35_u16.to_be_bytes());
        assert_eq!(&data[18..], input.as_slice());
    }
}

#[test]
fn typed_fields_at_packed_offsets() {
    let mut world = World::default();
    // Reads address|uint256|uint64|uint8 at 0, 20, 52, 60 and answers in reverse order.
    let target = world.install(|ctx: &mut CallContext<'_>| -> Reply {
        let args = ctx.args();
        let mut p = Packer::new();
        p.uint8(args.uint8(60))
            .uint64(args.uint64(52))
            .uint256(args.uint256(20))
            .address(args.address(0));
        Ok(p.finish())
    });

    let owner = Address([0xc0; 20]);
    let amount = Word::from_u128(0x0123_4567_89ab_cdef_0011_2233_4455_6677);
    let deadline = 1_700_000_000_u64;
    let flags = 0x81_u8;

    let mut config = Packer::new();
    config.address(owner).uint256(amount).uint64(deadline).uint8(flags);
    let config = config.finish();
    assert_eq!(config.len(), 61);

    let d = create(&mut world, target, &config).unwrap();
    let out = world
        .call(Address::from_low_u64(9), d, &[0xde, 0xad, 0xbe, 0xef])
        .unwrap();

    let mut expected = Packer::new();
    expected.uint8(flags).uint64(deadline).uint256(amount).address(owner);
    assert_eq!(out.into_data(), expected.finish());
}

#[test]
fn word_arrays_of_various_lengths() {
    let mut world = World::default();
    let target = world.install(|ctx: &mut CallContext<'_>| -> Reply {
        let args = ctx.args();
        let n = usize::from(args.caller_input().first().copied().unwrap_or(0));
        let mut p = Packer::new();
        for w in args.uint256_array(0, n) {
            p.uint256(w);
        }
        Ok(p.finish())
    });

    let words: Vec<Word> = (1..=5_u64).map(|i| Word::from_u64(i * 1000)).collect();
    let mut config = Packer::new();
    for w in &words {
        config.uint256(*w);
    }
    let d = create(&mut world, target, &config.finish()).unwrap();

    for n in [0_u8, 1, 5] {
        let out = world.call(World::ORIGIN, d, &[n]).unwrap();
        let mut expected = Packer::new();
        for w in &words[..usize::from(n)] {
            expected.uint256(*w);
        }
        assert_eq!(out.into_data(), expected.finish(), "n = {n}");
    }
}

#[test]
fn reads_past_the_blob_are_zero_or_neighbouring_bytes() {
    let mut world = World::default();
    let target = world.install(|ctx: &mut CallContext<'_>| -> Reply {
        let args = ctx.args();
        let mut p = Packer::new();
        // The blob is 4 bytes: this reads 2 config bytes, the trailer, then 4 bytes of zeros.
        p.uint64(args.uint64(2)).uint256(args.uint256(1000));
        Ok(p.finish())
    });
    let d = create(&mut world, target, &[1, 2, 3, 4]).unwrap();
    let out = world.call(World::ORIGIN, d, &[]).unwrap();
    let data = out.data();
    assert_eq!(&data[..8], &[3, 4, 0x00, 0x06, 0, 0, 0, 0]);
    assert_eq!(&data[8..], &[0; 32]);
}

#[test]
fn scratch_window_is_restored_after_success_and_failure() {
    let config = [0x42; 24];
    let mut buf = vec![0xee; PREFIX_LEN + 5];
    buf.extend_from_slice(&config);
    buf.extend_from_slice(&[0xdd, 0xcc, 0xbb]);
    let window = PREFIX_LEN + 5..PREFIX_LEN + 5 + config.len();
    let snapshot = buf.clone();

    let mut world = World::default();
    let target = world.install(echo);
    let d = create_in_window(&mut world, &mut buf, window.clone(), target).unwrap();
    assert_eq!(buf, snapshot);
    let parsed = DispatcherCode::parse(world.code(d).unwrap()).unwrap();
    assert_eq!(parsed.config(), &config);

    // Same image as the copying path.
    let copied = create(&mut world, target, &config).unwrap();
    assert_eq!(world.code(copied), world.code(d));

    let mut strict = World::new(WorldConfig {
        max_code_size: Some(RUNTIME_LEN),
        ..WorldConfig::default()
    });
    let target = strict.install(echo);
    let err = create_in_window(&mut strict, &mut buf, window, target).unwrap_err();
    assert_eq!(err, CreateError::CreateFailed);
    assert_eq!(buf, snapshot);

    let err = create_in_window(&mut strict, &mut buf, 10..20, target).unwrap_err();
    assert_eq!(
        err,
        CreateError::Layout(LayoutError::MissingHeadroom {
            needed: PREFIX_LEN,
            available: 10,
        })
    );
    assert_eq!(buf, snapshot);
}

#[test]
fn only_address_matches_address_zero_for_twenty_byte_blobs() {
    let mut world = World::default();
    let target = world.install(|ctx: &mut CallContext<'_>| -> Reply {
        let args = ctx.args();
        let mut p = Packer::new();
        p.address(args.only_address()).address(args.address(0));
        Ok(p.finish())
    });
    let beneficiary = Address::from_low_u64(0xfeed_f00d);
    let d = create(&mut world, target, beneficiary.as_bytes()).unwrap();

    for caller_len in [0_usize, 4, 68] {
        let out = world.call(World::ORIGIN, d, &vec![0x99; caller_len]).unwrap();
        let data = out.data();
        assert_eq!(&data[..20], beneficiary.as_bytes());
        assert_eq!(&data[20..], beneficiary.as_bytes());
    }
}

#[test]
fn largest_config_deploys_and_one_more_is_rejected_up_front() {
    let mut world = World::default();
    let target = world.install(echo);

    let config = vec![0x5a; MAX_CONFIG_LEN];
    let d = create(&mut world, target, &config).unwrap();
    assert_eq!(world.code(d).map(<[u8]>::len), Some(usize::from(u16::MAX)));

    let out = world.call(World::ORIGIN, d, &[1, 2, 3, 4]).unwrap();
    let args = Args::new(out.data());
    assert_eq!(args.input_len(), 4 + MAX_CONFIG_LEN + 2);
    assert_eq!(args.offset(), 4);
    assert_eq!(args.bytes(0, MAX_CONFIG_LEN), config);

    let too_big = vec![0; MAX_CONFIG_LEN + 1];
    let rejected = LayoutError::ConfigTooLarge {
        len: MAX_CONFIG_LEN + 1,
    };
    let mut counting = Counting {
        world: &mut world,
        calls: 0,
    };
    assert_eq!(
        create(&mut counting, target, &too_big),
        Err(CreateError::Layout(rejected.clone()))
    );
    assert_eq!(
        create_salted(&mut counting, target, &too_big, Word::ONE),
        Err(CreateError::Layout(rejected.clone()))
    );
    assert_eq!(counting.calls, 0);
    assert_eq!(
        predict_salted(&world, target, &too_big, Word::ONE),
        Err(rejected)
    );
}
