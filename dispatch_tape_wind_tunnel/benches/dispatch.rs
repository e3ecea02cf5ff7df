// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use dispatch_tape::args::{Args, Packer};
use dispatch_tape::factory::create;
use dispatch_tape::host::{Host, HostError};
use dispatch_tape::image::DispatcherImage;
use dispatch_tape::layout::{MAX_CONFIG_LEN, PREFIX_LEN, RUNTIME_LEN, TRAILER_LEN};
use dispatch_tape::scratch::with_scratch_image;
use dispatch_tape::trace::{TraceMask, TraceSink};
use dispatch_tape::vm::{Frame, Limits, Outcome, Vm};
use dispatch_tape::word::{Address, Word};
use dispatch_world::{CallContext, Reply, World};

const CONFIG_SIZES: [usize; 4] = [0, 64, 1024, MAX_CONFIG_LEN];

fn bench_dispatch(c: &mut Criterion) {
    bench_image_build(c);
    bench_scratch_image(c);
    bench_args_fields(c);
    bench_args_array(c);
    bench_runtime(c);
    bench_runtime_traced_instr(c);
    bench_world_call(c);
}

fn bench_image_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_build");
    let target = Address::from_low_u64(0x1000);
    for &len in &CONFIG_SIZES {
        let config = vec![0xa5; len];
        group.bench_with_input(BenchmarkId::from_parameter(len), &config, |b, config| {
            b.iter(|| {
                let image = DispatcherImage::build(target, config).unwrap();
                black_box(image);
            });
        });
    }
    group.finish();
}

fn bench_scratch_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("scratch_image");
    let target = Address::from_low_u64(0x1000);
    for &len in &CONFIG_SIZES {
        let mut buf = vec![0xa5; PREFIX_LEN + len + TRAILER_LEN];
        let window = PREFIX_LEN..PREFIX_LEN + len;
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter(|| {
                let n = with_scratch_image(&mut buf, window.clone(), target, <[u8]>::len).unwrap();
                black_box(n);
            });
        });
    }
    group.finish();
}

fn forwarded_input(caller: &[u8], config: &[u8]) -> Vec<u8> {
    let image = DispatcherImage::build(Address::ZERO, config).unwrap();
    let mut input = caller.to_vec();
    input.extend_from_slice(&image.runtime_code()[RUNTIME_LEN..]);
    input
}

fn bench_args_fields(c: &mut Criterion) {
    let mut config = Packer::new();
    config
        .address(Address::from_low_u64(0xbeef))
        .uint256(Word::from_u64(1_000_000))
        .uint64(30)
        .uint8(7);
    let input = forwarded_input(&[0xa9, 0x05, 0x9c, 0xbb], &config.finish());

    c.bench_function("args_fields", |b| {
        b.iter(|| {
            let args = Args::new(black_box(&input));
            black_box((
                args.address(0),
                args.uint256(20),
                args.uint64(52),
                args.uint8(60),
            ));
        });
    });
}

fn bench_args_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("args_uint256_array");
    for &n in &[1_usize, 16, 256] {
        let mut config = Packer::new();
        for i in 0..n {
            config.uint256(Word::from_u64(i as u64));
        }
        let input = forwarded_input(&[], &config.finish());
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let words = Args::new(input).uint256_array(0, n);
                black_box(words);
            });
        });
    }
    group.finish();
}

struct EchoHost;

impl Host for EchoHost {
    fn delegate_call(
        &mut self,
        _target: Address,
        input: &[u8],
        _fuel: u64,
    ) -> Result<(Outcome, u64), HostError> {
        Ok((Outcome::Return(input.to_vec()), 0))
    }

    fn sload(&mut self, _key: &Word) -> Word {
        Word::ZERO
    }

    fn sstore(&mut self, _key: Word, _value: Word) {}
}

fn bench_runtime(c: &mut Criterion) {
    let mut group = c.benchmark_group("runtime");
    for &len in &CONFIG_SIZES {
        let image = DispatcherImage::build(Address::from_low_u64(0x1000), &vec![1; len]).unwrap();
        let mut vm = Vm::new(EchoHost, Limits::default());
        group.bench_with_input(
            BenchmarkId::from_parameter(len),
            image.runtime_code(),
            |b, code| {
                let frame = Frame {
                    code,
                    input: &[0xa9, 0x05, 0x9c, 0xbb],
                    address: Address::from_low_u64(1),
                    caller: Address::from_low_u64(2),
                };
                b.iter(|| {
                    let out = vm.run(&frame, TraceMask::NONE, None).unwrap();
                    black_box(out);
                });
            },
        );
    }
    group.finish();
}

#[derive(Default)]
struct CountingInstr {
    count: u64,
}

impl TraceSink for CountingInstr {
    fn mask(&self) -> TraceMask {
        TraceMask::INSTR
    }

    fn instr(&mut self, _pc: usize, _opcode: u8, _stack_depth: usize, _fuel: u64) {
        self.count = self.count.wrapping_add(1);
    }
}

fn bench_runtime_traced_instr(c: &mut Criterion) {
    let image = DispatcherImage::build(Address::from_low_u64(0x1000), &[1; 64]).unwrap();
    let frame = Frame {
        code: image.runtime_code(),
        input: &[0xa9, 0x05, 0x9c, 0xbb],
        address: Address::from_low_u64(1),
        caller: Address::from_low_u64(2),
    };
    let mut vm = Vm::new(EchoHost, Limits::default());
    let mut sink = CountingInstr::default();
    let mask = sink.mask();
    c.bench_function("runtime_traced_instr", |b| {
        b.iter(|| {
            let out = vm.run(&frame, mask, Some(&mut sink)).unwrap();
            black_box(out);
        });
    });
}

fn counter(ctx: &mut CallContext<'_>) -> Reply {
    let count = ctx.sload(&Word::ZERO).wrapping_add(&Word::ONE);
    ctx.sstore(Word::ZERO, count);
    Ok(count.0.to_vec())
}

fn bench_world_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_call");
    let mut world = World::default();
    let target = world.install(counter);
    let dispatcher = create(&mut world, target, &[7; 64]).unwrap();
    let caller = Address::from_low_u64(0xca11);

    group.bench_function("direct", |b| {
        b.iter(|| {
            let out = world.call(caller, target, &[0xa9, 0x05, 0x9c, 0xbb]).unwrap();
            black_box(out);
        });
    });
    group.bench_function("dispatched", |b| {
        b.iter(|| {
            let out = world
                .call(caller, dispatcher, &[0xa9, 0x05, 0x9c, 0xbb])
                .unwrap();
            black_box(out);
        });
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(std::time::Duration::from_millis(300))
        .measurement_time(std::time::Duration::from_millis(1200))
        .sample_size(60);
    targets = bench_dispatch
}
criterion_main!(benches);
