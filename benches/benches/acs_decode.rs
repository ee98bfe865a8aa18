//! Benchmark suite for character container decoding
//!
//! Measures block decompression, full container parsing and bitmap normalization.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use acs_benches::{generate_compressed_image, generate_container, sizes};
use acs_types::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::{fs, hint::black_box};

/// Benchmark block decompression with a reused engine and a fresh one per call
fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_decompress");

	for (name, (width, height)) in
		[("small", sizes::SMALL), ("character", sizes::CHARACTER), ("large", sizes::LARGE)]
	{
		let (block, expected) = generate_compressed_image(width, height);
		group.throughput(Throughput::Bytes(expected as u64));

		let mut engine = Decompressor::new();
		group.bench_with_input(BenchmarkId::new("reused_engine", name), &block, |b, block| {
			b.iter(|| black_box(engine.decompress(black_box(block), expected)));
		});

		group.bench_with_input(BenchmarkId::new("fresh_engine", name), &block, |b, block| {
			b.iter(|| black_box(Decompressor::new().decompress(black_box(block), expected)));
		});
	}

	group.finish();
}

/// Benchmark full container parsing on synthetic data
fn bench_parse_synthetic(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_parse");

	for count in [1usize, 16, 64] {
		let (width, height) = sizes::CHARACTER;
		let data = generate_container(count, width, height);
		group.throughput(Throughput::Bytes(data.len() as u64));

		let mut parser = Parser::new();
		group.bench_with_input(BenchmarkId::new("images", count), &data, |b, data| {
			b.iter(|| black_box(parser.parse(black_box(data))));
		});
	}

	group.finish();
}

/// Benchmark parsing of real characters in `test_data/`
fn bench_parse_real_files(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_parse_real");
	group.sample_size(20);

	let test_files = vec![
		("merlin", concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/merlin.acs")),
		("genie", concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/genie.acs")),
	];

	for (name, path) in test_files {
		// Try to load the file, skip if not found
		let data = match fs::read(path) {
			Ok(d) => d,
			Err(_) => {
				eprintln!("Warning: Could not find test file: {}", path);
				continue;
			}
		};

		group.throughput(Throughput::Bytes(data.len() as u64));
		let mut parser = Parser::new();
		group.bench_with_input(BenchmarkId::new("parse", name), &data, |b, data| {
			b.iter(|| black_box(parser.parse(black_box(data))));
		});
	}

	group.finish();
}

/// Benchmark indexed to RGBA conversion
fn bench_normalize(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_normalize");

	let (width, height) = sizes::LARGE;
	let data = generate_container(1, width, height);
	let character = match parse(&data) {
		Ok(character) => character,
		Err(err) => {
			eprintln!("Warning: Could not parse synthetic container: {}", err);
			return;
		}
	};
	let Some(image) = character.image(0) else {
		return;
	};

	group.throughput(Throughput::Elements(image.width() as u64 * image.height() as u64));
	group.bench_function("normalize", |b| {
		b.iter(|| black_box(normalize(black_box(image), character.palette())));
	});
	group.bench_function("normalize_rgba8", |b| {
		b.iter(|| black_box(normalize(black_box(image), character.palette()).map(|bitmap| bitmap.to_rgba8())));
	});

	group.finish();
}

criterion_group!(benches, bench_decompress, bench_parse_synthetic, bench_parse_real_files, bench_normalize);

criterion_main!(benches);
