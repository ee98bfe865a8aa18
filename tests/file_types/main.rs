//! Integration tests for `acs-rs` against the public facade.

mod samples;

fn init_logger() {
	// Initialize logger with default level set to info if RUST_LOG is not set
	let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.is_test(true)
		.try_init();
}

#[test]
fn decompress_through_facade() {
	init_logger();

	use acs_rs::prelude::*;

	let mut engine = Decompressor::new();
	let block = [0x00, 0x82, 0x02, 0xF2, 0xFF, 0xFF, 0xFF];
	assert_eq!(engine.decompress(&block, 4).unwrap(), b"AAAA");
	assert!(matches!(
		engine.decompress(&block, 3),
		Err(DecompressionError::OutputOverflow {
			capacity: 3
		})
	));
}

#[test]
fn garbage_is_rejected() {
	init_logger();

	for data in [&b""[..], &b"RIFF"[..], &[0xC3, 0xAB, 0xCD, 0xAB][..], &[0u8; 64][..]] {
		assert!(acs_rs::parse(data).is_err());
	}
}

#[test]
fn sample_characters() {
	init_logger();
	samples::check_sample_characters();
}
