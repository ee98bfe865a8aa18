//! Checks real character files placed under `bin/` (e.g. `bin/merlin.acs`).

use std::io::Cursor;

use acs_rs::{CharacterData, Parser};
use log::{info, warn};
use walkdir::WalkDir;

pub(super) fn check_sample_characters() {
	let cargo_root = std::env::var("CARGO_MANIFEST_DIR").unwrap();
	let bin_root = std::path::Path::new(&cargo_root).join("bin");
	if !bin_root.is_dir() {
		warn!("no sample directory at {}, skipping", bin_root.display());
		return;
	}

	let mut parser = Parser::new();
	for entry in WalkDir::new(&bin_root).into_iter().filter_map(Result::ok) {
		let path = entry.path();
		if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("acs")) {
			continue;
		}

		let bytes = std::fs::read(path).unwrap();
		let character = parser
			.parse(&bytes)
			.unwrap_or_else(|e| panic!("{} failed to parse: {e}", path.display()));
		check_character(&character);
		info!(
			"{}: {} images, {} animations, {} sounds",
			path.display(),
			character.images().len(),
			character.animations().len(),
			character.sounds().len()
		);
	}
}

fn check_character(character: &CharacterData) {
	assert!(!character.animations().is_empty());

	for (index, image) in character.images().iter().enumerate() {
		let bitmap = character.normalize_image(index).unwrap();
		assert_eq!(bitmap.pixels().len(), image.width() * image.height());
	}

	for animation in character.animations() {
		assert!(character.animation(&animation.name.to_ascii_uppercase()).is_some());
		for frame in &animation.frames {
			for placement in &frame.images {
				assert!(character.image(placement.image_index as usize).is_some());
			}
		}
	}

	for sound in character.sounds() {
		let reader = hound::WavReader::new(Cursor::new(sound.data())).unwrap();
		assert_eq!(reader.spec(), sound.wav_spec().unwrap());
	}
}
