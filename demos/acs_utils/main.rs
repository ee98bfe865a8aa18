//! ACS character container CLI utility.
//!
//! # Features
//!
//! - **info**: print a summary of a container, or dump its model as JSON
//! - **export**: write every image as PNG and every sound as WAV
//! - **frame**: composite one animation frame onto the character canvas
//! - **scan**: parse every `.acs` file under a directory and report failures
//!
//! # Usage
//!
//! ```bash
//! cargo run --example acs_utils info merlin.acs
//! cargo run --example acs_utils info merlin.acs --json > merlin.json
//! cargo run --example acs_utils export merlin.acs out/merlin
//! cargo run --example acs_utils frame merlin.acs Wave 3 wave_3.png
//! RUST_LOG=debug cargo run --example acs_utils scan ~/characters --recursive
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use acs_rs::prelude::*;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use image::RgbaImage;
use log::{debug, error, info, warn};
use walkdir::WalkDir;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(args) => run_info(args, cli.limits),
		Command::Export(args) => run_export(args, cli.limits),
		Command::Frame(args) => run_frame(args, cli.limits),
		Command::Scan(args) => run_scan(args, cli.limits),
	}
}

#[derive(ClapParser)]
#[command(name = "acs_utils")]
#[command(author = "acs-rs project")]
#[command(version)]
#[command(about = "Inspect and export Microsoft Agent character (.acs) files", long_about = None)]
struct Cli {
	/// Parse limits preset
	#[arg(long, value_enum, default_value_t = Limits::Default, global = true, env = "ACS_LIMITS")]
	limits: Limits,

	#[command(subcommand)]
	command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Limits {
	/// Balanced limits
	Default,
	/// Higher limits, duplicate animation names tolerated
	Lenient,
	/// Low limits for untrusted files
	Strict,
}

impl Limits {
	fn config(self) -> ParseConfig {
		match self {
			Limits::Default => ParseConfig::default(),
			Limits::Lenient => ParseConfig::lenient(),
			Limits::Strict => ParseConfig::strict(),
		}
	}
}

#[derive(Subcommand)]
enum Command {
	/// Print a summary of a container
	Info(InfoArgs),
	/// Export images as PNG and sounds as WAV
	Export(ExportArgs),
	/// Render one animation frame to a PNG file
	Frame(FrameArgs),
	/// Parse every .acs file under a directory
	Scan(ScanArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Path to the .acs file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Dump the parsed model as JSON instead of a summary
	#[arg(long, default_value_t = false)]
	json: bool,

	/// List every frame of every animation
	#[arg(short, long, default_value_t = false)]
	verbose: bool,
}

#[derive(Args)]
struct ExportArgs {
	/// Path to the .acs file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Output directory
	#[arg(value_name = "DIR")]
	output: PathBuf,

	/// Skip sounds
	#[arg(long, default_value_t = false)]
	no_sounds: bool,
}

#[derive(Args)]
struct FrameArgs {
	/// Path to the .acs file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Animation name (case-insensitive)
	#[arg(value_name = "ANIMATION")]
	animation: String,

	/// Frame index within the animation
	#[arg(value_name = "FRAME")]
	frame: usize,

	/// Output PNG path
	#[arg(value_name = "OUTPUT_PNG")]
	output: PathBuf,
}

#[derive(Args)]
struct ScanArgs {
	/// Directory to scan
	#[arg(value_name = "DIR")]
	root: PathBuf,

	/// Recurse into sub-directories
	#[arg(short, long, default_value_t = false)]
	recursive: bool,
}

fn load(path: &Path, limits: Limits) -> Result<CharacterData> {
	let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
	Parser::with_config(limits.config())
		.parse(&bytes)
		.with_context(|| format!("Failed to parse {}", path.display()))
}

fn run_info(args: InfoArgs, limits: Limits) -> Result<()> {
	let character = load(&args.file, limits)?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&character)?);
		return Ok(());
	}

	let info = character.info();
	println!("File:        {}", args.file.display());
	println!("Name:        {}", character.name().unwrap_or("<unnamed>"));
	println!("GUID:        {}", info.guid);
	println!("Version:     {}.{}", info.major_version, info.minor_version);
	println!("Canvas:      {}x{}", character.width(), character.height());
	println!("Palette:     {} colors, transparent index {}", character.palette().len(), info.transparent_index);
	println!("Images:      {}", character.images().len());
	println!("Sounds:      {}", character.sounds().len());
	println!("Animations:  {}", character.animations().len());
	println!("States:      {}", info.states.len());

	for localized in &info.localized {
		println!("  [0x{:04X}] {}: {}", localized.language_id, localized.name, localized.description);
	}

	if let Some(voice) = &info.voice {
		println!("Voice:       engine {}, speed {}, pitch {}", voice.engine_id, voice.speed, voice.pitch);
	}
	if let Some(balloon) = &info.balloon {
		println!(
			"Balloon:     {} lines x {} chars, font {} ({})",
			balloon.lines, balloon.chars_per_line, balloon.font_name, balloon.font_height
		);
	}

	println!();
	for animation in character.animations() {
		println!(
			"{:<32} {:>3} frames {:>6} ms  {}",
			animation.name,
			animation.frames.len(),
			animation.duration_millis(),
			animation.transition
		);
		if args.verbose {
			for (index, frame) in animation.frames.iter().enumerate() {
				let images: Vec<String> =
					frame.images.iter().map(|image| image.image_index.to_string()).collect();
				println!(
					"    #{:<3} {:>5} ms  images [{}]  sound {:?}  branches {}",
					index,
					frame.duration_millis(),
					images.join(", "),
					frame.sound_index,
					frame.branches.len()
				);
			}
		}
	}

	Ok(())
}

fn run_export(args: ExportArgs, limits: Limits) -> Result<()> {
	let character = load(&args.file, limits)?;
	fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create {}", args.output.display()))?;

	for index in 0..character.images().len() {
		let bitmap = character.normalize_image(index)?;
		let path = args.output.join(format!("image_{index:04}.png"));
		to_rgba_image(&bitmap)?.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
		debug!("wrote {}", path.display());
	}
	info!("Exported {} images to {}", character.images().len(), args.output.display());

	if args.no_sounds {
		return Ok(());
	}

	for (index, sound) in character.sounds().iter().enumerate() {
		match sound.wav_spec() {
			Ok(spec) => debug!(
				"sound {}: {} Hz, {} channels, {} bits",
				index, spec.sample_rate, spec.channels, spec.bits_per_sample
			),
			Err(err) => warn!("sound {index}: {err}"),
		}
		let path = args.output.join(format!("sound_{index:04}.wav"));
		fs::write(&path, sound.data()).with_context(|| format!("Failed to write {}", path.display()))?;
	}
	info!("Exported {} sounds to {}", character.sounds().len(), args.output.display());

	Ok(())
}

fn run_frame(args: FrameArgs, limits: Limits) -> Result<()> {
	let character = load(&args.file, limits)?;
	let Some(animation) = character.animation(&args.animation) else {
		bail!("No animation named '{}' in {}", args.animation, args.file.display());
	};
	let Some(frame) = animation.frames.get(args.frame) else {
		bail!("Animation '{}' has {} frames, no frame {}", animation.name, animation.frames.len(), args.frame);
	};

	let mut canvas = RgbaImage::new(character.width() as u32, character.height() as u32);
	for placement in &frame.images {
		let bitmap = character.normalize_image(placement.image_index as usize)?;
		draw(&mut canvas, &bitmap, placement.x_offset as i64, placement.y_offset as i64);
	}

	canvas.save(&args.output).with_context(|| format!("Failed to write {}", args.output.display()))?;
	info!(
		"Rendered '{}' frame {} ({} images, {} ms) to {}",
		animation.name,
		args.frame,
		frame.images.len(),
		frame.duration_millis(),
		args.output.display()
	);
	Ok(())
}

fn run_scan(args: ScanArgs, limits: Limits) -> Result<()> {
	if !args.root.is_dir() {
		bail!("{} is not a directory", args.root.display());
	}

	let max_depth = if args.recursive {
		usize::MAX
	} else {
		1
	};

	// one engine for the whole scan, its region is reused
	let mut parser = Parser::with_config(limits.config());
	let mut parsed = 0usize;
	let mut failed = 0usize;

	for entry in WalkDir::new(&args.root).max_depth(max_depth).follow_links(false) {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				warn!("{err}");
				continue;
			}
		};
		let path = entry.path();
		let is_acs = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("acs"));
		if !entry.file_type().is_file() || !is_acs {
			continue;
		}

		let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
		match parser.parse(&bytes) {
			Ok(character) => {
				parsed += 1;
				info!(
					"{}: {} ({} images, {} animations)",
					path.display(),
					character.name().unwrap_or("<unnamed>"),
					character.images().len(),
					character.animations().len()
				);
			}
			Err(err) => {
				failed += 1;
				error!("{}: {}", path.display(), err);
			}
		}
	}

	info!("Parsed {} files, {} failed", parsed, failed);
	if failed > 0 {
		bail!("{failed} files failed to parse");
	}
	Ok(())
}

fn to_rgba_image(bitmap: &Bitmap) -> Result<RgbaImage> {
	RgbaImage::from_raw(bitmap.width() as u32, bitmap.height() as u32, bitmap.to_rgba8())
		.context("Bitmap size does not match its pixel buffer")
}

/// Draws `bitmap` at `(x, y)`, skipping fully transparent pixels.
fn draw(canvas: &mut RgbaImage, bitmap: &Bitmap, x: i64, y: i64) {
	for row in 0..bitmap.height() {
		let cy = y + row as i64;
		if cy < 0 || cy >= canvas.height() as i64 {
			continue;
		}
		for column in 0..bitmap.width() {
			let cx = x + column as i64;
			if cx < 0 || cx >= canvas.width() as i64 {
				continue;
			}
			let Some(pixel) = bitmap.pixel(column, row) else {
				continue;
			};
			let rgba = pixel.to_be_bytes();
			if rgba[3] != 0 {
				canvas.put_pixel(cx as u32, cy as u32, image::Rgba(rgba));
			}
		}
	}
}
