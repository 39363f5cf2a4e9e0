//! Command-line interface for accent-picker
//!
//! Usage: accent-picker [OPTIONS] <INPUT>

use accent_picker::prelude::*;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let mut input_path = None;
    let mut palette_size = 24usize;
    let mut seed: Option<u64> = None;
    let mut min_luminance = 0.45f32;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--palette-size" => {
                i += 1;
                palette_size = args[i].parse().expect("Invalid palette size");
            }
            "--seed" => {
                i += 1;
                seed = Some(args[i].parse().expect("Invalid seed"));
            }
            "--min-luminance" => {
                i += 1;
                min_luminance = args[i].parse().expect("Invalid luminance");
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "--help" => {
                print_usage(&args[0]);
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                if input_path.is_none() {
                    input_path = Some(PathBuf::from(arg));
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input_path.expect("Input path required");
    let img = image::open(&input_path)
        .expect("Failed to open input image")
        .to_rgb8();

    let width = img.width() as usize;
    let height = img.height() as usize;
    let pixels: Vec<Rgb> = img.pixels().map(|p| Rgb::new(p[0], p[1], p[2])).collect();

    let config = AccentConfig {
        palette_size,
        seed,
        min_luminance,
        ..Default::default()
    };

    let result = match pick_accent(&pixels, width, height, &config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    if verbose {
        print_diagnostics(&result);
    }

    println!("Selected:   {}", result.selection.accent.to_hex());
    println!("Complement: {}", result.selection.complement.to_hex());
}

fn print_diagnostics(result: &AccentResult) {
    let scene = &result.scene;
    println!("Mean luminance (L*): {:.1}", scene.mean_luminance * 100.0);
    println!(
        "Saturation mean/std: {:.3}/{:.3}",
        scene.saturation_mean, scene.saturation_std
    );
    println!(
        "Dominant hue: {:.0} deg, hue clusters: {}, hue spread: {:.2}",
        scene.dominant_hue * 360.0,
        scene.hue_cluster_count,
        scene.hue_spread
    );

    println!("\nTop palette entries:");
    for e in result.palette.entries.iter().take(10) {
        println!(
            "  {} weight={:>8.1}  H={:.3} S={:.3} V={:.3}",
            e.rgb.to_hex(),
            e.weight,
            e.hsv.h,
            e.hsv.s,
            e.hsv.v
        );
    }

    println!("\nRanked candidates:");
    for c in &result.candidates {
        let flag = if c.guardrail_failed { " [guardrail]" } else { "" };
        println!(
            "  {:<24} {} score={:.3}{}",
            c.strategy.name(),
            c.rgb.to_hex(),
            c.score,
            flag
        );
        println!(
            "    vib={:.2} con={:.2} harm={:.2} fit={:.2} prox={:.2} mud={:.2}",
            c.breakdown.vibrancy,
            c.breakdown.contrast,
            c.breakdown.harmony,
            c.breakdown.scene_fit,
            c.breakdown.proximity,
            c.breakdown.mud_penalty
        );
    }
    println!();
}

fn print_usage(program: &str) {
    eprintln!(
        r#"Accent Color Picker

Usage: {} [OPTIONS] <INPUT>

Options:
  -p, --palette-size <SIZE>   Palette size (default: 24)
  --seed <SEED>               Random seed for reproducible runs
  --min-luminance <L>         Luminance floor for the accent, 0..1 (default: 0.45)
  -v, --verbose               Print scene and candidate diagnostics
  --help                      Show this help message
"#,
        program
    );
}
