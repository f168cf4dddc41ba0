//! anim-export CLI - export scene descriptions and inspect exported files.

use anim_export::anim::format::read_track;
use anim_export::anim::{dominant_interpolation, Interpolation};
use anim_export::mesh::obj::read_obj_transform;
use anim_export::prelude::*;
use anyhow::{bail, Context};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Export command - run the exporter over a JSON scene
        "export" | "e" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing scene argument");
                eprintln!("Usage: anim-export export <scene.json> [--config <file>] [--base <dir>]");
                std::process::exit(1);
            }
            let config = flag_value(&filtered_args, "--config");
            let base = flag_value(&filtered_args, "--base");
            cmd_export(filtered_args[1], config, base)
        }

        // Dump command - print every record of a track
        "dump" | "d" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: anim-export dump <file.animation> [--json]");
                std::process::exit(1);
            }
            let json_mode = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
            cmd_dump(filtered_args[1], json_mode)
        }

        // Info command - summarize a track or an OBJ transform
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: anim-export info <file.animation|file.obj>");
                std::process::exit(1);
            }
            cmd_info(filtered_args[1])
        }

        "version" | "--version" | "-V" => {
            println!(
                "anim-export {} (built {})",
                env!("CARGO_PKG_VERSION"),
                env!("ANIM_EXPORT_BUILD_DATE")
            );
            Ok(())
        }

        // Help
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            eprintln!("Unknown command: {}", filtered_args[0]);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn flag_value<'a>(args: &[&'a str], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|&a| a == flag)
        .and_then(|i| args.get(i + 1).copied())
}

fn print_help() {
    println!("anim-export - keyframe track and mesh exporter");
    println!();
    println!("USAGE:");
    println!("    anim-export [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    e, export <scene.json>        Export the configured collection of a scene");
    println!("    d, dump   <file> [--json]     Print every record of a .animation file");
    println!("    i, info   <file>              Summarize a .animation file or OBJ transform");
    println!("    version                       Show version and build date");
    println!("    h, help                       Show this help");
    println!();
    println!("EXPORT OPTIONS:");
    println!("    --config <file>  Export config (default: user config dir, then built-in)");
    println!("    --base <dir>     Directory the project path is relative to");
    println!("                     (default: directory of the scene file)");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("EXAMPLES:");
    println!("    anim-export export Blender/scene.json          # Write ObjFiles/ and Animation/");
    println!("    anim-export dump Animation/Camera.animation    # Inspect a track");
    println!("    anim-export info ObjFiles/Cube.obj             # Show the Y-up world matrix");
}

fn cmd_export(scene_path: &str, config: Option<&str>, base: Option<&str>) -> anyhow::Result<()> {
    let scene_path = Path::new(scene_path);
    info!("Loading scene: {}", scene_path.display());
    let mut scene = MemoryScene::load(scene_path)
        .with_context(|| format!("failed to load {}", scene_path.display()))?;

    let config = match config {
        Some(path) => ExportConfig::load(Path::new(path))
            .with_context(|| format!("failed to load config {}", path))?,
        None => ExportConfig::load_default()?,
    };
    debug!(?config, "export config");

    let base = match base {
        Some(dir) => PathBuf::from(dir),
        None => scene_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let exporter = Exporter::new(&config, &base);
    let stats = exporter.export_collection(&mut scene)?;

    println!("Meshes:  {} -> {}", stats.meshes, exporter.mesh_dir().display());
    println!(
        "Tracks:  {} ({} records) -> {}",
        stats.tracks,
        stats.records,
        exporter.animation_dir().display()
    );
    if stats.skipped_tracks > 0 {
        println!("Static:  {}", stats.skipped_tracks);
    }
    Ok(())
}

fn cmd_dump(path: &str, json_mode: bool) -> anyhow::Result<()> {
    let poses = read_track(Path::new(path)).with_context(|| format!("failed to read {}", path))?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&poses)?);
        return Ok(());
    }

    println!(
        "{:>10}  {:<8}  {:>28}  {:>36}  {:>24}",
        "time", "interp", "position", "rotation (xyzw)", "scale"
    );
    for p in &poses {
        println!(
            "{:>10.4}  {:<8}  {:>8.3} {:>8.3} {:>8.3}  {:>8.4} {:>8.4} {:>8.4} {:>8.4}  {:>7.3} {:>7.3} {:>7.3}",
            p.time,
            p.interpolation,
            p.position.x,
            p.position.y,
            p.position.z,
            p.rotation.x,
            p.rotation.y,
            p.rotation.z,
            p.rotation.w,
            p.scale.x,
            p.scale.y,
            p.scale.z,
        );
    }
    Ok(())
}

fn cmd_info(path: &str) -> anyhow::Result<()> {
    let p = Path::new(path);
    match p.extension().and_then(|e| e.to_str()) {
        Some("obj") => {
            let Some(m) = read_obj_transform(p)? else {
                bail!("{} has no TRANSFORM line", path);
            };
            println!("Mesh: {}", path);
            println!("Transform (Y-up, row-major):");
            for i in 0..4 {
                let r = m.row(i);
                println!("  {:>10.4} {:>10.4} {:>10.4} {:>10.4}", r.x, r.y, r.z, r.w);
            }
        }
        _ => {
            let poses = read_track(p).with_context(|| format!("failed to read {}", path))?;
            println!("Track: {}", path);
            println!("Records: {}", poses.len());
            if let (Some(first), Some(last)) = (poses.first(), poses.last()) {
                println!("Time range: {} .. {} s", first.time, last.time);
            }

            let modes: Vec<Interpolation> = poses.iter().map(|p| p.interpolation).collect();
            if let Some(main) = dominant_interpolation(&modes) {
                println!("Interpolation: mostly {}", main);
            }
            for mode in Interpolation::ALL {
                let n = modes.iter().filter(|&&m| m == mode).count();
                if n > 0 {
                    println!("  {:<8} {}", mode, n);
                }
            }

            let flips = poses
                .windows(2)
                .filter(|w| w[0].rotation.dot(w[1].rotation) < 0.0)
                .count();
            if flips > 0 {
                println!("Warning: {} quaternion sign flips between records", flips);
            }
        }
    }
    Ok(())
}
