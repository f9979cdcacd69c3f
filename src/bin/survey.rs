//! Survey binary: analyses a world description and writes a report.
//!
//! Usage: cargo run --release --bin survey -- --world <FILE> [OPTIONS]
//!
//! Options:
//!   --world <FILE>    World description JSON (required)
//!   --config <FILE>   Survey configuration JSON (default: built-in defaults)
//!   --output <FILE>   Write the survey report as JSON
//!   --markers         Log the debug marker placements per chunk
//!   --marker-y <Y>    Height of the debug markers (default: 250)

use std::path::PathBuf;
use std::process::ExitCode;

use terrasurvey::analysis::{designation_markers, Survey, SurveyConfig};
use terrasurvey::core::{logging, Result};
use terrasurvey::world::MemoryWorld;

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(world_path) = parse_str_arg(&args, "--world").map(PathBuf::from) else {
        eprintln!("Usage: survey --world <FILE> [--config <FILE>] [--output <FILE>] [--markers]");
        return ExitCode::FAILURE;
    };

    match run(&args, world_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Survey failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String], world_path: PathBuf) -> Result<()> {
    let config_path = parse_str_arg(args, "--config").map(PathBuf::from);
    let output_path = parse_str_arg(args, "--output").map(PathBuf::from);
    let show_markers = args.iter().any(|a| a == "--markers");
    let marker_y = parse_i32_arg(args, "--marker-y").unwrap_or(250);

    let config = match &config_path {
        Some(path) => SurveyConfig::load(path)?,
        None => SurveyConfig::default(),
    };

    println!("=== Terrasurvey ===");
    println!("World:  {}", world_path.display());
    if let Some(path) = &config_path {
        println!("Config: {}", path.display());
    }
    println!("Samples per chunk: {}x{}", config.sub_chunk_res, config.sub_chunk_res);
    println!();

    let world = MemoryWorld::load(&world_path)?;
    let area = world.area();
    let slice = world.capture_slice(&config.categories)?;

    let survey = Survey::new(config);
    let mut blocks = survey.cached(world);
    let outcome = survey.run(&slice, area, &mut blocks)?;
    let report = &outcome.report;

    println!("Build area: {:?} .. {:?}", area.min(), area.max());
    println!("Chunks:     {} x {}", report.chunk_span.x, report.chunk_span.y);
    for chunk in &report.chunks {
        let tags: Vec<_> = chunk.designations.iter().map(|d| d.as_str()).collect();
        println!(
            "  ({:>2}, {:>2}) {:<28} [{}]",
            chunk.cx,
            chunk.cz,
            chunk.primary_biome,
            tags.join(", ")
        );
    }
    println!("Water bodies: {}", report.water_bodies.len());
    for (id, body) in &report.water_bodies {
        let connections: Vec<_> = body.connections.iter().map(String::as_str).collect();
        println!("  {:<16} {:>6} blocks  connects: [{}]", id, body.cells, connections.join(", "));
    }
    println!("Structure chunks: {:?}", report.structure_chunks);
    println!("Blocks to avoid:  {}", report.avoided_blocks);
    println!("Block queries:    {}", blocks.inner().query_count());
    println!(
        "Elapsed: {:.2}s ({})",
        report.elapsed_secs,
        if report.continue_generation { "time left for generation" } else { "budget spent" }
    );

    if show_markers {
        for marker in designation_markers(&outcome.context.grid, &area, marker_y) {
            log::info!(
                "Marker chunk {:?}: {:?}..{:?} {:?}",
                marker.chunk,
                marker.volume.min,
                marker.volume.max,
                marker.palette
            );
        }
    }

    if let Some(path) = output_path {
        report.save(&path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
