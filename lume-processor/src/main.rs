use anyhow::{Context, Result};
use log::{info, warn};
use lume_core::LumeConfig;
use lume_mesh::{MeshBuilder, MeshData, ObjReader, SceneSource, TobjSource};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "lume-processor")]
struct CliArgs {
    /// OBJ file to import
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Write the welded mesh here (bincode)
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    /// TOML config; its [mesh] section supplies defaults
    #[structopt(long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Rescale uniformly so the longest axis spans [-1, 1]
    #[structopt(long = "unit-box")]
    unit_box: bool,
    /// Parse with tobj instead of the built-in reader (ignores smoothing groups)
    #[structopt(long = "tobj")]
    tobj: bool,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    let config = match &args.config {
        Some(path) => LumeConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => LumeConfig::default(),
    };

    let start_total = std::time::Instant::now();
    let scene = if args.tobj {
        TobjSource::new().load(&args.input)
    } else {
        ObjReader::new().load(&args.input)
    }
    .with_context(|| format!("Failed to load OBJ file: {}", args.input.display()))?;

    let data = MeshBuilder::new()
        .scale_to_unit_box(args.unit_box || config.mesh.scale_to_unit_box)
        .build(&scene)
        .with_context(|| format!("Failed to build mesh from {}", args.input.display()))?;
    info!("Model loaded and welded in {:.2}s", start_total.elapsed().as_secs_f32());

    report(&data);

    match &args.output {
        Some(output) => save_mesh(&data, output)?,
        None => warn!("No output path given, nothing written"),
    }
    Ok(())
}

fn report(data: &MeshData) {
    let bounds = &data.bounding_box;
    println!("Vertices:  {}", data.vertices.len());
    println!("Indices:   {} ({} triangles)", data.indices.len(), data.triangle_count());
    println!("Bounds:    {:?} .. {:?}", bounds.lower_corner(), bounds.upper_corner());
    println!("Extent:    {:?}", bounds.extent());
    println!("Center:    {:?}", bounds.center());
}

fn save_mesh(data: &MeshData, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let encoded = bincode::serialize(data).context("Failed to serialize mesh")?;
    writer.write_all(&encoded)?;
    writer.flush()?;

    info!("Saved {} ({:.2} KB)", path.display(), encoded.len() as f64 / 1024.0);
    Ok(())
}
