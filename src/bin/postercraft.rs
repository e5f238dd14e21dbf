use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};

use postercraft::svg::rasterize_svg_logo;
use postercraft::{CANVAS_WIDTH, FontLibrary, PosterError, PosterRenderer, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "postercraft", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single poster.
    Render(RenderArgs),
    /// Render every job listed in a JSON manifest.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Optional logo (PNG/JPEG/WebP or SVG).
    #[arg(long)]
    logo: Option<PathBuf>,

    /// JSON object of render options.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Override a single option, e.g. `--set grain_amount=0.1`. Values parse as JSON when
    /// possible, otherwise as strings.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Directory of custom `.ttf`/`.otf` fonts, matched by file stem.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Seed for the grain noise.
    #[arg(long)]
    seed: Option<u64>,

    /// Output path; format follows the extension.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON array of jobs: `{"background", "logo"?, "options"?, "out", "seed"?}`. Relative paths
    /// resolve against the manifest's directory.
    #[arg(long)]
    manifest: PathBuf,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,

    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct BatchJob {
    background: PathBuf,
    #[serde(default)]
    logo: Option<PathBuf>,
    #[serde(default)]
    options: Value,
    out: PathBuf,
    #[serde(default)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn load_fonts(dir: Option<&Path>) -> anyhow::Result<FontLibrary> {
    let fonts = FontLibrary::system();
    let fonts = match dir {
        Some(dir) => fonts.with_custom_dir(dir)?,
        None => fonts,
    };
    tracing::info!(faces = fonts.face_count(), "fonts ready");
    Ok(fonts)
}

fn read_background(path: &Path) -> anyhow::Result<image::DynamicImage> {
    let img = image::open(path)
        .map_err(|e| PosterError::invalid_input(format!("{}: {e}", path.display())))
        .with_context(|| format!("decode background '{}'", path.display()))?;
    Ok(img)
}

fn read_logo(path: &Path, fonts: &FontLibrary) -> anyhow::Result<image::DynamicImage> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let bytes =
            std::fs::read(path).with_context(|| format!("read logo '{}'", path.display()))?;
        let img = rasterize_svg_logo(&bytes, fonts, CANVAS_WIDTH)
            .with_context(|| format!("rasterize svg logo '{}'", path.display()))?;
        return Ok(image::DynamicImage::ImageRgba8(img));
    }
    image::open(path).with_context(|| format!("decode logo '{}'", path.display()))
}

fn read_options(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read options '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| "parse options JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("options file '{}' must hold a JSON object", path.display()),
    }
}

fn parse_set(kv: &str) -> anyhow::Result<(String, Value)> {
    let (k, v) = kv
        .split_once('=')
        .with_context(|| format!("--set expects KEY=VALUE, got '{kv}'"))?;
    let value = serde_json::from_str(v).unwrap_or_else(|_| Value::String(v.to_owned()));
    Ok((k.trim().to_owned(), value))
}

fn write_output(img: &image::RgbImage, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save(out)
        .with_context(|| format!("write poster '{}'", out.display()))
}

fn render_one(
    renderer: &PosterRenderer,
    background: &Path,
    logo: Option<&Path>,
    opts: &RenderOptions,
    seed: Option<u64>,
    out: &Path,
) -> anyhow::Result<()> {
    let bg = read_background(background)?;
    let logo = logo
        .map(|p| read_logo(p, renderer.fonts()))
        .transpose()?;

    let poster = match seed {
        Some(seed) => {
            renderer.render_with_rng(&bg, logo.as_ref(), opts, &mut StdRng::seed_from_u64(seed))
        }
        None => renderer.render(&bg, logo.as_ref(), opts),
    }?;
    write_output(&poster, out)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut map = match &args.options {
        Some(p) => read_options(p)?,
        None => Map::new(),
    };
    for kv in &args.set {
        let (k, v) = parse_set(kv)?;
        map.insert(k, v);
    }
    let opts = RenderOptions::from_map(&map);
    let renderer = PosterRenderer::new(load_fonts(args.fonts.as_deref())?);

    let t0 = Instant::now();
    render_one(
        &renderer,
        &args.background,
        args.logo.as_deref(),
        &opts,
        args.seed,
        &args.out,
    )?;
    tracing::info!(elapsed_ms = t0.elapsed().as_millis() as u64, "rendered");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    let jobs: Vec<BatchJob> = serde_json::from_str(&text)
        .map_err(|e| PosterError::validation(format!("manifest: {e}")))
        .with_context(|| "parse batch manifest")?;
    let root = args
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let renderer = PosterRenderer::new(load_fonts(args.fonts.as_deref())?);
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.jobs {
        if n == 0 {
            anyhow::bail!("--jobs must be at least 1");
        }
        pool = pool.num_threads(n);
    }
    let pool = pool.build().context("build render thread pool")?;

    let t0 = Instant::now();
    let results: Vec<(PathBuf, anyhow::Result<()>)> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let out = root.join(&job.out);
                let opts = RenderOptions::from_json(&job.options);
                let logo = job.logo.as_ref().map(|p| root.join(p));
                let res = render_one(
                    &renderer,
                    &root.join(&job.background),
                    logo.as_deref(),
                    &opts,
                    job.seed,
                    &out,
                );
                (out, res)
            })
            .collect()
    });

    let mut failed = 0usize;
    for (out, res) in &results {
        match res {
            Ok(()) => eprintln!("ok      {}", out.display()),
            Err(e) => {
                failed += 1;
                eprintln!("failed  {}: {e:#}", out.display());
            }
        }
    }
    tracing::info!(
        total = results.len(),
        failed,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "batch finished"
    );
    if failed > 0 {
        anyhow::bail!("{failed} of {} jobs failed", results.len());
    }
    Ok(())
}
