use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scrollframe::{
    CancelToken, DirFrameSource, FrameSequenceConfig, FrameSequenceRenderer, LoadOpts,
    PixmapSurface, PixmapSurfaceOpts, RenderOutcome, SurfaceSize, load_frames,
};

#[derive(Parser, Debug)]
#[command(name = "scrollframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a frame sequence and report how many frames survived.
    Inspect(InspectArgs),
    /// Render the frame selected by one scroll fraction as a PNG.
    Frame(FrameArgs),
    /// Render evenly spaced scroll fractions as numbered PNGs.
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct SequenceArgs {
    /// Root directory the frame locators are resolved against.
    #[arg(long)]
    frames: PathBuf,

    /// Sequence config JSON. Defaults to the built-in naming scheme.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the locator prefix from the config.
    #[arg(long)]
    prefix: Option<String>,

    /// Override the number of candidate frames from the config.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Override loader worker threads (falls back to `SCROLLFRAME_LOAD_THREADS`).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct SurfaceArgs {
    /// Visible surface width.
    #[arg(long, default_value_t = 500.0)]
    width: f64,

    /// Visible surface height.
    #[arg(long, default_value_t = 500.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long)]
    dpr: Option<f64>,

    /// Background as `#rrggbb` or `#rrggbbaa`; transparent when omitted.
    #[arg(long)]
    background: Option<String>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    sequence: SequenceArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sequence: SequenceArgs,

    #[command(flatten)]
    surface: SurfaceArgs,

    /// Scroll fraction in `[0, 1]`; values outside are clamped.
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    sequence: SequenceArgs,

    #[command(flatten)]
    surface: SurfaceArgs,

    /// Number of evenly spaced scroll fractions, including both ends.
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Output directory for `step_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

impl SequenceArgs {
    fn config(&self) -> anyhow::Result<FrameSequenceConfig> {
        let mut cfg = match &self.config {
            Some(path) => FrameSequenceConfig::from_path(path)?,
            None => FrameSequenceConfig::default(),
        };
        if let Some(prefix) = &self.prefix {
            cfg.prefix = prefix.clone();
        }
        if let Some(n) = self.max_frames {
            cfg.max_frames = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn load_opts(&self) -> LoadOpts {
        match self.threads {
            Some(n) => LoadOpts { threads: Some(n) },
            None => LoadOpts::from_env(),
        }
    }

    fn mount(
        &self,
        surface: PixmapSurface,
    ) -> anyhow::Result<FrameSequenceRenderer<PixmapSurface>> {
        let source = Arc::new(DirFrameSource::new(&self.frames));
        let mut renderer =
            FrameSequenceRenderer::mount(surface, source, self.config()?, self.load_opts())?;
        renderer.wait_for_load();
        let frames = renderer
            .state()
            .frames()
            .context("frame load did not settle")?;
        anyhow::ensure!(
            !frames.is_empty(),
            "no frames could be loaded from '{}'",
            self.frames.display()
        );
        Ok(renderer)
    }
}

impl SurfaceArgs {
    fn surface(&self) -> anyhow::Result<PixmapSurface> {
        let clear = self.background.as_deref().map(parse_hex_rgba).transpose()?;
        let opts = PixmapSurfaceOpts::default().with_clear_rgba(clear);
        Ok(PixmapSurface::with_opts(
            SurfaceSize::new(self.width, self.height),
            self.dpr,
            opts,
        ))
    }
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let cfg = args.sequence.config()?;
    let source = DirFrameSource::new(&args.sequence.frames);
    let set = load_frames(&source, &cfg, args.sequence.load_opts(), &CancelToken::new())?;

    println!("requested {}", set.requested());
    println!("loaded {}", set.len());
    println!("dropped {}", set.dropped());
    if let Some(first) = set.get(0) {
        println!("first {}x{}", first.width, first.height);
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut renderer = args.sequence.mount(args.surface.surface()?)?;
    let outcome = renderer.set_scroll_progress(args.progress);
    let RenderOutcome::Drawn { frame } = outcome else {
        anyhow::bail!("no frame drawn: {outcome:?}");
    };
    write_snapshot(renderer.surface(), &args.out)?;
    eprintln!("wrote {} (frame {frame})", args.out.display());
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps >= 1, "--steps must be >= 1");
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut renderer = args.sequence.mount(args.surface.surface()?)?;
    for step in 0..args.steps {
        let progress = if args.steps == 1 {
            0.0
        } else {
            step as f64 / (args.steps - 1) as f64
        };
        let outcome = renderer.set_scroll_progress(progress);
        let RenderOutcome::Drawn { frame } = outcome else {
            anyhow::bail!("no frame drawn at progress {progress}: {outcome:?}");
        };
        let out = args.out_dir.join(format!("step_{step:04}.png"));
        write_snapshot(renderer.surface(), &out)?;
        tracing::info!(step, progress, frame, "rendered step");
    }
    eprintln!("wrote {} steps to {}", args.steps, args.out_dir.display());
    Ok(())
}

fn write_snapshot(surface: &PixmapSurface, out: &Path) -> anyhow::Result<()> {
    let frame = surface.snapshot().context("surface has no content")?;
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn parse_hex_rgba(s: &str) -> anyhow::Result<[u8; 4]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    anyhow::ensure!(
        (hex.len() == 6 || hex.len() == 8) && hex.is_ascii(),
        "background must be #rrggbb or #rrggbbaa, got '{s}'"
    );
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .with_context(|| format!("invalid hex channel in '{s}'"))
    };
    let a = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok([channel(0)?, channel(2)?, channel(4)?, a])
}
