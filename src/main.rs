mod config;
mod control;
mod cross_fader;
mod error;
mod fader;
mod gain_curve;
mod gui;
mod render;
mod shutdown;
mod xfade;
mod xfade_client;

use crate::config::Config;
use crate::error::Error;
use crate::shutdown::Shutdown;
use crate::xfade::Variant;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::thread;
use tracing::info;

/// Stereo crossfader for JACK
#[derive(Parser, Debug)]
#[command(name = "xfade_jack")]
#[command(version)]
struct Args {
    /// Config file (default: xfade.toml in the user config directory)
    #[arg(short, long, global = true, env = "XFADE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run as a JACK client with a control window (default)
    Run,
    /// Crossfade two stereo WAV files offline
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Input A
    #[arg(long)]
    a: PathBuf,
    /// Input B
    #[arg(long)]
    b: PathBuf,
    /// Output file, 32-bit float stereo
    #[arg(short, long)]
    out: PathBuf,
    /// Crossfade position, -1 (A) to 1 (B); the start position when --to is given
    #[arg(long, allow_hyphen_values = true)]
    position: Option<f32>,
    /// Move the position towards this value, one step per block
    #[arg(long, allow_hyphen_values = true)]
    to: Option<f32>,
    /// Curve shape, 0 (linear) to 1 (equal power)
    #[arg(long)]
    shape: Option<f32>,
    /// Overlap mode selector, 0 (crossfade) or 1 (V-fade)
    #[arg(long)]
    mode: Option<f32>,
    /// Samples per processing block
    #[arg(long, default_value_t = 256)]
    block: usize,
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    Basic,
    Extended,
}

impl From<VariantArg> for Variant {
    fn from(variant: VariantArg) -> Variant {
        match variant {
            VariantArg::Basic => Variant::Basic,
            VariantArg::Extended => Variant::Extended,
        }
    }
}

fn run(config: Config) -> Result<(), Error> {
    let shutdown = Shutdown::new();
    let (sender, receiver) = control::channel();

    let gui_join = {
        let shutdown = shutdown.clone();
        let config = config.clone();
        thread::spawn(move || {
            let _trigger = shutdown.on_drop();
            gui::main(shutdown.clone(), config, sender);
        })
    };
    let client_join = {
        let shutdown = shutdown.clone();
        thread::spawn(move || {
            let _trigger = shutdown.on_drop();
            let result = xfade_client::main(shutdown.clone(), config, receiver);
            if let Err(error) = &result {
                tracing::error!("JACK client failed: {}", error);
            }
            result
        })
    };

    shutdown.wait();
    let result = client_join
        .join()
        .map_err(|_| Error::ThreadPanic("JACK client"))?;
    gui_join.join().map_err(|_| Error::ThreadPanic("GUI"))?;
    Ok(result?)
}

fn render_offline(config: Config, args: RenderArgs) -> Result<(), Error> {
    let mut controls = config.controls;
    if let Some(position) = args.position {
        controls.position = position;
    }
    if let Some(shape) = args.shape {
        controls.shape = shape;
    }
    if let Some(mode) = args.mode {
        controls.mode = mode;
    }
    let settings = render::Settings {
        variant: args.variant.map(Variant::from).unwrap_or(config.variant),
        controls,
        end_position: args.to,
        block: args.block,
    };
    info!(
        "Rendering {} x {} with {:?}",
        args.a.display(),
        args.b.display(),
        settings
    );
    render::render_files(&args.a, &args.b, &args.out, &settings)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xfade_jack=info".into()),
        )
        .init();

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(config).context("JACK client failed"),
        Command::Render(render_args) => render_offline(config, render_args).context("Render failed"),
    }
}
