use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use stitchview_cli_lib::Session;
use stitchview_core::Point;

#[derive(Parser, Debug)]
#[command(version, about = "Composite crochet round diagrams from visualization payloads", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Print the draw list for one round as JSON.
    Render(RenderArgs),
    /// Print the stitch id under a surface pixel.
    Pick(PickArgs),
    /// Step through every round and print its scrubber line and announcement.
    Rounds(PayloadArgs),
}

#[derive(Args, Debug)]
struct PayloadArgs {
    /// Visualization payload (`{frames, total_rounds, shape_type}`).
    payload: PathBuf,
    /// Viewer config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    payload: PayloadArgs,
    #[arg(long, default_value_t = 1)]
    round: i64,
    /// Viewport scale; below 0.5 draws the minimal tier.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
    /// Surface width in pixels, overriding the config.
    #[arg(long)]
    width: Option<f64>,
    /// Surface height in pixels, overriding the config.
    #[arg(long)]
    height: Option<f64>,
}

impl RenderArgs {
    fn open(&self) -> Result<Session, String> {
        let mut session = open(&self.payload)?;
        if self.width.is_some() || self.height.is_some() {
            let viewport = session.viewport_at(self.scale);
            session.set_surface_size(
                self.width.unwrap_or(viewport.width),
                self.height.unwrap_or(viewport.height),
            );
        }
        Ok(session)
    }
}

#[derive(Args, Debug)]
struct PickArgs {
    #[command(flatten)]
    render: RenderArgs,
    x: f64,
    y: f64,
}

fn open(args: &PayloadArgs) -> Result<Session, String> {
    let mut session = Session::with_config_file(args.config.as_deref())?;
    let info = session.open_payload(&args.payload)?;
    log::info!(
        "Opened {} rounds ({}{})",
        info.total_rounds,
        info.shape_type.as_deref().unwrap_or("unknown shape"),
        if info.three_d { ", 3D" } else { "" }
    );
    Ok(session)
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        CliCommand::Render(args) => {
            let mut session = args.open()?;
            let list = session.render(args.round, args.scale);
            println!("{}", list.to_json().map_err(|e| e.to_string())?);
        }
        CliCommand::Pick(args) => {
            let mut session = args.render.open()?;
            let hit = session.pick(
                args.render.round,
                args.render.scale,
                Point::new(args.x, args.y),
            );
            println!("{}", hit.as_deref().unwrap_or("none"));
        }
        CliCommand::Rounds(args) => {
            let mut session = open(&args)?;
            for line in session.walk_rounds() {
                match line.announcement {
                    Some(text) => println!("{}: {}", line.label, text),
                    None => println!("{}", line.label),
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
