use anyhow::Context;
use arcwheel::export;
use arcwheel::portfolio::Portfolio;
use arcwheel::{Layout, LayoutParams, Scene, WheelSizing};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arcwheel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct LayoutArgs {
    /// Portfolio file (TOML, JSON, YAML...) listing the investments
    portfolio: PathBuf,

    /// Angular gap between segments, in radians
    #[arg(long)]
    gap: Option<f64>,

    /// Minimum arc per segment, in radians
    #[arg(long)]
    min_arc: Option<f64>,
}

impl LayoutArgs {
    fn params(&self) -> anyhow::Result<LayoutParams> {
        let defaults = LayoutParams::default();
        let params = LayoutParams {
            gap: self.gap.unwrap_or(defaults.gap),
            min_arc: self.min_arc.unwrap_or(defaults.min_arc),
        };
        params.validate()?;
        Ok(params)
    }

    fn load(&self) -> anyhow::Result<(Portfolio, Layout)> {
        let portfolio = Portfolio::load(&self.portfolio)?;
        let layout = Layout::compute(&portfolio.allocation_items(), self.params()?);
        if layout.overflows() {
            log::warn!("segments overlap: too many items for the configured gap and min arc");
        }
        Ok((portfolio, layout))
    }
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the arc layout of a portfolio
    Layout(LayoutArgs),
    /// Render a portfolio as an SVG wheel
    Svg {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Side length of the square image, in pixels
        #[arg(long, default_value_t = 280.0)]
        size: f64,

        /// Rotation applied to the whole wheel, in radians
        #[arg(short = 'r', long, default_value_t = 0.0, allow_hyphen_values = true)]
        rotate: f64,

        /// Write to this file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Show the Orbit window
    Show,
    /// Hide the Orbit window
    Hide,
    /// Make Orbit re-read its config and portfolio
    Reload,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout(args) => print_layout(&args),
        Commands::Svg {
            layout,
            size,
            rotate,
            output,
        } => write_svg(&layout, size, rotate, output),
        Commands::Show => send_command("show"),
        Commands::Hide => send_command("hide"),
        Commands::Reload => send_command("reload"),
    }
}

fn print_layout(args: &LayoutArgs) -> anyhow::Result<()> {
    let (_, layout) = args.load()?;

    println!(
        "{:<16} {:<5} {:>8} {:>8} {:>8} {:>8}",
        "id", "label", "start", "end", "arc", "percent"
    );
    for s in layout.iter() {
        println!(
            "{:<16} {:<5} {:>8.4} {:>8.4} {:>8.4} {:>7.2}%",
            s.item_id.as_str(),
            s.label.as_str(),
            s.start_angle,
            s.end_angle,
            s.arc_angle,
            s.percent
        );
    }
    Ok(())
}

fn write_svg(
    args: &LayoutArgs,
    size: f64,
    rotate: f64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (portfolio, layout) = args.load()?;
    let sizing = WheelSizing {
        size,
        ..WheelSizing::default()
    };
    sizing.validate()?;

    let scene = Scene::compose(&layout, rotate, &sizing, sizing.center());
    let caption = format!("{:.0}", portfolio.total_value());
    let document = export::scene_to_svg(&scene, size, Some(&caption));

    match output {
        Some(path) => svg::save(&path, &document)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", document),
    }
    Ok(())
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(arcwheel::SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orbit at {}: {}. Is orbit running?",
            arcwheel::SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
