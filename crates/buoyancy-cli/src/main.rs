mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use buoyancy_cli::terminal::ColorPalette;

use commands::convert::ConvertArgs;
use commands::init::InitArgs;
use commands::materials::MaterialsArgs;
use commands::optimize::OptimizeArgs;
use commands::pack::PackArgs;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Size buoyant pressure cylinders and pack them into boxes"
)]
struct Cli {
    /// Disable ANSI colors in table output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a diameter x length grid for the most buoyant feasible cylinders.
    Optimize(OptimizeArgs),
    /// Count how many cylinders fit a box with hexagonal packing.
    Pack(PackArgs),
    /// List the material catalog.
    Materials(MaterialsArgs),
    /// Convert between water depth and hydrostatic pressure.
    Convert(ConvertArgs),
    /// Write a project file with default settings.
    Init(InitArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let palette = ColorPalette::for_flags(cli.no_color);

    match cli.command {
        Command::Optimize(args) => commands::optimize::handle_optimize(&args, &palette),
        Command::Pack(args) => commands::pack::handle_pack(&args, &palette),
        Command::Materials(args) => commands::materials::handle_materials(&args, &palette),
        Command::Convert(args) => commands::convert::handle_convert(&args, &palette),
        Command::Init(args) => commands::init::handle_init(&args),
    }
}

/// Log to stderr so stdout stays parseable for JSON and CSV output.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
