use crate::demo::{run_occupancy_report, OccupancyReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use resident_billing::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Resident Billing Reports",
    about = "Run the occupancy/revenue report service or generate reports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate an occupancy and revenue report over the bundled demo data
    Report(OccupancyReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_occupancy_report(args),
    }
}
