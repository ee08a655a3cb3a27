use clap::{Args, Parser, Subcommand};
use outreach_ai::error::AppError;

use crate::demo::{run_demo, run_process, DemoArgs, ProcessArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Client Outreach Orchestrator",
    about = "Run the client outreach orchestrator service and demos from the command line",
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
    /// Run the outreach pipeline for a single client
    Outreach {
        #[command(subcommand)]
        command: OutreachCommand,
    },
    /// Walk both pipeline outcomes against the seeded reference inventory
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum OutreachCommand {
    /// Fetch, analyze, match, and compose for one client identifier
    Process(ProcessArgs),
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
        Command::Outreach {
            command: OutreachCommand::Process(args),
        } => run_process(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
