use clap::Parser;
use tracing::error;

use lifeplan::api::{Cli, Command, render_plan, run_http_server};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = lifeplan::telemetry::init(&cli.log_level) {
        eprintln!("Telemetry error: {e}");
        std::process::exit(1);
    }

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                error!(error = %e, "server stopped");
                std::process::exit(1);
            }
        }
        Command::Plan(args) => match render_plan(&args) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
