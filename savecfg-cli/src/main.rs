use clap::Parser;

use savecfg_cli::cli::Cli;
use savecfg_cli::output::OutputWriter;
use savecfg_cli::{commands, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_format) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    tracing::debug!(query = %cli.query, list = cli.list, "savecfg starting");

    let writer = OutputWriter::new(cli.output);
    if let Err(e) = commands::dispatch(cli, &writer).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
