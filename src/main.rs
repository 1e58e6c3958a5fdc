mod cli;

use clap::Parser;

use campus_core::config;
use cli::{Cli, Commands};

fn main() -> campus_core::Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults based on the
    // verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "campus=trace,campus_server=trace,campus_db=debug,tower_http=debug".to_string()
        } else {
            "campus=info,campus_server=info,campus_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = config::load_or_default(cli.config.as_deref())?;
            config.server.host = host;
            config.server.port = port;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(campus_server::start(config))
        }
    }
}
