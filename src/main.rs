use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use topicgate::config::ConfigArgs;
use topicgate::server::config::ServerConfig;
use topicgate::server::factory::ServerFactory;

#[derive(Parser, Debug)]
#[command(author, version = env!("TOPICGATE_VERSION"), about)]
struct ServerArgs {
    /// Print server configuration data (JSON) and exit.
    #[arg(long)]
    pub print_config: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

async fn run(args: ServerArgs) -> Result<()> {
    let cfg: ServerConfig = args.config.load("server")?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    cfg.logs.init("server")?;
    info!("Starting topicgate {}", env!("TOPICGATE_VERSION"));

    let factory = ServerFactory::new(cfg)?;
    let server = factory.build_server().context("build restful server")?;

    server.run().await.context("run restful server")?;

    info!("Server exited by user");
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();
    match run(args).await {
        Ok(()) => {}
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
