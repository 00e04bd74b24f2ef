use anyhow::Result;
use tracing::{error, info};

use config::{init, Command};
use socket_factory::environment::{describe_environment_with, ProcessEnvironment};
use socket_factory::{create, create_async};

#[tokio::main]
async fn main() -> Result<()> {
    // initialize application settings and read command line arguments
    let (command, config) = init()?;
    info!("loaded {}", config.factory);

    match command {
        Command::Env => {
            let info = describe_environment_with(&ProcessEnvironment::from_config(&config.factory));
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Create => match create(&config.url, config.protocols.clone()) {
            Ok(socket) => info!("created websocket for {} with protocols {:?}", socket.url(), socket.protocols()),
            Err(e) => {
                error!("{e}");
                return Err(e.into());
            }
        },
        Command::Open => {
            let socket = create_async(&config.url, config.protocols.clone()).await?;
            let (mut stream, response) = socket.open(config.factory.disable_nagle).await?;
            info!("handshake completed with status {}", response.status());
            stream.close(None).await?;
        }
    }

    Ok(())
}

mod config {
    use std::fs;

    use anyhow::Result;
    use clap::{Parser, Subcommand};
    use serde::{Deserialize, Serialize};
    use socket_factory::config::FactoryConfig;
    use socket_factory::request::Protocols;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    #[derive(Debug, Clone, Copy, PartialEq, Subcommand)]
    pub enum Command {
        /// print the host environment description as json
        Env,
        /// construct a websocket without connecting
        Create,
        /// construct a websocket and perform the opening handshake
        Open,
    }

    #[derive(Debug, Parser)]
    #[clap(author, version, about, long_about = None)]
    struct Args {
        #[clap(short, long)]
        config: Option<String>,
        #[clap(subcommand)]
        command: Command,
    }

    #[derive(Debug, Serialize, Deserialize, Clone, Default)]
    pub struct Config {
        #[serde(default)]
        pub url: String,
        #[serde(default)]
        pub protocols: Protocols,
        #[serde(default)]
        pub factory: FactoryConfig,
    }

    pub fn init() -> Result<(Command, Config)> {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_line_number(true))
            .with(EnvFilter::from_default_env())
            .init();

        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let args = Args::parse();
        let config = match args.config {
            Some(path) => serde_yaml::from_slice::<Config>(fs::read(path)?.as_slice())?,
            None => Config::default(),
        };

        Ok((args.command, config))
    }
}
