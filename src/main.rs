//! windsp-editor main entry point

use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use windsp_api::{start_server, ConfigEndpoint};
use windsp_config::Settings;

#[derive(Parser, Debug)]
#[command(name = "windsp-editor")]
#[command(version)]
#[command(about = "Serves and saves the WinDSP JSON configuration over HTTP", long_about = None)]
struct Args {
    /// WinDSP configuration file (default: WinDSP.json in the working directory)
    #[arg(long, env = "WINDSP_CONF")]
    conf: Option<PathBuf>,

    /// Settings file (YAML)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Print a default settings file and exit
    #[arg(long)]
    print_default_settings: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_settings {
        print!("{}", Settings::generate_default());
        return Ok(());
    }

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.validate().context("Invalid settings")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
    )
    .init();

    // Resolve before binding so a missing file stops startup
    let locator = Arc::new(settings.locator(args.conf));
    locator
        .resolve()
        .context("Config file check failed at startup")?;

    info!("Write mode: {}", settings.document.write_mode);
    let endpoint = ConfigEndpoint::new(locator, settings.document.write_mode);

    let rt = Runtime::new()?;
    rt.block_on(start_server(&settings, endpoint))
        .context("Server error")?;

    Ok(())
}
