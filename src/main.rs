use clap::Parser;
use courier::Provider;
use courier::core::config::{self, CourierConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "courier", version, about = "Terminal chat client for a remote AI agent")]
struct Args {
    /// Completion provider (overrides config and COURIER_PROVIDER)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name (overrides config and COURIER_MODEL)
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to courier.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("courier.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        CourierConfig::default()
    });
    let resolved = config::resolve(&file_config, args.provider, args.model.as_deref());

    log::info!(
        "Courier starting up with provider: {:?}, model: {}",
        resolved.provider,
        resolved.model_name
    );

    courier::tui::run(resolved)
}
