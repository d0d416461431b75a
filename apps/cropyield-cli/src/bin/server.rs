use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use cropyield_cli::{init_tracing, serve};
use cropyield_core::config::Config;
use cropyield_service::PredictionService;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut i = 0; while i < args.len() { match args[i].as_str() {
        "--bind" | "-b" => { if let Some(v) = args.get(i + 1) { settings.server.bind = v.clone(); i += 1; } else { eprintln!("Error: --bind requires an address"); std::process::exit(1); } }
        "--model" | "-m" => { if let Some(v) = args.get(i + 1) { settings.model.path = v.clone(); i += 1; } else { eprintln!("Error: --model requires a path"); std::process::exit(1); } }
        other => { eprintln!("Unknown argument: {}", other); std::process::exit(1); } } i += 1; }

    let base_dir = env::current_dir()?;
    // Built outside the runtime: the translator's blocking client must not be created on an async worker.
    let service = Arc::new(PredictionService::from_settings(&settings, &base_dir)?);
    if !service.model_loaded() {
        tracing::warn!(path = %settings.model.path, "serving without a model; /predict will answer 'Model not loaded'");
    }
    let addr: SocketAddr = settings
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", settings.server.bind))?;
    tokio::runtime::Runtime::new()?.block_on(serve(addr, service.clone()))?;
    Ok(())
}
