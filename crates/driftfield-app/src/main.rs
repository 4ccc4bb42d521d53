use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use driftfield_runtime::{run_app, RuntimeConfig};

fn main() {
    // Init logging
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(filter)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = match std::env::args().nth(1) {
        Some(path) => match RuntimeConfig::load(&path) {
            Ok(config) => {
                info!("Loaded runtime config from {path}");
                config
            }
            Err(e) => {
                eprintln!("Driftfield config error ({path}): {e}");
                std::process::exit(2);
            }
        },
        None => RuntimeConfig::default(),
    };

    info!("Driftfield starting");
    if let Err(e) = run_app(config) {
        eprintln!("Driftfield error: {e}");
        std::process::exit(1);
    }
}
