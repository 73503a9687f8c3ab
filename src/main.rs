use std::sync::Arc;

use worker_connect::clock::SystemClock;
use worker_connect::config::AppConfig;
use worker_connect::console::Console;
use worker_connect::directory::FixtureSource;
use worker_connect::submission::LogSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("🔧 Worker Connect v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Reply delay: {}ms", config.reply_delay.as_millis());
    eprintln!("   Reset policy: {}", config.reset_policy);
    eprintln!("   Type /help for commands, /quit to exit.\n");

    let console = Console::new(
        config,
        Arc::new(LogSink),
        Arc::new(FixtureSource::new()),
        Arc::new(SystemClock::new()),
    );
    console.run().await?;

    Ok(())
}
