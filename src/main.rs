use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use app::App;
use commands::Reply;
use config::AppConfig;
use services::data_service::load_ticker_data;

fn auto_render(app: &App, config: &AppConfig) {
    if !config.auto_render || app.chart().is_none() {
        return;
    }
    if let Err(e) = app.render(&config.output) {
        warn!("❌ Auto render failed: {}", e);
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();

    // stdout carries command replies, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    info!("📈 Starting ticker-charts v{}", env!("CARGO_PKG_VERSION"));
    info!("   Source: {}", config.data_source);
    info!("   Viewport: {}x{}", config.viewport.width, config.viewport.height);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return;
    }

    let mut app = App::new(&config);

    let (tx, mut loaded) = oneshot::channel();
    let source = config.data_source.clone();
    tokio::spawn(async move {
        let _ = tx.send(load_ticker_data(&source).await);
    });
    let mut load_pending = true;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Loading...");

    loop {
        let deadline = app.next_deadline();

        tokio::select! {
            result = &mut loaded, if load_pending => {
                load_pending = false;
                match result {
                    Ok(Ok(data)) => {
                        app.on_loaded(data);
                        auto_render(&app, &config);
                    }
                    // the chart keeps showing "Loading..." after a failed load
                    Ok(Err(e)) => error!("❌ Failed to load {}: {}", config.data_source, e),
                    Err(e) => error!("❌ Loader stopped without a result: {}", e),
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if app.flush(Instant::now()) {
                    auto_render(&app, &config);
                }
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let changed = line
                        .split_whitespace()
                        .next()
                        .map_or(false, |command| commands::changes_state(&command.to_lowercase()));

                    match commands::handle_line(&mut app, &line, &config.output, Instant::now()) {
                        Reply::Quit => break,
                        Reply::Text(text) => println!("{}", text),
                        Reply::Silent => {}
                    }
                    if changed {
                        auto_render(&app, &config);
                    }
                }
                Ok(None) => {
                    debug!("stdin closed");
                    // a drag at the end of piped input still lands
                    if app.flush_now() {
                        auto_render(&app, &config);
                    }
                    break;
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("👋 Shutting down");
}
