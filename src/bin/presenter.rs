//! Presentation-screen companion: follows a live session and logs what should be
//! on screen whenever a remote control changes it.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use log::{info, warn};

use pulpit::routes::qr::qr_handlers::remote_control_url;
use pulpit::sync::{HttpLiveSessionAccessor, LiveSessionSync, POLL_INTERVAL};

// Consecutive failures before the screen reports the server as unreachable.
const UNHEALTHY_AFTER: u32 = 3;

#[derive(Parser)]
#[command(name = "pulpit-presenter", about = "Follow a live session from the presentation screen")]
struct Args {
    /// Base URL of the pulpit server
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    /// Live session to follow
    #[arg(long)]
    session: String,

    /// Base URL of the web app, used to print the remote-control link
    #[arg(long, default_value = pulpit::config::DEFAULT_APP_BASE_URL)]
    app_url: String,

    /// Poll period in seconds
    #[arg(long, default_value_t = POLL_INTERVAL.as_secs())]
    interval: u64,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!(
        "Remote control for this screen: {}",
        remote_control_url(&args.app_url, &args.session)
    );

    let accessor = Arc::new(HttpLiveSessionAccessor::new(&args.server));
    let mut sync = LiveSessionSync::with_interval(accessor, Duration::from_secs(args.interval.max(1)));
    let mut updates = sync.subscribe();
    sync.activate(Some(args.session.clone()));

    let mut shown_revision = 0;
    let mut reported_unhealthy = false;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();

                if state.revision != shown_revision {
                    shown_revision = state.revision;
                    if let Some(snapshot) = &state.snapshot {
                        let fields = serde_json::Value::Object(snapshot.fields.clone());
                        info!("Now showing (revision {}): {}", state.revision, fields);
                    }
                }

                let unhealthy = state.health.consecutive_failures >= UNHEALTHY_AFTER;
                if unhealthy && !reported_unhealthy {
                    warn!(
                        "Live session unreachable after {} attempts: {}",
                        state.health.consecutive_failures,
                        state.health.last_error.as_deref().unwrap_or("unknown error")
                    );
                } else if !unhealthy && reported_unhealthy {
                    info!("Live session reachable again");
                }
                reported_unhealthy = unhealthy;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down presenter");
                break;
            }
        }
    }

    sync.deactivate();
}
