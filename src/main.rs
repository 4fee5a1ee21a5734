//! pointcloud-feed listener entry point.
//!
//! Connects to the feed, decodes every message and logs it. Runs until the
//! connection closes or Ctrl-C.

use pointcloud_feed::client::{self, Channel, Dispatcher, TracingSink};
use pointcloud_feed::config::ListenerConfig;
use pointcloud_feed::telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ListenerConfig::from_env()?;

    // Initialize tracing
    telemetry::init(config.log_format);
    tracing::info!(url = %config.feed_url, "starting pointcloud-feed listener");

    let dispatcher = Dispatcher::new(TracingSink);
    let mut channel = Channel::new(config.feed_url);

    tokio::select! {
        dispatched = client::run(&mut channel, &dispatcher) => {
            tracing::info!(dispatched, "feed closed");
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("shutdown requested");
        }
    }

    Ok(())
}
