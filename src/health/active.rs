//! Active liveness checking.
//!
//! # Responsibilities
//! - Periodically run the `web-ui` check once the daemon is ready
//! - Log and count results
//!
//! A failed check never restarts the daemon; the host decides what to do.

use std::time::Duration;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::result::HealthCheckResult;
use crate::health::web::{check_web_url, health_client, WEB_UI_CHECK};
use crate::lifecycle::shutdown::StopListener;

pub struct HealthMonitor {
    config: HealthCheckConfig,
    client: reqwest::Client,
}

impl HealthMonitor {
    pub fn new(config: HealthCheckConfig) -> Self {
        Self {
            config,
            client: health_client(),
        }
    }

    /// Run the check once.
    pub async fn check_once(&self) -> HealthCheckResult {
        check_web_url(&self.client, &self.config.url, self.config.timeout()).await
    }

    pub async fn run(self, mut stop: StopListener) {
        if !self.config.enabled {
            tracing::info!("Liveness checks disabled");
            return;
        }

        tracing::info!(
            check = WEB_UI_CHECK,
            interval = self.config.interval_secs,
            url = %self.config.url,
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.config.interval().max(Duration::from_millis(1)));
        let mut healthy = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = self.check_once().await;
                    let now_healthy = result.is_success();
                    if healthy != Some(now_healthy) {
                        if now_healthy {
                            tracing::info!(check = WEB_UI_CHECK, "{}", result.message);
                        } else {
                            tracing::warn!(
                                check = WEB_UI_CHECK,
                                status = ?result.result,
                                "{}",
                                result.message
                            );
                        }
                        healthy = Some(now_healthy);
                    }
                }
                _ = stop.stopped() => {
                    tracing::info!("Health monitor received stop signal, exiting loop");
                    break;
                }
            }
        }
    }
}
