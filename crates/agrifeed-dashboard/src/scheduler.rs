//! Periodic refresh of the dashboard.
//!
//! One initial weather + news cycle, then three independent interval loops.
//! The initial cycle and every tick are spawned, so a slow fetch can overlap
//! the next one and never delays shutdown. Cancelling the shutdown token stops
//! new ticks; spawned cycles run to completion.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use agrifeed_core::RefreshConfig;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::app::Dashboard;

pub struct Scheduler {
    dashboard: Arc<Dashboard>,
    weather_every: Duration,
    news_every: Duration,
    clock_every: Duration,
    shutdown: CancellationToken,
}

impl Scheduler {
    pub fn new(dashboard: Arc<Dashboard>, refresh: &RefreshConfig) -> Self {
        Self {
            dashboard,
            weather_every: Duration::from_secs(u64::from(refresh.weather_minutes) * 60),
            news_every: Duration::from_secs(u64::from(refresh.news_minutes) * 60),
            clock_every: Duration::from_secs(u64::from(refresh.clock_seconds)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the schedule when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run until the shutdown token is cancelled.
    pub async fn run(self) {
        self.dashboard.clock_tick();
        {
            let dashboard = Arc::clone(&self.dashboard);
            tokio::spawn(async move {
                dashboard.weather_cycle().await;
                dashboard.news_cycle().await;
            });
        }

        let weather = {
            let dashboard = Arc::clone(&self.dashboard);
            every("weather", self.weather_every, self.shutdown.clone(), move || {
                let dashboard = Arc::clone(&dashboard);
                async move {
                    dashboard.weather_cycle().await;
                }
            })
        };
        let news = {
            let dashboard = Arc::clone(&self.dashboard);
            every("news", self.news_every, self.shutdown.clone(), move || {
                let dashboard = Arc::clone(&dashboard);
                async move {
                    dashboard.news_cycle().await;
                }
            })
        };
        let clock = {
            let dashboard = Arc::clone(&self.dashboard);
            every("clock", self.clock_every, self.shutdown.clone(), move || {
                let dashboard = Arc::clone(&dashboard);
                async move {
                    dashboard.clock_tick();
                }
            })
        };

        tokio::join!(weather, news, clock);
        tracing::info!("Refresh schedule stopped");
    }
}

/// Spawn `tick()` every `period` until `shutdown` fires. A zero period
/// disables the loop.
async fn every<F, Fut>(name: &'static str, period: Duration, shutdown: CancellationToken, tick: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    if period.is_zero() {
        tracing::info!("{} refresh disabled", name);
        return;
    }

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::debug!("{} schedule cancelled", name);
                break;
            }
            _ = interval.tick() => {
                tracing::debug!("{} tick", name);
                tokio::spawn(tick());
            }
        }
    }
}
