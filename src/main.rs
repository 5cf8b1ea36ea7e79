use std::time::{Duration, Instant};

use anyhow::Result;

use horus_trader::config::Config;
use horus_trader::trader::{CycleState, Trader};

/// Restart delay growth for the outer supervisor.
struct ExponentialBackoff {
    current: Duration,
    initial: Duration,
    max: Duration,
    factor: f64,
}

impl ExponentialBackoff {
    fn new(initial: Duration, max: Duration, factor: f64) -> Self {
        Self {
            current: initial,
            initial,
            max,
            factor,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = Duration::from_secs_f64(
            (self.current.as_secs_f64() * self.factor).min(self.max.as_secs_f64()),
        );
        delay
    }

    fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// A run surviving this long counts as healthy and resets the backoff.
const HEALTHY_RUN: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!(
                "Make sure .env exists with ROOSTOO_API_KEY, ROOSTOO_API_SECRET and HORUS_API_KEY"
            );
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        roostoo_url = %config.roostoo.rest_base_url,
        horus_url = %config.horus.base_url,
        assets = config.trading.tradable_assets().len(),
        interval = %config.horus.interval,
        "starting horus-trader"
    );

    let trader = Trader::new(config)?;

    // Non-fatal connectivity probe.
    match trader.roostoo().server_time().await {
        Ok(server_time) => tracing::info!(server_time, "Roostoo reachable"),
        Err(e) => tracing::warn!(error = %e, "Roostoo serverTime probe failed"),
    }

    // Supervisor: restart the whole run on any escaped error. Threshold
    // state is intra-run and starts fresh after each restart.
    let mut backoff = ExponentialBackoff::new(
        Duration::from_secs(10),
        Duration::from_secs(300),
        2.0,
    );
    loop {
        tracing::info!("trading run starting");
        let started = Instant::now();
        match trader.run(CycleState::default()).await {
            Ok(()) => break,
            Err(e) => {
                if started.elapsed() >= HEALTHY_RUN {
                    backoff.reset();
                }
                let delay = backoff.next_delay();
                tracing::error!(error = %e, delay_secs = delay.as_secs(), "run failed, restarting");
                tokio::time::sleep(delay).await;
            }
        }
    }

    Ok(())
}
