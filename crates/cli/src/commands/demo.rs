//! `demo` command implementation.
//!
//! Busy threads plus a few async tasks give every profile something to show.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use config_loader::ConfigLoader;

use crate::cli::DemoArgs;

const ASYNC_TASKS: usize = 4;

/// Execute the `demo` command
pub async fn run_demo(args: &DemoArgs) -> Result<()> {
    let config = ConfigLoader::from_env().context("Failed to load SIGPROF_* configuration")?;
    let handle = sigprof::install(config.clone()).context("Failed to install sigprof")?;

    let pid = std::process::id();
    println!("sigprof demo running as pid {pid}");
    println!("  SIGUSR1 -> {}", config.usr1.join(","));
    println!("  SIGUSR2 -> {}", config.usr2.join(","));
    println!("  try: sigprof trigger --pid {pid} --signal usr1");

    let stop = Arc::new(AtomicBool::new(false));
    let iterations = Arc::new(AtomicU64::new(0));
    let mut workers = Vec::with_capacity(args.workers + ASYNC_TASKS);
    for id in 0..args.workers {
        let stop = Arc::clone(&stop);
        let iterations = Arc::clone(&iterations);
        workers.push(tokio::task::spawn_blocking(move || {
            busy_loop(id, &stop, &iterations)
        }));
    }
    for id in 0..ASYNC_TASKS {
        workers.push(spawn_ticker(id, Arc::clone(&stop)));
    }

    info!(pid, workers = args.workers, "Demo workload started");

    let limit = async {
        if args.duration == 0 {
            std::future::pending::<()>().await;
        } else {
            tokio::time::sleep(Duration::from_secs(args.duration)).await;
        }
    };

    tokio::select! {
        res = shutdown_signal() => {
            res?;
            warn!("Received shutdown signal, stopping demo...");
        }
        _ = limit => {
            info!(duration_secs = args.duration, "Demo duration elapsed");
        }
    }

    stop.store(true, Ordering::Relaxed);
    for worker in workers {
        worker.await.context("Demo worker panicked")?;
    }

    let snapshot = handle.metrics().snapshot();
    handle.shutdown().await;

    println!("\nDemo finished after {} work iterations", iterations.load(Ordering::Relaxed));
    println!("  signals received:  {}", snapshot.signals);
    println!("  captures written:  {}", snapshot.successes);
    println!("  cpu captures:      {}", snapshot.continuous_starts);
    println!("  captures failed:   {}", snapshot.failures);
    Ok(())
}

/// CPU and allocation churn until `stop` is set
fn busy_loop(id: usize, stop: &AtomicBool, iterations: &AtomicU64) {
    let mut seed = id as u64 + 1;
    while !stop.load(Ordering::Relaxed) {
        let mut counts = BTreeMap::new();
        for _ in 0..10_000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            *counts.entry(seed % 1024).or_insert(0u32) += 1;
        }
        let mut values: Vec<_> = counts.into_values().collect();
        values.sort_unstable();
        std::hint::black_box(values);
        iterations.fetch_add(1, Ordering::Relaxed);
    }
}

fn spawn_ticker(id: usize, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut buffers: Vec<Vec<u8>> = Vec::new();
        let mut interval = tokio::time::interval(Duration::from_millis(100 * (id as u64 + 1)));
        while !stop.load(Ordering::Relaxed) {
            interval.tick().await;
            buffers.push(vec![id as u8; 64 * 1024]);
            if buffers.len() > 32 {
                buffers.drain(..16);
            }
        }
    })
}

/// Ctrl+C or SIGTERM
async fn shutdown_signal() -> Result<()> {
    let mut terminate =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;

    tokio::select! {
        res = tokio::signal::ctrl_c() => res.context("Failed to install Ctrl+C handler")?,
        _ = terminate.recv() => {}
    }
    Ok(())
}
