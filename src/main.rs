//! # Queue Pair Demo - Main Entry Point
//!
//! Drives one full session lifecycle: a writer thread opens the inbound
//! endpoint and appends messages while a reader thread drains the outbound
//! endpoint concurrently. When both finish, a JSON run summary is written to
//! the configured output file or stdout.
//!
//! Logging goes through tracing with a level-colorized formatter; the level
//! can be raised with `--verbose` or the `RUST_LOG` environment variable.

use anyhow::{anyhow, Result};
use clap::Parser;
use queue_pair::cli::Args;
use queue_pair::logging::ColorizedFormatter;
use queue_pair::report::RunSummary;
use queue_pair::{InboundEndpoint, OutboundEndpoint, QueueSession, SessionConfig};
use rand::RngCore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .event_format(ColorizedFormatter)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!(
        "starting queue pair demo: {} messages of {} bytes through a {} byte queue ({})",
        args.messages, args.payload_size, args.capacity, args.policy
    );

    let session = Arc::new(QueueSession::new(SessionConfig {
        capacity: args.capacity,
        policy: args.policy.into(),
    }));

    let summary = run_session(&session, &args)?;

    info!(
        "done: {}/{} offered bytes accepted, {} bytes delivered, {} bytes destroyed or undrained",
        summary.bytes_accepted,
        summary.bytes_offered,
        summary.bytes_read,
        summary.bytes_unaccounted()
    );

    match &args.output_file {
        Some(path) => {
            summary.write_to_file(path)?;
            info!("run summary written to {}", path.display());
        }
        None => println!("{}", summary.to_json()?),
    }

    Ok(())
}

/// Run the writer and reader threads over one session and collect the
/// combined summary.
fn run_session(session: &Arc<QueueSession>, args: &Args) -> Result<RunSummary> {
    let started = Instant::now();
    let writer_done = AtomicBool::new(false);

    let mut summary = crossbeam::thread::scope(|s| -> Result<RunSummary> {
        let writer = s.spawn(|_| -> Result<RunSummary> {
            let mut inbound = InboundEndpoint::open(Arc::clone(session))
                .map_err(|e| anyhow!("inbound open failed: {e}"))?;

            let mut summary = RunSummary::default();
            let mut payload = vec![0u8; args.payload_size];
            let mut rng = rand::thread_rng();

            for _ in 0..args.messages {
                rng.fill_bytes(&mut payload);
                let accepted = inbound.write(&payload);
                summary.record_write(payload.len(), accepted);
                // Pace the writer so the reader has a chance to keep up.
                std::thread::sleep(Duration::from_micros(200));
            }

            writer_done.store(true, Ordering::Release);

            // Keep the queue alive until the reader has drained it; closing
            // the inbound endpoint destroys any unread messages.
            while session.queued_messages().unwrap_or(0) > 0 {
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok(summary)
        });

        let reader = s.spawn(|_| -> Result<RunSummary> {
            // The writer may not have opened the inbound side yet; retry
            // until the queue exists.
            let mut outbound = loop {
                match OutboundEndpoint::open(Arc::clone(session)) {
                    Ok(endpoint) => break endpoint,
                    Err(_) => std::thread::sleep(Duration::from_millis(1)),
                }
            };

            let mut summary = RunSummary::default();
            let mut buf = vec![0u8; args.capacity.max(args.payload_size)];

            loop {
                match outbound.read(&mut buf) {
                    Ok(0) => {
                        if writer_done.load(Ordering::Acquire) {
                            break;
                        }
                        std::thread::sleep(Duration::from_micros(100));
                    }
                    Ok(delivered) => summary.record_read(delivered),
                    // The producer closed and took the queue with it.
                    Err(queue_pair::EndpointError::NotInitialized) => break,
                    Err(e) => return Err(anyhow!("read failed: {e}")),
                }
            }
            Ok(summary)
        });

        let writer_summary = writer.join().map_err(|_| anyhow!("writer panicked"))??;
        let reader_summary = reader.join().map_err(|_| anyhow!("reader panicked"))??;

        Ok(RunSummary {
            capacity: args.capacity,
            messages_written: writer_summary.messages_written,
            bytes_offered: writer_summary.bytes_offered,
            bytes_accepted: writer_summary.bytes_accepted,
            messages_read: reader_summary.messages_read,
            bytes_read: reader_summary.bytes_read,
            elapsed_ms: 0,
        })
    })
    .map_err(|_| anyhow!("session threads panicked"))??;

    summary.set_elapsed(started.elapsed());
    Ok(summary)
}
