//! Command-line runner: start one job and wait for its outcome.
//!
//! ```text
//! vdb-job transcript <video_id> [--force]
//! vdb-job upload <collection_id> <url> [name]
//! vdb-job index <video_id> [spoken_word|scene]
//! ```

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context};
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vdb_client::{Job, JobKind, VdbClient};
use vdb_models::{IndexType, UploadPayload};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let client = VdbClient::from_env().context("failed to create client")?;

    match args.first().map(String::as_str) {
        Some("transcript") => {
            let video_id = args.get(1).ok_or_else(|| anyhow!("missing <video_id>"))?;
            let force = args.iter().any(|a| a == "--force");
            let transcript = wait_for(client.transcript(video_id.as_str(), force)).await?;
            println!("{}", transcript.full_text());
        }
        Some("upload") => {
            let collection_id = args.get(1).ok_or_else(|| anyhow!("missing <collection_id>"))?;
            let url = args.get(2).ok_or_else(|| anyhow!("missing <url>"))?;
            let mut payload = UploadPayload::new(url.as_str())?;
            if let Some(name) = args.get(3) {
                payload = payload.with_name(name.as_str());
            }
            let media = wait_for(client.upload(collection_id.as_str(), payload)).await?;
            let kind = if media.is_audio() { "audio" } else { "video" };
            info!("Uploaded {} {}", kind, media.meta().id);
            println!("{}", serde_json::to_string_pretty(media.meta())?);
        }
        Some("index") => {
            let video_id = args.get(1).ok_or_else(|| anyhow!("missing <video_id>"))?;
            let index_type: IndexType = match args.get(2) {
                Some(raw) => raw.parse()?,
                None => IndexType::default(),
            };
            let outcome = wait_for(client.index(video_id.as_str(), index_type)).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Some(other) => bail!("unknown command {other}"),
        None => bail!("usage: vdb-job <transcript|upload|index> ..."),
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("vdb=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

/// Start `job` and wait until one of its callbacks fires.
async fn wait_for<K: JobKind>(job: Job<K>) -> anyhow::Result<K::Output> {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let on_error = Arc::clone(&tx);

    job.on_success(move |output| {
        if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
            let _ = tx.send(Ok(output));
        }
    })
    .on_error(move |err| {
        if let Some(tx) = on_error.lock().ok().and_then(|mut slot| slot.take()) {
            let _ = tx.send(Err(err));
        }
    });

    info!(job = %job.title(), "Waiting for job");
    job.start();

    let outcome = rx
        .await
        .map_err(|_| anyhow!("job {} ended without an outcome", job.title()))?;
    Ok(outcome?)
}
