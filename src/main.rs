use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notification_hub_jobs::config::Settings;
use notification_hub_jobs::jobs::find_timer_job;
use notification_hub_jobs::sink::{LogSink, NotificationSink};
use notification_hub_jobs::tasks::{QueueTask, TimerTask};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Load configuration
    let settings = Settings::new()?;
    let pattern = settings.tag_pattern()?;
    tracing::info!(
        hub = %settings.hub.name,
        connection_configured = settings.has_connection(),
        tag_pattern = %pattern,
        "Configuration loaded"
    );

    let sink: Arc<dyn NotificationSink> = Arc::new(LogSink::new(settings.hub.name.clone()));
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let mut handles = Vec::new();

    // Start timer jobs in background
    for name in &settings.jobs.enabled {
        let Some(job) = find_timer_job(name) else {
            tracing::warn!(job = %name, "Unknown timer job, skipping");
            continue;
        };
        let task = TimerTask::new(job, sink.clone(), shutdown_tx.subscribe());
        handles.push(tokio::spawn(task.run()));
    }

    // Queue job reads one JSON routing record per stdin line
    let (queue_tx, queue_rx) = mpsc::channel::<String>(settings.jobs.queue_capacity);
    let queue_task = QueueTask::new(queue_rx, pattern, sink.clone(), shutdown_tx.subscribe());
    handles.push(tokio::spawn(queue_task.run()));
    tokio::spawn(read_queue_from_stdin(queue_tx));

    tracing::info!(tasks = handles.len(), "Jobs running");

    shutdown_signal_handler(shutdown_tx).await;

    // Wait for background tasks to finish
    tracing::info!("Waiting for background tasks to finish...");
    futures::future::join_all(handles).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn read_queue_from_stdin(queue_tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => {
                if queue_tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read queue input");
                break;
            }
        }
    }
}

async fn shutdown_signal_handler(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }

    let _ = shutdown_tx.send(());
}
