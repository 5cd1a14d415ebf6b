// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use system_context::SystemContext;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;
use tokio_util::codec::{BytesCodec, FramedRead};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

const METRICS_LOGGING_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
pub struct Metrics {
    total_conn: AtomicU64,
    bytes_recv: AtomicU64,
    bytes_sent: AtomicU64,
}

impl Metrics {
    pub fn total_connections(&self) -> u64 {
        self.total_conn.load(Ordering::Relaxed)
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_recv.load(Ordering::Relaxed)
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    fn log(&self) {
        info!(
            "Metrics: total_connections_since_start={}, bytes_received={}, bytes_sent={}",
            self.total_connections(),
            self.bytes_received(),
            self.bytes_sent(),
        );
    }
}

/// Echo server that keeps accepting connections until its [SystemContext] gets cancelled
/// and then gives the open connections up to `shutdown_timeout` to wind down.
pub struct EchoServer {
    listener: TcpListener,
    context: SystemContext,
    shutdown_timeout: Duration,
    metrics: Arc<Metrics>,
    tracker: TaskTracker,
}

impl EchoServer {
    pub async fn bind(
        listen_address: SocketAddr,
        context: SystemContext,
        shutdown_timeout: Duration,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(listen_address).await?;
        info!("listening on {}", listener.local_addr()?);

        Ok(EchoServer {
            listener,
            context,
            shutdown_timeout,
            metrics: Arc::new(Metrics::default()),
            tracker: TaskTracker::new(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub async fn run(self) {
        let metrics = Arc::clone(&self.metrics);
        let context = self.context.clone();
        self.tracker.spawn(async move {
            while context
                .run_until_cancelled(sleep(METRICS_LOGGING_INTERVAL))
                .await
                .is_some()
            {
                metrics.log()
            }
        });

        loop {
            tokio::select! {
                biased;
                _ = self.context.cancelled() => {
                    info!("system context got cancelled - no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => {
                    let (stream, remote) = match accepted {
                        Ok(accepted) => accepted,
                        Err(err) => {
                            warn!("failed to accept connection: {err}");
                            continue;
                        }
                    };
                    debug!("handling new connection from {remote}");
                    self.metrics.total_conn.fetch_add(1, Ordering::Relaxed);

                    self.tracker.spawn(handle_incoming(
                        stream,
                        remote,
                        Arc::clone(&self.metrics),
                        self.context.clone(),
                    ));
                }
            }
        }

        drop(self.listener);
        self.tracker.close();

        info!(
            "waiting up to {} for {} tasks to finish",
            humantime::format_duration(self.shutdown_timeout),
            self.tracker.len()
        );
        match tokio::time::timeout(self.shutdown_timeout, self.tracker.wait()).await {
            Ok(_) => info!("all connections closed"),
            Err(_) => warn!(
                "timed out while waiting for {} tasks to finish",
                self.tracker.len()
            ),
        }
        self.metrics.log();
    }
}

async fn handle_incoming(
    socket: TcpStream,
    remote: SocketAddr,
    metrics: Arc<Metrics>,
    context: SystemContext,
) {
    let (read, mut write) = socket.into_split();
    let mut framed_read = FramedRead::new(read, BytesCodec::new());

    loop {
        tokio::select! {
            _ = context.cancelled() => {
                debug!("closing connection with {remote}: shutting down");
                break;
            }
            read = framed_read.next() => {
                let bytes = match read {
                    Some(Ok(bytes)) => bytes,
                    Some(Err(err)) => {
                        error!("failed to read from {remote}: {err}");
                        break;
                    }
                    None => break,
                };

                let len = bytes.len() as u64;
                metrics.bytes_recv.fetch_add(len, Ordering::Relaxed);
                if let Err(err) = write.write_all(&bytes).await {
                    error!("failed to write to {remote}: {err}");
                    break;
                }
                metrics.bytes_sent.fetch_add(len, Ordering::Relaxed);
            }
        }
    }

    debug!("connection with {remote} closed");
}
