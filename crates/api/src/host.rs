//! Native-messaging host loop
//!
//! Requests are read sequentially but each one runs on its own task, so
//! responses may come back in a different order than the requests arrived.
//! Responses and broadcasts share a single writer task that owns the output.

use std::io;

use delegate_core::Notification;
use delegate_domain::DelegateError;
use delegate_infra::Subscription;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::framing::{encode_frame, read_frame, write_frame, FrameError};
use crate::protocol::Response;
use crate::router::EventRouter;

const OUTBOUND_QUEUE: usize = 256;

/// Serve frames from `reader` until it reaches end of stream.
///
/// In-flight requests are allowed to finish and their responses are flushed
/// before this returns.
pub async fn serve<R, W>(
    router: EventRouter,
    subscription: Subscription,
    mut reader: R,
    writer: W,
) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (outbound, queue) = mpsc::channel::<Vec<u8>>(OUTBOUND_QUEUE);
    let writer_task = tokio::spawn(write_loop(writer, queue));
    let (stop_forwarding, shutdown) = oneshot::channel();
    let forwarder = tokio::spawn(forward_broadcasts(subscription, outbound.clone(), shutdown));

    let mut requests = JoinSet::new();
    let outcome = loop {
        match read_frame(&mut reader).await {
            Ok(Some(frame)) => {
                let router = router.clone();
                let outbound = outbound.clone();
                requests.spawn(async move { respond(&router, frame, &outbound).await });
            }
            Ok(None) => {
                info!("input closed, shutting down host loop");
                break Ok(());
            }
            Err(FrameError::Json(err)) => {
                warn!(error = %err, "dropping frame that is not valid JSON");
            }
            Err(err) => {
                error!(error = %err, "failed to read frame");
                break Err(err);
            }
        }
    };

    while let Some(joined) = requests.join_next().await {
        if let Err(err) = joined {
            error!(error = %err, "request task failed");
        }
    }
    // Notifications published by the last requests are still queued.
    let _ = stop_forwarding.send(());
    if let Err(err) = forwarder.await {
        error!(error = %err, "broadcast forwarder failed");
    }
    drop(outbound);

    match writer_task.await {
        Ok(written) => written?,
        Err(err) => return Err(FrameError::Io(io::Error::other(err))),
    }
    outcome
}

async fn respond(router: &EventRouter, frame: Value, outbound: &mpsc::Sender<Vec<u8>>) {
    let Some(response) = router.handle(frame).await else {
        return;
    };
    let bytes = match encode_frame(&response) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "response could not be framed, replying with an error");
            let fallback = Response::failure(DelegateError::Internal(err.to_string()))
                .with_request_id(response.request_id);
            match encode_frame(&fallback) {
                Ok(bytes) => bytes,
                Err(err) => {
                    error!(error = %err, "failed to frame error response");
                    return;
                }
            }
        }
    };
    if outbound.send(bytes).await.is_err() {
        debug!("writer closed before response was sent");
    }
}

/// Forward notifications until the hub closes or `shutdown` fires. On
/// shutdown whatever is already queued is still written.
async fn forward_broadcasts(
    mut subscription: Subscription,
    outbound: mpsc::Sender<Vec<u8>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            received = subscription.recv() => match received {
                Some(notification) => {
                    if !forward(&outbound, &notification).await {
                        break;
                    }
                }
                None => break,
            },
            _ = &mut shutdown => {
                while let Some(notification) = subscription.try_recv() {
                    if !forward(&outbound, &notification).await {
                        break;
                    }
                }
                break;
            }
        }
    }
    subscription.unsubscribe();
}

/// Queue one notification. `false` once the writer is gone.
async fn forward(outbound: &mpsc::Sender<Vec<u8>>, notification: &Notification) -> bool {
    match encode_frame(notification) {
        Ok(bytes) => outbound.send(bytes).await.is_ok(),
        Err(err) => {
            warn!(
                event = notification.event_name(),
                error = %err,
                "dropping notification that cannot be framed"
            );
            true
        }
    }
}

async fn write_loop<W>(mut writer: W, mut queue: mpsc::Receiver<Vec<u8>>) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = queue.recv().await {
        write_frame(&mut writer, &frame).await?;
    }
    Ok(())
}
