//! The decryption relay: asynchronous fulfilment delivery and the
//! never-fulfilled watchdog.
//!
//! Decryption callbacks arrive out of band from the FHE coprocessor. The
//! relay owns the receiving end of a bounded channel and applies each
//! fulfilment through the engine handle; a second task periodically
//! re-requests decryptions whose callback never came.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use hush_crypto::DecryptionFulfillment;
use hush_voting::FulfillOutcome;

use crate::handle::EngineHandle;

pub struct DecryptionRelay;

impl DecryptionRelay {
    /// Spawn the task applying fulfilments until shutdown or channel close.
    pub fn spawn_fulfillments(
        handle: EngineHandle,
        mut fulfillments: mpsc::Receiver<DecryptionFulfillment>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let fulfillment = tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        tracing::info!("decryption relay shutting down");
                        break;
                    }
                    next = fulfillments.recv() => match next {
                        Some(fulfillment) => fulfillment,
                        None => {
                            tracing::info!("fulfilment channel closed, relay exiting");
                            break;
                        }
                    },
                };

                let request_id = fulfillment.request_id;
                match handle
                    .write(|engine| engine.fulfill_decryption(fulfillment))
                    .await
                {
                    Ok(FulfillOutcome::Tallied(results)) => {
                        tracing::debug!(request = %request_id, options = results.len(), "fulfilment applied");
                    }
                    Ok(FulfillOutcome::AlreadyTallied) => {}
                    Err(e) => {
                        tracing::warn!(request = %request_id, error = %e, "rejected decryption fulfilment");
                    }
                }
            }
        })
    }

    /// Spawn the watchdog that re-requests stale decryptions every `period`.
    pub fn spawn_watchdog(
        handle: EngineHandle,
        period: Duration,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // skip the immediate first tick
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        tracing::info!("decryption watchdog shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match handle.write(|engine| engine.reissue_stale_decryptions()).await {
                            Ok(reissued) if !reissued.is_empty() => {
                                tracing::info!(count = reissued.len(), "stale decryptions re-requested");
                            }
                            Ok(_) => {}
                            Err(e) => {
                                tracing::error!(error = %e, "decryption watchdog sweep failed");
                            }
                        }
                    }
                }
            }
        })
    }
}
