use std::sync::Arc;
use std::time::Instant;

use ic_core::{ConnectorConfig, PlatformReply};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, warn};

use crate::logger::DeliveryLogger;
use crate::telemetry::{context_for, record_egress_failure, record_egress_success, start_send_span};
use crate::transport::{ReplyRequest, ReplyTransport, TransportError};

/// Outcome of one reply call.
#[derive(Debug)]
pub struct SendRecord {
    /// Zero-based submission index within the turn.
    pub seq: usize,
    pub request: ReplyRequest,
    pub result: Result<Value, TransportError>,
}

impl SendRecord {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every settled send of a turn, in submission order.
#[derive(Debug)]
pub struct TurnReport {
    pub conversation_id: String,
    pub records: Vec<SendRecord>,
}

impl TurnReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn delivered_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_delivered()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.records.len() - self.delivered_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SendRecord> {
        self.records.iter().filter(|r| !r.is_delivered())
    }
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("{failed} of {total} replies to conversation {conversation_id} failed")]
    SendsFailed {
        conversation_id: String,
        failed: usize,
        total: usize,
        report: TurnReport,
    },
    #[error("delivery worker for conversation {conversation_id} stopped: {reason}")]
    WorkerStopped {
        conversation_id: String,
        reason: String,
    },
}

/// Serializes the replies of one delivery turn.
///
/// Each queue owns a single worker task; a send starts only after the previous one settled,
/// so replies reach the conversation in the order they were enqueued. Failed sends are
/// recorded and never stop later ones.
pub struct DeliveryQueue {
    conversation_id: String,
    tx: mpsc::UnboundedSender<PlatformReply>,
    worker: JoinHandle<Vec<SendRecord>>,
    logger: Arc<dyn DeliveryLogger>,
}

impl DeliveryQueue {
    /// Starts the worker for a turn. Must be called from within a tokio runtime.
    pub fn new(
        config: Arc<ConnectorConfig>,
        conversation_id: impl Into<String>,
        transport: Arc<dyn ReplyTransport>,
        logger: Arc<dyn DeliveryLogger>,
    ) -> Self {
        let conversation_id = conversation_id.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(
            config,
            conversation_id.clone(),
            transport,
            logger.clone(),
            rx,
        ));
        Self {
            conversation_id,
            tx,
            worker,
            logger,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Queues a translated reply. `None` (an untranslatable envelope) is skipped.
    ///
    /// Returns whether a send was queued.
    pub fn enqueue(&self, reply: Option<PlatformReply>) -> bool {
        let Some(reply) = reply else {
            return false;
        };
        match self.tx.send(reply) {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    conversation_id = %self.conversation_id,
                    "delivery worker gone; dropping reply"
                );
                false
            }
        }
    }

    /// Waits for every queued send to settle and reports the turn.
    pub async fn finished(self) -> Result<TurnReport, TurnError> {
        let Self {
            conversation_id,
            tx,
            worker,
            logger,
        } = self;
        drop(tx);

        let records = match worker.await {
            Ok(records) => records,
            Err(err) => {
                let report = TurnReport {
                    conversation_id: conversation_id.clone(),
                    records: Vec::new(),
                };
                logger.turn_finished(&conversation_id, &report);
                return Err(TurnError::WorkerStopped {
                    conversation_id,
                    reason: err.to_string(),
                });
            }
        };

        let report = TurnReport {
            conversation_id: conversation_id.clone(),
            records,
        };
        logger.turn_finished(&conversation_id, &report);

        let failed = report.failed_count();
        if failed > 0 {
            return Err(TurnError::SendsFailed {
                conversation_id,
                failed,
                total: report.records.len(),
                report,
            });
        }
        Ok(report)
    }
}

async fn run_worker(
    config: Arc<ConnectorConfig>,
    conversation_id: String,
    transport: Arc<dyn ReplyTransport>,
    logger: Arc<dyn DeliveryLogger>,
    mut rx: mpsc::UnboundedReceiver<PlatformReply>,
) -> Vec<SendRecord> {
    let mut records = Vec::new();
    while let Some(reply) = rx.recv().await {
        let seq = records.len();
        let ctx = context_for(&conversation_id, reply.message_type());
        let span = start_send_span(&ctx, seq);
        let request = ReplyRequest::post_reply(&config, &conversation_id, reply);

        let started = Instant::now();
        let result = transport.send(&request).instrument(span).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(_) => record_egress_success(&ctx, latency_ms),
            Err(err) => record_egress_failure(&ctx, err.code(), latency_ms),
        }

        let record = SendRecord {
            seq,
            request,
            result,
        };
        logger.outcome(&conversation_id, &record);
        records.push(record);
    }
    records
}
