use tracing::{info, warn};

use crate::queue::{SendRecord, TurnReport};

/// Side channel receiving every delivery outcome of a turn.
///
/// `outcome` is called once per settled send, in submission order; `turn_finished` once per
/// turn, after the last outcome and before the turn's completion future resolves.
pub trait DeliveryLogger: Send + Sync {
    fn outcome(&self, conversation_id: &str, record: &SendRecord);

    fn turn_finished(&self, conversation_id: &str, report: &TurnReport);
}

/// Logs outcomes as structured tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDeliveryLogger;

impl DeliveryLogger for TracingDeliveryLogger {
    fn outcome(&self, conversation_id: &str, record: &SendRecord) {
        match &record.result {
            Ok(response) => info!(
                conversation_id,
                seq = record.seq,
                message_type = record.request.body.message_type(),
                response = %response,
                "intercom reply delivered"
            ),
            Err(err) => warn!(
                conversation_id,
                seq = record.seq,
                message_type = record.request.body.message_type(),
                code = err.code(),
                error = %err,
                "intercom reply failed"
            ),
        }
    }

    fn turn_finished(&self, conversation_id: &str, report: &TurnReport) {
        info!(
            conversation_id,
            sent = report.delivered_count(),
            failed = report.failed_count(),
            "delivery turn finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ReplyRequest, TransportError};
    use ic_core::{ConnectorConfig, PlatformReply};

    fn record(seq: usize, result: Result<serde_json::Value, TransportError>) -> SendRecord {
        let config = ConnectorConfig::new("bot", "secret-token").unwrap();
        SendRecord {
            seq,
            request: ReplyRequest::post_reply(&config, "c-1", PlatformReply::comment("bot", "hi")),
            result,
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn logs_each_outcome_and_turn_summary() {
        let logger = TracingDeliveryLogger;
        let ok = record(0, Ok(serde_json::json!({ "id": "1" })));
        let failed = record(1, Err(TransportError::Transport("reset".into())));
        logger.outcome("c-1", &ok);
        logger.outcome("c-1", &failed);
        logger.turn_finished(
            "c-1",
            &TurnReport {
                conversation_id: "c-1".into(),
                records: vec![ok, failed],
            },
        );

        assert!(logs_contain("intercom reply delivered"));
        assert!(logs_contain("intercom reply failed"));
        assert!(logs_contain("E_TRANSPORT"));
        assert!(logs_contain("delivery turn finished"));
        assert!(!logs_contain("secret-token"));
    }
}
