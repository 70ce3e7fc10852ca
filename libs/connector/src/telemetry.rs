use ic_telemetry::{TelemetryLabels, record_counter};
use ic_translator::IgnoreReason;

const PLATFORM: &str = "intercom";
const EVENTS_RECEIVED_COUNTER: &str = "events_received";
const EVENTS_IGNORED_COUNTER: &str = "events_ignored";
const TURN_FAILED_COUNTER: &str = "turns_failed";

pub fn record_received(kind: &str) {
    record_counter(
        EVENTS_RECEIVED_COUNTER,
        1,
        &TelemetryLabels::new(PLATFORM).with_kind(kind),
    );
}

pub fn record_ignored(reason: IgnoreReason) {
    let mut labels = TelemetryLabels::new(PLATFORM);
    labels.extra.push(("reason".into(), reason.as_str().into()));
    record_counter(EVENTS_IGNORED_COUNTER, 1, &labels);
}

pub fn record_turn_failed(stage: &'static str) {
    let mut labels = TelemetryLabels::new(PLATFORM);
    labels.extra.push(("stage".into(), stage.into()));
    record_counter(TURN_FAILED_COUNTER, 1, &labels);
}
