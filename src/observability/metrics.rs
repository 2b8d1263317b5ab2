//! Session metrics.
//!
//! # Metrics
//! - `wallet_connect_attempts_total` (counter): connect attempts by outcome
//! - `wallet_disconnects_total` (counter): session resets by reason
//! - `wallet_network_switch_total` (counter): switch/add results
//! - `wallet_provider_events_total` (counter): forwarded wallet events by kind
//! - `wallet_session_connected` (gauge): 1=connected, 0=otherwise

pub fn record_connect_attempt(outcome: &'static str) {
    metrics::counter!("wallet_connect_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_disconnect(reason: &'static str) {
    metrics::counter!("wallet_disconnects_total", "reason" => reason).increment(1);
}

pub fn record_network_switch(result: &'static str) {
    metrics::counter!("wallet_network_switch_total", "result" => result).increment(1);
}

pub fn record_provider_event(kind: &'static str) {
    metrics::counter!("wallet_provider_events_total", "kind" => kind).increment(1);
}

pub fn set_session_connected(connected: bool) {
    metrics::gauge!("wallet_session_connected").set(if connected { 1.0 } else { 0.0 });
}
