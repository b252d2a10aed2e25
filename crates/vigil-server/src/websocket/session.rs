//! WebSocket session lifecycle — one task per connection, from upgrade
//! through disconnect.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use vigil_core::EventSink;

use crate::metrics::{
    EVENTS_PROCESSED_TOTAL, FLAGGED_EVENTS_TOTAL, WS_PARTICIPANTS_ACTIVE,
    WS_PARTICIPANT_CONNECTIONS_TOTAL, WS_SUPERVISORS_ACTIVE, WS_SUPERVISOR_CONNECTIONS_TOTAL,
};
use crate::registry::{ParticipantHandle, SessionRegistry};
use crate::websocket::connection::SupervisorConnection;
use crate::websocket::handler::handle_event;

/// Consecutive missed ping cycles before a supervisor is disconnected.
const MAX_MISSED_PINGS: u32 = 2;

/// Run a participant session: read frames, dispatch events, fan out and
/// persist the results, unregister on disconnect.
///
/// The server never writes to this socket; the loop is a pure reader.
#[instrument(skip_all, fields(exam_id = %exam_id, student = %student_name))]
pub async fn run_participant_session(
    mut ws: WebSocket,
    exam_id: String,
    student_name: String,
    registry: Arc<SessionRegistry>,
    sink: Arc<dyn EventSink>,
) {
    let connection_id = Uuid::now_v7().to_string();
    registry.register_participant(
        &exam_id,
        &student_name,
        ParticipantHandle::new(connection_id),
    );
    info!("participant connected");
    counter!(WS_PARTICIPANT_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_PARTICIPANTS_ACTIVE).increment(1.0);

    while let Some(Ok(msg)) = ws.recv().await {
        let text = match msg {
            Message::Text(ref t) => Some(t.to_string()),
            Message::Binary(ref data) => match std::str::from_utf8(data) {
                Ok(s) => Some(s.to_string()),
                Err(_) => {
                    debug!(len = data.len(), "non-UTF8 binary frame dropped");
                    None
                }
            },
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => None,
        };
        let Some(text) = text else { continue };

        let Some(outcome) = handle_event(
            &registry,
            &exam_id,
            &student_name,
            &text,
            Utc::now(),
            Instant::now(),
        ) else {
            continue;
        };

        counter!(EVENTS_PROCESSED_TOTAL).increment(1);
        let _ = registry.broadcast_to_supervisors(&exam_id, &outcome.update);

        if let Some(flagged) = outcome.flagged {
            counter!(FLAGGED_EVENTS_TOTAL, "kind" => flagged.event_type.as_str()).increment(1);
            // Fire-and-forget by policy: a sink failure must never stall or
            // close the participant's connection.
            if let Err(e) = sink.append(&flagged) {
                warn!(error = %e, "failed to persist flagged event");
            }
        }
    }

    info!("participant disconnected");
    gauge!(WS_PARTICIPANTS_ACTIVE).decrement(1.0);
    registry.unregister_participant(&exam_id, &student_name);
}

/// Run a supervisor session: forward status updates from the broadcast
/// channel, ping periodically, drain and ignore inbound traffic.
#[instrument(skip_all, fields(exam_id = %exam_id))]
pub async fn run_supervisor_session(
    ws: WebSocket,
    exam_id: String,
    registry: Arc<SessionRegistry>,
    buffer: usize,
    ping_interval: Duration,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) = mpsc::channel::<Arc<String>>(buffer);
    let connection = Arc::new(SupervisorConnection::new(
        Uuid::now_v7().to_string(),
        exam_id.clone(),
        send_tx,
    ));
    registry.register_supervisor(&exam_id, connection.clone());
    info!(conn_id = %connection.id, "supervisor connected");
    counter!(WS_SUPERVISOR_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_SUPERVISORS_ACTIVE).increment(1.0);

    // Outbound forwarder with periodic Ping frames.
    let outbound_conn = connection.clone();
    let outbound = tokio::spawn(async move {
        let mut ping = tokio::time::interval(ping_interval);
        // Skip the immediate first tick.
        let _ = ping.tick().await;
        let mut missed: u32 = 0;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(Message::Text(text.as_str().into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping.tick() => {
                    if outbound_conn.check_alive() {
                        missed = 0;
                    } else {
                        missed += 1;
                        if missed >= MAX_MISSED_PINGS {
                            warn!("supervisor unresponsive, closing");
                            break;
                        }
                    }
                    if ws_tx.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // The supervisor channel carries no commands; inbound frames only keep
    // the connection alive.
    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => connection.mark_alive(),
            Message::Text(_) | Message::Binary(_) => connection.mark_alive(),
        }
    }

    info!(conn_id = %connection.id, dropped = connection.drop_count(), "supervisor disconnected");
    gauge!(WS_SUPERVISORS_ACTIVE).decrement(1.0);
    outbound.abort();
    registry.unregister_supervisor(&exam_id, &connection.id);
}
