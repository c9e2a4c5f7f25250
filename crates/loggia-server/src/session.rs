use axum::extract::ws::{Message, WebSocket};

use loggia::intent::Intent;
use loggia::reply::{SessionFrame, SessionUpdate, TurnReply};

use loggia_engine::engine::Engine;
use loggia_engine::error::{Error, ErrorKind, Result};
use loggia_engine::registry::Registry;

use tracing::{error, info, warn};

// Sent once when a session is established, along with the first snapshot.
const GREETING: &str = "Connected. Tell me what to do with your devices.";

// Sent when a turn could not be understood.
const MALFORMED: &str = "That request could not be understood, so nothing was changed.";

// Sent when a turn hit an internal fault. The turn is abandoned but the
// session stays open for the next message.
const TURN_FAILURE: &str =
    "Something went wrong while handling that request. Please try again.";

/// Serves one WebSocket session until the peer disconnects.
///
/// The loop is strictly sequential: a session never has two turns in
/// flight at once. If the peer disconnects mid-turn, any mutation already
/// committed stands; a validation still in flight is simply discarded.
pub async fn run<R: Registry>(engine: &Engine<R>, mut socket: WebSocket) {
    info!("session established");

    // On establishment the session observes the full current state.
    let frames = greeting_frames(engine).await;
    if send_frames(&mut socket, &frames).await.is_err() {
        return;
    }

    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                info!("session transport closed: {e}");
                break;
            }
        };

        match message {
            Message::Text(text) => {
                let frames = turn_frames(engine, text.as_str()).await;
                if send_frames(&mut socket, &frames).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            // Ping, pong, and binary frames carry no turns.
            _ => {}
        }
    }

    info!("session closed");
}

// The frames sent on session establishment.
async fn greeting_frames<R: Registry>(engine: &Engine<R>) -> Vec<SessionFrame> {
    match engine.snapshot().await {
        Ok(devices) => vec![SessionFrame::Update(SessionUpdate::new(
            GREETING.to_string(),
            devices,
        ))],
        Err(e) => {
            error!("failed to take the connect snapshot: {e}");
            vec![SessionFrame::Reply(TurnReply::message(
                TURN_FAILURE.to_string(),
            ))]
        }
    }
}

// One full receive-resolve-execute-broadcast cycle.
//
// Every fault is converted into frames here, so the session loop never
// terminates because of a bad turn.
async fn turn_frames<R: Registry>(engine: &Engine<R>, text: &str) -> Vec<SessionFrame> {
    let intent: Intent = match serde_json::from_str(text) {
        Ok(intent) => intent,
        Err(e) => {
            warn!("discarding a malformed intent: {e}");
            return vec![SessionFrame::Reply(TurnReply::message(
                MALFORMED.to_string(),
            ))];
        }
    };

    let reply = match engine.handle(&intent).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("turn abandoned: {e}");
            return vec![SessionFrame::Reply(TurnReply::message(
                TURN_FAILURE.to_string(),
            ))];
        }
    };

    // The snapshot is taken after the turn's mutation committed, so the
    // session never observes state older than the action it triggered.
    // Rejected turns broadcast too, for transparency.
    match engine.snapshot().await {
        Ok(devices) => {
            let update = SessionUpdate::new(reply.message.clone(), devices);
            vec![
                SessionFrame::Reply(reply),
                SessionFrame::Update(update),
            ]
        }
        Err(e) => {
            error!("failed to take the turn snapshot: {e}");
            vec![
                SessionFrame::Reply(reply),
                SessionFrame::Reply(TurnReply::message(TURN_FAILURE.to_string())),
            ]
        }
    }
}

async fn send_frames(socket: &mut WebSocket, frames: &[SessionFrame]) -> Result<()> {
    for frame in frames {
        let text = serde_json::to_string(frame).map_err(|e| {
            Error::new(
                ErrorKind::Session,
                format!("Failed to serialize a session frame: {e}."),
            )
        })?;

        socket.send(Message::Text(text.into())).await.map_err(|e| {
            info!("session send failed: {e}");
            Error::new(ErrorKind::Session, format!("Failed to send a frame: {e}."))
        })?;
    }

    Ok(())
}
