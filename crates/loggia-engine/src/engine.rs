use loggia::device::DeviceSnapshot;
use loggia::intent::Intent;
use loggia::reply::TurnReply;

use tracing::warn;

use crate::error::{ErrorKind, Result};
use crate::executor;
use crate::finder;
use crate::policy::{self, Resolution};
use crate::registry::Registry;

/// The resolution and control pipeline.
///
/// One engine serves every session: it receives structured intents,
/// resolves them against the registry, validates and executes them, and
/// produces the replies and snapshots sessions observe.
///
/// The pipeline for one intent is finder, then disambiguation policy,
/// then validator and executor. Unmatched, ambiguous, rejected, and
/// redundant requests all produce an `Ok` reply; only persistence faults
/// surface as errors, to be reported by the enclosing session loop.
#[derive(Debug)]
pub struct Engine<R: Registry> {
    registry: R,
}

impl<R: Registry> Engine<R> {
    /// Creates an [`Engine`] over the given [`Registry`].
    #[must_use]
    #[inline]
    pub const fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Returns a reference to the underlying [`Registry`].
    #[must_use]
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Resolves and executes one [`Intent`], producing the [`TurnReply`]
    /// for the caller.
    ///
    /// Pass-through intents without an action mutate nothing.
    ///
    /// # Errors
    ///
    /// An error is returned only when the underlying store fails; every
    /// user-facing outcome, including rejections, is an `Ok` reply.
    pub async fn handle(&self, intent: &Intent) -> Result<TurnReply> {
        let Some(ref action) = intent.action else {
            return Ok(TurnReply::message(
                "No device action was requested.".to_string(),
            ));
        };

        let candidates = finder::find(&self.registry, &intent.selection_criteria).await?;

        match policy::resolve(candidates) {
            Resolution::NotFound => {
                warn!(
                    criteria = %intent.selection_criteria,
                    "selection matched no device"
                );
                Ok(TurnReply::message(format!(
                    "No device matches \"{}\". Try the device name, its kind, or its room.",
                    intent.selection_criteria
                )))
            }
            Resolution::Clarify(candidates) => {
                warn!(
                    criteria = %intent.selection_criteria,
                    count = candidates.len(),
                    "selection is ambiguous"
                );
                let listing = candidates
                    .iter()
                    .map(|candidate| format!("{} ({})", candidate.name, candidate.room))
                    .collect::<Vec<String>>()
                    .join(", ");
                Ok(TurnReply::clarify(
                    format!(
                        "Several devices match \"{}\": {listing}. Which one did you mean?",
                        intent.selection_criteria
                    ),
                    candidates,
                ))
            }
            Resolution::Act(device) => {
                match executor::execute(&self.registry, device.id, action).await {
                    Ok(outcome) => Ok(TurnReply::resolved(
                        outcome.message,
                        DeviceSnapshot::from(&outcome.device),
                    )),
                    // The device vanished between resolution and
                    // execution: report it, never crash the turn.
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        warn!(device = %device.name, "device vanished before execution");
                        Ok(TurnReply::message(format!(
                            "Sorry, {} is no longer available.",
                            device.name
                        )))
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Returns a full [`DeviceSnapshot`] of every registered device, in
    /// stable registration order.
    ///
    /// The read is consistent: it reflects every update committed before
    /// the call, in particular any mutation of the same turn.
    ///
    /// # Errors
    ///
    /// An error is returned when the registry cannot be read.
    pub async fn snapshot(&self) -> Result<Vec<DeviceSnapshot>> {
        let devices = self.registry.list().await?;
        Ok(devices.iter().map(DeviceSnapshot::from).collect())
    }
}
