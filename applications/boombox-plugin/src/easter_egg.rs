//! Easter egg timer
//!
//! When the configured player starts the configured song, the facility
//! shakes after a delay. The timer is a one-shot task that is aborted if the
//! arming boombox stops, pauses or changes track first. It fires at most once
//! per round.

use crate::{config::EasterEggSettings, host::Host};
use boombox_playback::{EntityId, PlayerId, SessionEvent, Track};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct EasterEgg {
    settings: EasterEggSettings,
    used: Arc<AtomicBool>,
    pending: Option<(EntityId, JoinHandle<()>)>,
}

impl EasterEgg {
    pub fn new(settings: EasterEggSettings) -> Self {
        Self {
            settings,
            used: Arc::new(AtomicBool::new(false)),
            pending: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Whether the shake already happened this round
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::SeqCst)
    }

    /// Entity whose track armed a still pending timer
    pub fn armed_entity(&self) -> Option<EntityId> {
        self.pending
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(entity, _)| *entity)
    }

    /// Whether `player` starting `track` should arm the timer
    pub fn matches(&self, track: &Track, player: &PlayerId) -> bool {
        self.settings.enabled
            && track.as_str() == self.settings.song
            && player.as_str() == self.settings.player_id
    }

    /// Start the delayed shake for `entity`
    ///
    /// Replaces any pending timer. Needs a running tokio runtime.
    pub fn arm(&mut self, entity: EntityId, host: Arc<dyn Host>) -> bool {
        if self.is_used() {
            tracing::debug!("Easter egg has already been used this round");
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("Easter egg armed outside of a runtime, ignoring");
            return false;
        };

        let Some(delay) = self.settings.delay() else {
            tracing::warn!(
                "Easter egg delay is not a valid duration: {}",
                self.settings.delay_secs
            );
            return false;
        };

        self.cancel();
        let used = Arc::clone(&self.used);
        tracing::debug!(
            "Easter egg song '{}' started on {}: shake in {:?}",
            self.settings.song,
            entity,
            delay
        );

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if !used.swap(true, Ordering::SeqCst) {
                tracing::debug!("SHAKE");
                host.shake_facility();
            }
        });
        self.pending = Some((entity, handle));
        true
    }

    /// Abort the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some((entity, handle)) = self.pending.take() {
            if !handle.is_finished() {
                tracing::debug!("Easter egg timer for {} cancelled", entity);
            }
            handle.abort();
        }
    }

    /// Cancel the timer when the arming entity's playback ends or changes
    pub fn observe(&mut self, events: &[SessionEvent]) {
        let Some(armed) = self.armed_entity() else {
            return;
        };
        let interrupted = events.iter().any(|event| {
            event.entity() == armed
                && (event.ends_playback() || matches!(event, SessionEvent::TrackStarted { .. }))
        });
        if interrupted {
            self.cancel();
        }
    }

    /// New round: cancel the timer and allow the shake again
    pub fn reset(&mut self) {
        self.cancel();
        self.used.store(false, Ordering::SeqCst);
    }
}

impl Drop for EasterEgg {
    fn drop(&mut self) {
        self.cancel();
    }
}
