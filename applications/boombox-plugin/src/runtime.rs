/// Round-scoped background tasks
use crate::{host::TrackedItem, plugin::BoomboxPlugin};
use boombox_playback::{AudioBackend, PlayerId};
use std::{sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle, time::MissedTickBehavior};

/// Periodic end-of-track check, one per round
#[derive(Debug)]
pub struct LoopTask {
    handle: JoinHandle<()>,
}

impl LoopTask {
    /// Spawn the polling loop on the current runtime
    pub fn spawn<B>(plugin: Arc<Mutex<BoomboxPlugin<B>>>, period: Duration) -> Self
    where
        B: AudioBackend + 'static,
    {
        let handle = tokio::spawn(async move {
            tracing::debug!("Loop task started, polling every {:?}", period);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = plugin.lock().await.poll();
                for (entity, e) in &report.failures {
                    tracing::debug!("Loop task: {} skipped this tick: {}", entity, e);
                }
            }
        });
        Self { handle }
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for LoopTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Shared plugin plus its round lifecycle
pub struct BoomboxService<B: AudioBackend + 'static> {
    plugin: Arc<Mutex<BoomboxPlugin<B>>>,
    loop_task: Option<LoopTask>,
}

impl<B: AudioBackend + 'static> BoomboxService<B> {
    pub fn new(plugin: BoomboxPlugin<B>) -> Self {
        Self {
            plugin: Arc::new(Mutex::new(plugin)),
            loop_task: None,
        }
    }

    /// Shared handle for host event callbacks
    pub fn plugin(&self) -> Arc<Mutex<BoomboxPlugin<B>>> {
        Arc::clone(&self.plugin)
    }

    /// Start a round and its polling loop
    ///
    /// A loop left over from a previous round is aborted first.
    pub async fn start_round(&mut self, tracked: &[TrackedItem], players: &[PlayerId]) {
        if let Some(previous) = self.loop_task.take() {
            tracing::warn!("Round started while a loop task was still running, restarting it");
            previous.abort();
        }

        let period = {
            let mut plugin = self.plugin.lock().await;
            plugin.on_round_started(tracked, players);
            plugin.config().poll_interval()
        };

        self.loop_task = Some(LoopTask::spawn(Arc::clone(&self.plugin), period));
    }

    /// Stop the polling loop and end the round
    pub async fn end_round(&mut self) {
        if let Some(task) = self.loop_task.take() {
            task.abort();
            tracing::debug!("Loop task stopped");
        }
        self.plugin.lock().await.on_round_ended();
    }

    /// Whether a polling loop is running
    pub fn is_looping(&self) -> bool {
        self.loop_task.as_ref().is_some_and(|task| !task.is_finished())
    }
}
