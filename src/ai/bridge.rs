//! Runs dialogue requests off the main schedule and hands their outcomes back.
//!
//! Requests execute on a small tokio runtime owned by this resource. Each
//! finished request is pushed into a channel that only the main schedule
//! drains, so UI components are never touched from a worker thread.

use bevy::prelude::*;
use crossbeam::channel::{self, Receiver, Sender};
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

use super::pipeline::DialogueOutcome;

/// A finished request addressed to the NPC that asked for it.
#[derive(Debug)]
pub struct DialogueCompletion {
    pub target: Entity,
    pub outcome: DialogueOutcome,
}

#[derive(Resource)]
pub struct DialogueBridge {
    runtime: Option<Runtime>,
    sender: Sender<DialogueCompletion>,
    receiver: Receiver<DialogueCompletion>,
}

impl DialogueBridge {
    pub fn new() -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("forest-ai")
            .enable_all()
            .build()?;
        Ok(Self::with_runtime(Some(runtime)))
    }

    /// A bridge that accepts completions but cannot run requests.
    pub fn detached() -> Self {
        Self::with_runtime(None)
    }

    fn with_runtime(runtime: Option<Runtime>) -> Self {
        let (sender, receiver) = channel::unbounded();
        Self {
            runtime,
            sender,
            receiver,
        }
    }

    /// Sender for completions produced outside [`DialogueBridge::submit`].
    pub fn sender(&self) -> Sender<DialogueCompletion> {
        self.sender.clone()
    }

    /// Starts `request` in the background. Its outcome shows up in
    /// [`DialogueBridge::drain`] on some later frame.
    pub fn submit<F>(&self, target: Entity, request: F)
    where
        F: Future<Output = DialogueOutcome> + Send + 'static,
    {
        let Some(runtime) = &self.runtime else {
            warn!("[AI] No async runtime, dropping dialogue request for {:?}", target);
            return;
        };

        let sender = self.sender.clone();
        runtime.spawn(async move {
            let outcome = request.await;
            if sender.send(DialogueCompletion { target, outcome }).is_err() {
                debug!("[AI] Bridge closed before completion for {:?} arrived", target);
            }
        });
    }

    /// Completions that arrived since the last call, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = DialogueCompletion> + '_ {
        self.receiver.try_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_submitted_request_arrives_in_drain() {
        let bridge = DialogueBridge::new().unwrap();
        let target = Entity::from_raw(7);

        bridge.submit(target, async { DialogueOutcome::Reply("oi".into()) });

        let deadline = Instant::now() + Duration::from_secs(5);
        let completion = loop {
            if let Some(completion) = bridge.drain().next() {
                break completion;
            }
            assert!(Instant::now() < deadline, "completion never arrived");
            std::thread::sleep(Duration::from_millis(5));
        };

        assert_eq!(completion.target, target);
        assert!(matches!(completion.outcome, DialogueOutcome::Reply(ref t) if t == "oi"));
    }

    #[test]
    fn test_detached_bridge_drops_requests() {
        let bridge = DialogueBridge::detached();
        bridge.submit(Entity::from_raw(1), async { DialogueOutcome::NotInitialized });
        assert_eq!(bridge.drain().count(), 0);
    }

    #[test]
    fn test_sender_feeds_drain_in_order() {
        let bridge = DialogueBridge::detached();
        let sender = bridge.sender();
        for i in 0..3 {
            sender
                .send(DialogueCompletion {
                    target: Entity::from_raw(i),
                    outcome: DialogueOutcome::NotInitialized,
                })
                .unwrap();
        }

        let targets: Vec<Entity> = bridge.drain().map(|c| c.target).collect();
        assert_eq!(targets, vec![Entity::from_raw(0), Entity::from_raw(1), Entity::from_raw(2)]);
    }
}
