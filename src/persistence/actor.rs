//! Persistence actor - serializes task list writes on the Tokio runtime

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::messages::{PersistCommand, PersistResponse};
use crate::models::Task;
use crate::storage::{KeyValueStore, TaskStore};

/// Persistence actor that owns the only write path to storage
pub struct PersistenceActor<S> {
    store: Arc<TaskStore<S>>,
    response_tx: mpsc::UnboundedSender<PersistResponse>,
    debounce: Duration,
}

impl<S: KeyValueStore> PersistenceActor<S> {
    pub fn new(
        store: TaskStore<S>,
        response_tx: mpsc::UnboundedSender<PersistResponse>,
        debounce: Duration,
    ) -> Self {
        PersistenceActor {
            store: Arc::new(store),
            response_tx,
            debounce,
        }
    }

    /// Run the persistence actor message loop
    pub async fn run(self, mut cmd_rx: mpsc::UnboundedReceiver<PersistCommand>) {
        while let Some(cmd) = cmd_rx.recv().await {
            let (mut revision, mut tasks) = match cmd {
                PersistCommand::Save { revision, tasks } => (revision, tasks),
                PersistCommand::Shutdown => break,
            };

            // Collect newer snapshots that arrive within the debounce window;
            // only the newest one is written.
            let deadline = Instant::now() + self.debounce;
            let mut shutdown = false;
            loop {
                match tokio::time::timeout_at(deadline, cmd_rx.recv()).await {
                    Ok(Some(PersistCommand::Save { revision: r, tasks: t })) => {
                        tracing::debug!(superseded = revision, by = r, "Coalescing save");
                        revision = r;
                        tasks = t;
                    }
                    Ok(Some(PersistCommand::Shutdown)) | Ok(None) => {
                        shutdown = true;
                        break;
                    }
                    Err(_elapsed) => break,
                }
            }

            self.write(revision, tasks).await;

            if shutdown {
                break;
            }
        }
        tracing::info!("Persistence actor stopped");
    }

    async fn write(&self, revision: u64, tasks: Vec<Task>) {
        let store = Arc::clone(&self.store);
        let count = tasks.len();
        let result = tokio::task::spawn_blocking(move || store.save(&tasks)).await;

        let response = match result {
            Ok(Ok(())) => {
                tracing::info!(revision, count, "Tasks saved");
                PersistResponse::Saved { revision }
            }
            Ok(Err(e)) => {
                tracing::error!(revision, error = %e, "Failed to save tasks");
                PersistResponse::Failed {
                    revision,
                    error: e.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(revision, error = %e, "Save task panicked");
                PersistResponse::Failed {
                    revision,
                    error: e.to_string(),
                }
            }
        };
        let _ = self.response_tx.send(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use crate::storage::{MemoryStore, StoreError, StoreResult};
    use std::io;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk full")))
        }

        fn remove(&self, _key: &str) -> StoreResult<()> {
            Ok(())
        }

        fn rename(&self, _from: &str, _to: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    fn snapshot(names: &[&str]) -> Vec<Task> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Task::new(TaskId(i as u64 + 1), *n))
            .collect()
    }

    async fn drain(mut rx: mpsc::UnboundedReceiver<PersistResponse>) -> Vec<PersistResponse> {
        let mut out = Vec::new();
        while let Some(r) = rx.recv().await {
            out.push(r);
        }
        out
    }

    #[tokio::test]
    async fn test_burst_is_coalesced_to_newest() {
        let kv = MemoryStore::new();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        cmd_tx.send(PersistCommand::Save { revision: 1, tasks: snapshot(&["a"]) }).unwrap();
        cmd_tx.send(PersistCommand::Save { revision: 2, tasks: snapshot(&["a", "b"]) }).unwrap();
        cmd_tx.send(PersistCommand::Save { revision: 3, tasks: snapshot(&["b"]) }).unwrap();
        cmd_tx.send(PersistCommand::Shutdown).unwrap();

        PersistenceActor::new(TaskStore::new(kv.clone()), resp_tx, Duration::ZERO)
            .run(cmd_rx)
            .await;

        assert_eq!(drain(resp_rx).await, vec![PersistResponse::Saved { revision: 3 }]);
        assert_eq!(TaskStore::new(kv).load().unwrap(), snapshot(&["b"]));
    }

    #[tokio::test]
    async fn test_sequential_saves_are_written_in_order() {
        let kv = MemoryStore::new();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();

        let actor = PersistenceActor::new(TaskStore::new(kv.clone()), resp_tx, Duration::ZERO);
        let handle = tokio::spawn(actor.run(cmd_rx));

        cmd_tx.send(PersistCommand::Save { revision: 1, tasks: snapshot(&["a"]) }).unwrap();
        assert_eq!(resp_rx.recv().await, Some(PersistResponse::Saved { revision: 1 }));
        cmd_tx.send(PersistCommand::Save { revision: 2, tasks: snapshot(&["a", "b"]) }).unwrap();
        assert_eq!(resp_rx.recv().await, Some(PersistResponse::Saved { revision: 2 }));

        cmd_tx.send(PersistCommand::Shutdown).unwrap();
        handle.await.unwrap();
        assert_eq!(TaskStore::new(kv).load().unwrap(), snapshot(&["a", "b"]));
    }

    #[tokio::test]
    async fn test_debounce_collects_late_snapshot() {
        let kv = MemoryStore::new();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        let actor = PersistenceActor::new(TaskStore::new(kv.clone()), resp_tx, Duration::from_millis(200));
        let handle = tokio::spawn(actor.run(cmd_rx));

        cmd_tx.send(PersistCommand::Save { revision: 1, tasks: snapshot(&["a"]) }).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        cmd_tx.send(PersistCommand::Save { revision: 2, tasks: snapshot(&["z"]) }).unwrap();
        drop(cmd_tx);
        handle.await.unwrap();

        assert_eq!(drain(resp_rx).await, vec![PersistResponse::Saved { revision: 2 }]);
        assert_eq!(TaskStore::new(kv).load().unwrap(), snapshot(&["z"]));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        cmd_tx.send(PersistCommand::Save { revision: 7, tasks: snapshot(&["a"]) }).unwrap();
        cmd_tx.send(PersistCommand::Shutdown).unwrap();

        PersistenceActor::new(TaskStore::new(FailingStore), resp_tx, Duration::ZERO)
            .run(cmd_rx)
            .await;

        let responses = drain(resp_rx).await;
        assert_eq!(responses.len(), 1);
        match &responses[0] {
            PersistResponse::Failed { revision, error } => {
                assert_eq!(*revision, 7);
                assert!(error.contains("disk full"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shutdown_without_pending_writes_nothing() {
        let kv = MemoryStore::new();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        cmd_tx.send(PersistCommand::Shutdown).unwrap();

        PersistenceActor::new(TaskStore::new(kv.clone()), resp_tx, Duration::ZERO)
            .run(cmd_rx)
            .await;

        assert!(drain(resp_rx).await.is_empty());
        assert_eq!(kv.get("todo").unwrap(), None);
    }
}
