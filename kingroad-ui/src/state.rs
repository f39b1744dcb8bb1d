//! Shared application state for the UI server.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use kingroad::core::types::NotificationKind;
use kingroad::io::config::KingroadConfig;
use kingroad::io::notify::{LogNotifier, Notifier};
use kingroad::io::storage::FileStore;
use kingroad::render::Renderer;
use kingroad::store::RouteStore;
use tokio::sync::broadcast;

/// Events broadcast to SSE clients after store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Active route started, canceled or replaced.
    NavigationChanged,
    /// History log appended, updated or cleared.
    HistoryChanged,
    /// Toast emitted by the store.
    Notification {
        message: String,
        kind: NotificationKind,
    },
}

/// Forwards store toasts to SSE clients, keeping the log fallback.
#[derive(Clone)]
pub struct BroadcastNotifier {
    event_tx: Arc<broadcast::Sender<ChangeEvent>>,
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        LogNotifier.notify(message, kind);
        // No subscribers is fine; the toast is still in the log.
        let _ = self.event_tx.send(ChangeEvent::Notification {
            message: message.to_string(),
            kind,
        });
    }
}

pub type SharedStore = RouteStore<FileStore, BroadcastNotifier>;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one store, behind the one mutex guarding its state.
    pub store: Arc<Mutex<SharedStore>>,
    pub renderer: Arc<Renderer>,
    pub config: Arc<KingroadConfig>,
    /// Broadcast sender for change events.
    pub event_tx: Arc<broadcast::Sender<ChangeEvent>>,
}

impl AppState {
    /// Open the store persisted under `data_dir`.
    pub fn new(data_dir: PathBuf, config: KingroadConfig) -> anyhow::Result<Self> {
        let (event_tx, _) = broadcast::channel(64);
        let event_tx = Arc::new(event_tx);
        let notifier = BroadcastNotifier {
            event_tx: event_tx.clone(),
        };
        let store = RouteStore::open(
            FileStore::new(data_dir),
            notifier,
            config.store_options(),
        )
        .with_estimator(config.estimator());
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            renderer: Arc::new(Renderer::new()?),
            config: Arc::new(config),
            event_tx,
        })
    }

    /// Lock the store, recovering the guard from a poisoned lock.
    pub fn lock_store(&self) -> MutexGuard<'_, SharedStore> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn broadcast(&self, event: ChangeEvent) {
        let _ = self.event_tx.send(event);
    }
}
