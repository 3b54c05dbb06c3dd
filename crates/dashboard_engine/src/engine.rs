use std::io;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use dashboard_core::{CreateItemRequest, FilterSpec, ItemId, RequestId};
use dashboard_logging::{dash_debug, dash_warn};
use tokio::runtime::Handle;

use crate::client::ItemsApi;
use crate::debounce::Debouncer;
use crate::types::EngineEvent;

enum EngineCommand {
    FetchItems {
        request_id: RequestId,
        filters: FilterSpec,
    },
    CreateItem {
        request_id: RequestId,
        request: CreateItemRequest,
    },
    FetchItem {
        request_id: RequestId,
        id: ItemId,
    },
    ScheduleDebounce {
        generation: u64,
        delay: Duration,
    },
    CancelDebounce,
}

/// Owns a background thread with its own tokio runtime.
///
/// Commands are fire-and-forget; every request eventually produces exactly
/// one completion event on the event channel. Clones share both channels.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn ItemsApi>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("dashboard-io")
            .build()?;

        thread::Builder::new()
            .name("dashboard-engine".into())
            .spawn(move || {
                let mut debouncer = Debouncer::new();
                while let Ok(command) = cmd_rx.recv() {
                    dispatch(
                        runtime.handle(),
                        &api,
                        &mut debouncer,
                        command,
                        event_tx.clone(),
                    );
                }
                dash_debug!("engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn fetch_items(&self, request_id: RequestId, filters: FilterSpec) {
        self.send(EngineCommand::FetchItems {
            request_id,
            filters,
        });
    }

    pub fn create_item(&self, request_id: RequestId, request: CreateItemRequest) {
        self.send(EngineCommand::CreateItem {
            request_id,
            request,
        });
    }

    pub fn fetch_item(&self, request_id: RequestId, id: impl Into<ItemId>) {
        self.send(EngineCommand::FetchItem {
            request_id,
            id: id.into(),
        });
    }

    /// Replaces any pending debounce timer with one for `generation`.
    pub fn schedule_debounce(&self, generation: u64, delay: Duration) {
        self.send(EngineCommand::ScheduleDebounce { generation, delay });
    }

    pub fn cancel_debounce(&self) {
        self.send(EngineCommand::CancelDebounce);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.events().try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.events().recv_timeout(timeout).ok()
    }

    fn events(&self) -> MutexGuard<'_, mpsc::Receiver<EngineEvent>> {
        self.event_rx.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            dash_warn!("engine thread is gone; command dropped");
        }
    }
}

fn dispatch(
    runtime: &Handle,
    api: &Arc<dyn ItemsApi>,
    debouncer: &mut Debouncer,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::FetchItems {
            request_id,
            filters,
        } => {
            let api = Arc::clone(api);
            runtime.spawn(async move {
                let result = api.list(&filters).await;
                let _ = event_tx.send(EngineEvent::ListCompleted { request_id, result });
            });
        }
        EngineCommand::CreateItem {
            request_id,
            request,
        } => {
            let api = Arc::clone(api);
            runtime.spawn(async move {
                let result = api.create(&request).await;
                let _ = event_tx.send(EngineEvent::CreateCompleted { request_id, result });
            });
        }
        EngineCommand::FetchItem { request_id, id } => {
            let api = Arc::clone(api);
            runtime.spawn(async move {
                let result = api.get(&id).await;
                let _ = event_tx.send(EngineEvent::ItemCompleted { request_id, result });
            });
        }
        EngineCommand::ScheduleDebounce { generation, delay } => {
            if debouncer.is_pending() {
                dash_debug!("search timer superseded by generation {generation}");
            }
            debouncer.schedule(runtime, delay, move || {
                let _ = event_tx.send(EngineEvent::DebounceElapsed { generation });
            });
        }
        EngineCommand::CancelDebounce => debouncer.cancel(),
    }
}
