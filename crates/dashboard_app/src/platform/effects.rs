use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use dashboard_core::{Effect, Msg, RequestId};
use dashboard_engine::{EngineEvent, EngineHandle, TransportError};
use dashboard_logging::{dash_debug, dash_warn};

/// Executes state-machine effects on the engine and feeds its completions
/// back into the message loop.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new<T>(engine: EngineHandle, msg_tx: mpsc::Sender<T>) -> Self
    where
        T: From<Msg> + Send + 'static,
    {
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchItems {
                    request_id,
                    filters,
                } => {
                    dash_debug!("FetchItems request_id={} page={}", request_id, filters.page);
                    self.engine.fetch_items(request_id, filters);
                }
                Effect::CreateItem {
                    request_id,
                    request,
                } => {
                    dash_debug!("CreateItem request_id={}", request_id);
                    self.engine.create_item(request_id, request);
                }
                Effect::FetchItem { request_id, id } => {
                    dash_debug!("FetchItem request_id={} id={}", request_id, id);
                    self.engine.fetch_item(request_id, id);
                }
                Effect::ScheduleSearchDebounce { generation, delay } => {
                    self.engine.schedule_debounce(generation, delay);
                }
                Effect::CancelSearchDebounce => self.engine.cancel_debounce(),
            }
        }
    }

    fn spawn_event_loop<T>(&self, msg_tx: mpsc::Sender<T>)
    where
        T: From<Msg> + Send + 'static,
    {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            if msg_tx.send(T::from(event_to_msg(event))).is_err() {
                break;
            }
        });
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ListCompleted { request_id, result } => Msg::ListFetched {
            request_id,
            result: result.map_err(|err| describe("list", request_id, err)),
        },
        EngineEvent::CreateCompleted { request_id, result } => Msg::ItemCreated {
            request_id,
            result: result.map_err(|err| describe("create", request_id, err)),
        },
        EngineEvent::ItemCompleted { request_id, result } => Msg::ItemFetched {
            request_id,
            result: result.map_err(|err| describe("fetch-by-id", request_id, err)),
        },
        EngineEvent::DebounceElapsed { generation } => Msg::SearchDebounceElapsed { generation },
    }
}

fn describe(operation: &str, request_id: RequestId, err: TransportError) -> String {
    dash_warn!("{} request {} failed: {}", operation, request_id, err);
    err.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use dashboard_core::FilterSpec;
    use dashboard_engine::{FailureKind, ItemStore, LocalItemsApi};
    use pretty_assertions::assert_eq;

    #[test]
    fn transport_errors_become_display_strings() {
        let msg = event_to_msg(EngineEvent::ItemCompleted {
            request_id: 4,
            result: Err(TransportError {
                kind: FailureKind::HttpStatus(404),
                message: "Item not found".into(),
            }),
        });
        assert_eq!(
            msg,
            Msg::ItemFetched {
                request_id: 4,
                result: Err("http status 404 (Item not found)".into()),
            }
        );
        assert_eq!(
            event_to_msg(EngineEvent::DebounceElapsed { generation: 3 }),
            Msg::SearchDebounceElapsed { generation: 3 }
        );
    }

    #[test]
    fn fetch_effect_comes_back_as_list_fetched() {
        let api = LocalItemsApi::new(Arc::new(ItemStore::seeded()));
        let engine = EngineHandle::new(Arc::new(api)).unwrap();
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let runner = EffectRunner::new(engine, msg_tx);

        runner.run(vec![Effect::FetchItems {
            request_id: 11,
            filters: FilterSpec::with_limit(3),
        }]);

        match msg_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Msg::ListFetched { request_id, result }) => {
                assert_eq!(request_id, 11);
                assert_eq!(result.unwrap().items.len(), 3);
            }
            other => panic!("expected ListFetched, got {other:?}"),
        }
    }
}
