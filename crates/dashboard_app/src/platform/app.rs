use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use dashboard_core::{update, AppState, Msg};
use dashboard_engine::{
    serve, EngineHandle, HttpItemsClient, ItemStore, ItemsApi, LocalItemsApi,
};
use dashboard_logging::{dash_info, dash_warn};
use tokio::net::TcpListener;

use super::commands::{self, Command, HELP};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::render::render;

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// Where the browser gets its items from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiSource {
    Remote(String),
    Local,
}

/// Runs the HTTP item service until Ctrl-C.
pub fn run_serve(config: &AppConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;

    runtime.block_on(async {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .with_context(|| format!("binding {}", config.bind_addr))?;
        let store = Arc::new(ItemStore::seeded());
        tokio::select! {
            result = serve(listener, store) => result.context("item service stopped"),
            _ = tokio::signal::ctrl_c() => {
                dash_info!("shutting down item service");
                Ok(())
            }
        }
    })
}

enum Input {
    Msg(Msg),
    Line(String),
    Closed,
}

impl From<Msg> for Input {
    fn from(msg: Msg) -> Self {
        Input::Msg(msg)
    }
}

/// Interactive terminal browser: one command per line, redraws on change.
pub fn run_browse(config: &AppConfig, source: ApiSource) -> anyhow::Result<()> {
    let api: Arc<dyn ItemsApi> = match source {
        ApiSource::Remote(url) => Arc::new(
            HttpItemsClient::new(&url, &config.fetch_settings())
                .with_context(|| format!("api url {url:?}"))?,
        ),
        ApiSource::Local => Arc::new(LocalItemsApi::new(Arc::new(ItemStore::seeded()))),
    };
    let engine = EngineHandle::new(api).context("starting engine")?;

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let runner = EffectRunner::new(engine, input_tx.clone());
    spawn_stdin_reader(input_tx.clone());

    // Background tick to coalesce redraws.
    thread::spawn(move || {
        while input_tx.send(Input::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    let mut out = io::stdout().lock();
    writeln!(out, "{HELP}")?;

    let (mut state, effects) = update(AppState::with_settings(config.store_settings()), Msg::FetchRequested);
    runner.run(effects);

    while let Ok(input) = input_rx.recv() {
        let msg = match input {
            Input::Msg(Msg::Tick) => {
                if state.consume_dirty() {
                    redraw(&mut out, &state)?;
                }
                continue;
            }
            Input::Msg(msg) => msg,
            Input::Line(line) => match commands::parse(&line, state.page()) {
                Ok(Command::Dispatch(msg)) => msg,
                Ok(Command::Nothing) => continue,
                Ok(Command::Help) => {
                    writeln!(out, "{HELP}")?;
                    continue;
                }
                Ok(Command::Quit) => break,
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            },
            Input::Closed => break,
        };

        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);
    }

    dash_info!("browser closed");
    Ok(())
}

fn redraw(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    writeln!(out)?;
    for line in render(&state.view()) {
        writeln!(out, "{line}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if input_tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    dash_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = input_tx.send(Input::Closed);
    });
}
