mod config;
mod dispatch;
mod error;
mod filter;
mod input;
mod inventory;
mod navigator;
mod view;

use std::{
    env, fs,
    io::{self, stdout},
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dirs::cache_dir;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::{
    runtime::Runtime,
    sync::mpsc::{UnboundedReceiver, error::TryRecvError},
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{
    config::{Config, load_config},
    dispatch::Dispatcher,
    input::map_key,
    inventory::{AwsCli, Inventory},
    navigator::{Message, Navigator, Outcome},
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> Result<ExitCode> {
    let _log_guard = init_logging();
    info!("starting ssmpick");
    let config = load_config();
    let inventory: Arc<dyn Inventory> = Arc::new(AwsCli::new(&config));
    let runtime = Runtime::new().context("start async runtime")?;

    let mut terminal = init_terminal().context("failed to init terminal")?;
    let app_result = run_app(&mut terminal, &runtime, Arc::clone(&inventory), &config);
    cleanup_terminal(&mut terminal).context("failed to restore terminal")?;
    runtime.shutdown_background();

    Ok(finish(app_result?, inventory.as_ref()))
}

/// Logs go to a file since the terminal belongs to the UI. Returns `None`
/// (logging disabled) when the file cannot be opened.
fn init_logging() -> Option<WorkerGuard> {
    let dir = cache_dir().unwrap_or_else(env::temp_dir).join("ssmpick");
    fs::create_dir_all(&dir).ok()?;
    let file = fs::File::create(dir.join("ssmpick.log")).ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .try_init()
        .ok()?;
    Some(guard)
}

fn init_terminal() -> Result<Term> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("switch to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("spawn terminal backend")
}

fn cleanup_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")
}

fn run_app(
    terminal: &mut Term,
    runtime: &Runtime,
    inventory: Arc<dyn Inventory>,
    config: &Config,
) -> Result<Outcome> {
    let (dispatcher, mut message_rx) =
        Dispatcher::new(runtime, Arc::clone(&inventory), config.deadlines);
    let mut navigator = Navigator::new(inventory.list_profiles());
    let poll_rate = Duration::from_millis(30);

    loop {
        drain_messages(&mut navigator, &dispatcher, &mut message_rx);
        terminal
            .draw(|frame| view::render(frame, &navigator, config.window_size))
            .context("draw frame")?;
        if let Some(outcome) = navigator.outcome() {
            return Ok(outcome);
        }
        poll_and_handle_events(&mut navigator, &dispatcher, poll_rate)?;
    }
}

fn apply(navigator: &mut Navigator, dispatcher: &Dispatcher, message: Message) {
    for command in navigator.update(message) {
        dispatcher.dispatch(command);
    }
}

fn drain_messages(
    navigator: &mut Navigator,
    dispatcher: &Dispatcher,
    rx: &mut UnboundedReceiver<Message>,
) {
    loop {
        match rx.try_recv() {
            Ok(message) => apply(navigator, dispatcher, message),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                warn!("dispatcher channel closed");
                break;
            }
        }
    }
}

fn poll_and_handle_events(
    navigator: &mut Navigator,
    dispatcher: &Dispatcher,
    poll_rate: Duration,
) -> Result<()> {
    if event::poll(poll_rate).context("poll for events")? {
        if let Event::Key(key) = event::read().context("read event")? {
            if let Some(key) = map_key(key) {
                apply(navigator, dispatcher, Message::Key(key));
            }
        }
    }
    Ok(())
}

fn finish(outcome: Outcome, inventory: &dyn Inventory) -> ExitCode {
    match outcome {
        Outcome::Confirmed {
            profile,
            region,
            instance,
        } => {
            println!("Selected: Profile={profile}, Region={region}, Instance={instance}");
            match inventory.launch_session(&profile, &region, &instance) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    warn!("session failed: {err:#}");
                    eprintln!("Error starting SSM session: {err:#}");
                    ExitCode::FAILURE
                }
            }
        }
        Outcome::Aborted => ExitCode::FAILURE,
        Outcome::Failed(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
