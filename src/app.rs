use crate::config::Config;
use crate::controller::Controller;
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::{self, LogBuffer};
use crate::session::Session;
use crate::store::FileStore;
use crate::surface::MemorySurface;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};

const LOG_CAPACITY: usize = 200;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    session: Session<FileStore>,
    logs: LogBuffer,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub fn start(config: Config) -> Result<()> {
        let logs = logger::init(config.log_level_filter()?, LOG_CAPACITY)?;

        info!("Starting application...");
        let store = FileStore::open(config.store_path())?;
        debug!("Opened store at {}", store.path().display());

        let mut controller = Controller::new(MemorySurface::new(), store, config.storage_key);
        controller.restore()?;
        info!("Restored {} root nodes", controller.forest().len());

        let mut app = App {
            session: Session::new(controller),
            logs,
        };
        app.start_ui()?;

        info!("Exiting application...");
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run(&mut terminal);

        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            terminal.draw(|frame| crate::ui::render(frame, &self.session, &self.logs))?;
            if !terminal_event_handler.handle_next(&mut self.session)? {
                debug!("Received application exit request.");
                break;
            }
        }
        Ok(())
    }
}
