use super::detail_screen::{self, DetailLayout};
use super::main_screen::{self, MainLayout};
use crate::core::{Action, AppCore, Screen};
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Position, Terminal};
use std::io;
use std::time::Duration;

/// Layout of the last drawn frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum FrameLayout {
    #[default]
    None,
    Main(MainLayout),
    Detail(DetailLayout),
}

/// TUI Frontend using ratatui
///
/// Renders the application with ratatui and handles events via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    poll_timeout: Duration,
    layout: FrameLayout,
}

impl TuiFrontend {
    /// Initializes terminal in raw mode, enables mouse capture, and enters
    /// alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            poll_timeout: Duration::from_millis(16), // ~60 FPS
            layout: FrameLayout::None,
        })
    }

    /// Set poll timeout (for controlling frame rate)
    pub fn set_poll_timeout(&mut self, timeout: Duration) {
        self.poll_timeout = timeout;
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::mouse(
                mouse_event.kind,
                mouse_event.column,
                mouse_event.row,
            )),
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            _ => None,
        }
    }
}

/// Resolve a click against the last frame's layout.
fn hit_test_layout(layout: &FrameLayout, x: u16, y: u16) -> Action {
    let pos = Position::new(x, y);
    match layout {
        FrameLayout::Main(main) => {
            if main.button.contains(pos) {
                Action::Click
            } else if main.targets.contains(pos) {
                Action::Select((y - main.targets.y) as usize)
            } else if main.tray.contains(pos) {
                Action::OpenNotification
            } else {
                Action::None
            }
        }
        FrameLayout::Detail(detail) => {
            if detail.ok.contains(pos) {
                Action::Dismiss
            } else {
                Action::None
            }
        }
        FrameLayout::None => Action::None,
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Wait up to one frame for the first event, then drain without blocking
        let mut timeout = self.poll_timeout;
        while event::poll(timeout)? {
            if let Some(frontend_event) = Self::convert_event(event::read()?) {
                events.push(frontend_event);
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    fn render(&mut self, core: &mut AppCore) -> Result<()> {
        let mut layout = FrameLayout::None;

        self.terminal.draw(|f| {
            let area = f.area();
            let buf = f.buffer_mut();
            layout = match &core.screen {
                Screen::Main => FrameLayout::Main(main_screen::render(core, area, buf)),
                Screen::Detail(detail) => FrameLayout::Detail(detail_screen::render(
                    &core.config.ui.title,
                    detail,
                    area,
                    buf,
                )),
            };
        })?;

        self.layout = layout;
        Ok(())
    }

    fn hit_test(&self, x: u16, y: u16) -> Action {
        hit_test_layout(&self.layout, x, y)
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}
