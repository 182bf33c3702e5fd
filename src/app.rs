use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use glidenav_config::Config;
use glidenav_core::{Clock, MonotonicClock};
use glidenav_engine::{Engine, KeyOutcome};
use glidenav_keyboard::KeyInput;

use crate::event::{Event, EventHandler};
use crate::reader::{PageKind, Reader};
use crate::ui::{self, StatusBarParams};

/// Reader application: owns the page, the engine and the event loop.
pub struct App {
    reader: Reader,
    /// `None` when the site has no profile
    engine: Option<Engine>,
    site: String,
    clock: MonotonicClock,
    events: EventHandler,
    /// Text of the open "go to line" prompt
    prompt: Option<String>,
    frame_interval: Duration,
    idle_tick: Duration,
    last_frame_at: Option<Duration>,
    should_quit: bool,
    needs_redraw: bool,
}

impl App {
    pub fn new(config: &Config, reader: Reader, site: &str, reports_releases: bool) -> Self {
        let settings = &config.reader;
        Self {
            reader,
            engine: Engine::init(config, site).ok(),
            site: site.to_string(),
            clock: MonotonicClock::new(),
            events: EventHandler::new(
                reports_releases,
                Duration::from_millis(settings.key_release_timeout_ms),
            ),
            prompt: None,
            frame_interval: Duration::from_millis(settings.frame_interval_ms),
            idle_tick: Duration::from_millis(settings.idle_tick_ms),
            last_frame_at: None,
            should_quit: false,
            needs_redraw: true,
        }
    }

    /// Run the event loop until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            let now = self.clock.now();
            self.pump_frame(now);

            // Render only when needed
            if self.needs_redraw {
                let warning = glidenav_logger::last_warning().map(|entry| entry.message);
                let params = StatusBarParams {
                    site: &self.site,
                    engine_active: self.engine.is_some(),
                    speed: self
                        .engine
                        .as_ref()
                        .map(|engine| engine.velocity().net())
                        .unwrap_or(0.0),
                    prompt: self.prompt.as_deref(),
                    warning: warning.as_deref(),
                };
                terminal.draw(|frame| ui::render(frame, &mut self.reader, &params))?;
                self.needs_redraw = false;
            }

            match self.events.next(self.poll_timeout())? {
                Event::KeyDown(key) => {
                    self.handle_key_down(key);
                    self.needs_redraw = true;
                }
                Event::KeyUp(key) => self.handle_key_up(key),
                Event::Resize => self.needs_redraw = true,
                Event::Tick => {}
            }
        }

        Ok(())
    }

    /// Deliver the pending frame once the frame interval has elapsed.
    fn pump_frame(&mut self, now: Duration) {
        if !self.reader.has_pending_frame() {
            return;
        }
        if let Some(last) = self.last_frame_at {
            if now.saturating_sub(last) < self.frame_interval {
                return;
            }
        }

        let Some(handle) = self.reader.take_due_frame() else {
            return;
        };
        self.last_frame_at = Some(now);
        if let Some(engine) = &mut self.engine {
            engine.on_animation_frame(handle, now, &mut self.reader);
            self.needs_redraw = true;
        }
    }

    fn poll_timeout(&self) -> Duration {
        if !self.reader.has_pending_frame() {
            return self.idle_tick;
        }
        match self.last_frame_at {
            Some(last) => self
                .frame_interval
                .saturating_sub(self.clock.now().saturating_sub(last)),
            None => Duration::ZERO,
        }
    }

    fn handle_key_down(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let outcome = match (&mut self.engine, KeyInput::from_event(&key, self.prompt.is_some())) {
            (Some(engine), Some(input)) => engine.on_key_down(&input, &mut self.reader),
            _ => KeyOutcome::Ignored,
        };
        if outcome.prevents_default() {
            return;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(key);
        } else {
            self.default_key_action(key);
        }
    }

    fn handle_key_up(&mut self, key: KeyEvent) {
        if let (Some(engine), Some(input)) = (
            &mut self.engine,
            KeyInput::from_event(&key, self.prompt.is_some()),
        ) {
            engine.on_key_up(&input);
        }
    }

    /// Built-in behaviour for keys the engine did not claim.
    fn default_key_action(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(':') => self.prompt = Some(String::new()),
            KeyCode::Enter if self.reader.page() == PageKind::Index => {
                if let Err(err) = self.reader.open_top_entry() {
                    glidenav_logger::error(format!("{:#}", err));
                }
            }
            KeyCode::Up => self.reader.scroll_rows(-1),
            KeyCode::Down => self.reader.scroll_rows(1),
            KeyCode::PageUp => self.reader.scroll_rows(-self.reader.page_rows()),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.reader.scroll_rows(self.reader.page_rows())
            }
            KeyCode::Home => self.reader.scroll_to_line(1),
            KeyCode::End => self.reader.scroll_to_line(usize::MAX),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(input) = &mut self.prompt else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) if ch.is_ascii_digit() => input.push(ch),
            KeyCode::Enter => {
                match input.parse::<usize>() {
                    Ok(line) if line > 0 => self.reader.scroll_to_line(line),
                    _ => glidenav_logger::warn(format!("Invalid line number: \"{}\"", input)),
                }
                self.prompt = None;
            }
            _ => {}
        }
    }
}
