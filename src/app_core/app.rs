use crate::{
    Database, SessionController, expand_tilde,
    config::Settings,
    key_handler::{self, Action},
    library, overwrite_line,
    player::RodioEngine,
    session::UiEvent,
    tui,
    ui_state::{Mode, UiState},
};
use anyhow::{Result, anyhow};
use log::{info, warn};
use ratatui::crossterm::event::{Event, KeyEventKind};
use std::time::Instant;

pub struct Resonance {
    _initializer: Instant,
    pub(crate) session: SessionController<RodioEngine, Database>,
    pub(crate) ui: UiState,
}

impl Resonance {
    pub fn new() -> Result<Self> {
        let settings = Settings::load();
        let mut session_settings = settings.session_settings();

        let db = Database::open()?;
        match db.load_session_snapshot() {
            Ok(snapshot) => {
                if let Some(volume) = snapshot.volume {
                    session_settings.volume = volume;
                }
                if let Some(repeat) = snapshot.repeat {
                    session_settings.repeat = repeat;
                }
            }
            Err(e) => warn!("could not restore session state: {e}"),
        }

        let engine = RodioEngine::new()?;

        Ok(Resonance {
            _initializer: Instant::now(),
            session: SessionController::new(engine, db, session_settings),
            ui: UiState::new(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;

        self.refresh_library();

        // MAIN ROUTINE
        loop {
            if let Err(e) = self.session.on_frame(Instant::now()) {
                self.ui.set_error(e.into());
            }
            self.ui.sync_session(&self.session);

            // Check for user input
            match key_handler::next_event()? {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = key_handler::handle_key_event(key, &self.ui) {
                        if let Err(e) = self.handle_action(action) {
                            self.ui.set_error(e);
                        }
                        self.ui.sync_session(&self.session);
                    }
                }
                _ => (),
            }

            terminal.draw(|f| tui::render(f, &mut self.ui))?;

            if self.ui.get_mode() == Mode::QUIT {
                break;
            }
        }

        let _ = overwrite_line("Shutting down... do not close terminal!");
        self.shutdown();
        ratatui::restore();
        let _ = overwrite_line("Thank you for using resonance!\n\n");

        Ok(())
    }

    fn shutdown(&mut self) {
        let volume = self.session.session().volume;
        let repeat = self.session.session().repeat_enabled;

        if let Err(e) = self
            .session
            .store_mut()
            .save_session_snapshot(volume, repeat)
        {
            warn!("could not save session state: {e}");
        }

        self.session.teardown();
        info!(
            "session closed after {:.1}s",
            self._initializer.elapsed().as_secs_f32()
        );
    }

    fn refresh_library(&mut self) {
        match self.session.refresh_tracks() {
            Ok(snapshot) => self.ui.sync_tracks(snapshot),
            Err(e) => self.ui.set_error(e.into()),
        }
    }
}

impl Resonance {
    pub(crate) fn play_selected(&mut self) -> Result<()> {
        let Some(key) = self.ui.selected_key().map(str::to_string) else {
            return Ok(());
        };

        self.session.select_track(&key)?;
        self.refresh_library();
        Ok(())
    }

    pub(crate) fn adjust_volume(&mut self, delta: f32) {
        let volume = self.session.session().volume;
        self.session.set_volume(volume + delta);
        self.session.dispatch_ui_event(UiEvent::InsidePopover);
    }

    pub(crate) fn popover_outside(&mut self) {
        self.session.dispatch_ui_event(UiEvent::OutsidePopover);
    }

    pub(crate) fn import_from_popup(&mut self) -> Result<()> {
        let input = self.ui.popup.input_text();
        if input.is_empty() {
            return Err(anyhow!("Please enter a path to an audio file"));
        }

        let path = expand_tilde(&input)?;
        self.ui.close_popup();

        let track = library::import_track(self.session.store_mut(), &path)?;
        info!("imported {} as {}", path.display(), track.key);

        self.refresh_library();
        Ok(())
    }

    pub(crate) fn delete_selected(&mut self) -> Result<()> {
        let Some(key) = self.ui.selected_key().map(str::to_string) else {
            return Ok(());
        };

        self.session.remove_track(&key)?;
        self.refresh_library();
        Ok(())
    }
}
