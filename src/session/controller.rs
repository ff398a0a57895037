use super::{
    animator::{AmplitudeAnimator, FrameRequest, PulseMode},
    controls::{BoundControls, CoverView, Subscription, TransportIcon, UiEvent, format_time},
    resources::{ResourceHandle, ResourceRegistry},
};
use crate::{
    domain::Track,
    error::{SessionError, StoreError},
    library::{Direction, TrackListModel, TrackListSnapshot, TrackStore},
    player::{AudioSource, EngineConfig, EngineEvent, EngineHandle, PlaybackEngine, Playhead},
};
use log::{debug, error, info, trace, warn};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Delay between a natural finish and the repeat restart.
pub const REPEAT_GUARD: Duration = Duration::from_millis(60);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Finished,
}

/// Everything the controller owns about the current playback.
#[derive(Clone, Debug, Default)]
pub struct PlaybackSession {
    pub active_key: Option<String>,
    pub playback_handle: Option<EngineHandle>,
    pub volume: f32,
    pub repeat_enabled: bool,
    pub current_index: usize,
    pub cover_resource: Option<ResourceHandle>,
    pub audio_resource: Option<ResourceHandle>,
    pub animation: Option<FrameRequest>,
}

/// Session-wide settings applied at construction.
#[derive(Clone, Debug, Default)]
pub struct SessionSettings {
    pub volume: f32,
    pub repeat: bool,
    pub pulse: PulseMode,
    pub engine: EngineConfig,
}

pub struct SessionController<E, S> {
    engine: E,
    store: S,
    tracks: TrackListModel,
    resources: ResourceRegistry,
    animator: AmplitudeAnimator,
    engine_config: EngineConfig,
    session: PlaybackSession,
    state: SessionState,
    controls: Option<BoundControls>,
    pending_restart: Option<(EngineHandle, Instant)>,
    outside_listener: Option<Subscription>,
    next_subscription: u64,
}

fn clamp_volume(volume: f32) -> f32 {
    match volume.is_nan() {
        true => 0.0,
        false => volume.clamp(0.0, 1.0),
    }
}

fn refresh_failed(e: StoreError) -> SessionError {
    error!("track list refresh failed: {e}");
    SessionError::from(e)
}

/// Index of the active key in `snapshot`, or the last known index when the
/// key has disappeared.
fn resolve_index(session: &PlaybackSession, snapshot: &TrackListSnapshot) -> usize {
    session
        .active_key
        .as_deref()
        .and_then(|key| snapshot.index_of(key))
        .unwrap_or(session.current_index)
}

impl<E: PlaybackEngine, S: TrackStore> SessionController<E, S> {
    pub fn new(engine: E, store: S, settings: SessionSettings) -> Self {
        let session = PlaybackSession {
            volume: clamp_volume(settings.volume),
            repeat_enabled: settings.repeat,
            ..Default::default()
        };

        SessionController {
            engine,
            store,
            tracks: TrackListModel::new(),
            resources: ResourceRegistry::new(),
            animator: AmplitudeAnimator::new(settings.pulse),
            engine_config: settings.engine,
            session,
            state: SessionState::Idle,
            controls: None,
            pending_restart: None,
            outside_listener: None,
            next_subscription: 1,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn controls(&self) -> Option<&BoundControls> {
        self.controls.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn outside_listener(&self) -> Option<Subscription> {
        self.outside_listener
    }

    /// Last snapshot read from the store.
    pub fn track_list(&self) -> &TrackListSnapshot {
        self.tracks.snapshot()
    }

    pub fn refresh_tracks(&mut self) -> Result<&TrackListSnapshot, SessionError> {
        self.tracks.refresh(&self.store).map_err(refresh_failed)
    }

    /// Decoded first channel and playhead of the active unit, for the
    /// waveform display.
    pub fn waveform(&self) -> Option<(Arc<[f32]>, Playhead)> {
        let handle = self.session.playback_handle?;
        Some((
            self.engine.decoded_samples(handle)?,
            self.engine.playhead(handle)?,
        ))
    }

    fn fetch_track(&self, key: &str) -> Result<Track, SessionError> {
        self.store
            .get(key)
            .map_err(|e| {
                error!("could not read track {key}: {e}");
                SessionError::from(e)
            })?
            .ok_or_else(|| SessionError::TrackMissing(key.to_string()))
    }

    fn activate(&mut self) {
        if self.outside_listener.is_none() {
            let subscription = Subscription(self.next_subscription);
            self.next_subscription += 1;
            self.outside_listener = Some(subscription);
            debug!("attached popover listener {}", subscription.0);
        }
    }

    fn deactivate(&mut self) {
        if let Some(subscription) = self.outside_listener.take() {
            debug!("removed popover listener {}", subscription.0);
        }
    }

    fn stop_animation(&mut self) {
        let scale = self.animator.stop();
        self.session.animation = None;
        if let Some(controls) = &mut self.controls {
            controls.cover_scale = scale;
        }
    }

    fn start_animation(&mut self) {
        self.session.animation = Some(self.animator.start());
    }

    /// Destroy the engine unit and revoke its audio. Completes before any
    /// replacement is created.
    fn release_playback(&mut self) {
        self.stop_animation();
        self.pending_restart = None;

        if let Some(handle) = self.session.playback_handle.take() {
            if !self.engine.destroy(handle) {
                trace!("handle {} was already destroyed", handle.id());
            }
        }
        if let Some(audio) = self.session.audio_resource.take() {
            self.resources.revoke(audio);
        }
    }

    fn release_cover(&mut self) {
        if let Some(cover) = self.session.cover_resource.take() {
            self.resources.revoke(cover);
        }
        if let Some(controls) = &mut self.controls {
            controls.cover = CoverView::Placeholder;
        }
    }

    fn go_idle(&mut self) {
        self.release_playback();
        self.release_cover();
        self.session.active_key = None;
        self.controls = None;
        self.state = SessionState::Idle;
    }

    fn bind_controls(&mut self, track: &Track) {
        self.release_cover();

        let cover = match &track.metadata.cover {
            Some(art) => match self.resources.create_cover(art) {
                Ok(handle) => {
                    self.session.cover_resource = Some(handle);
                    self.resources
                        .cover(handle)
                        .map(CoverView::Image)
                        .unwrap_or_default()
                }
                Err(e) => {
                    warn!("{e}, showing placeholder for {}", track.key);
                    CoverView::Placeholder
                }
            },
            None => CoverView::Placeholder,
        };

        self.controls = Some(BoundControls::bind(
            track,
            cover,
            self.session.volume,
            self.session.repeat_enabled,
        ));
    }

    /// Bind the now-playing panel to `key` without touching playback.
    /// A key that is no longer stored leaves the panel as it was.
    pub fn render_controls(&mut self, key: &str) -> Result<(), SessionError> {
        match self.fetch_track(key) {
            Ok(track) => {
                self.bind_controls(&track);
                Ok(())
            }
            Err(SessionError::TrackMissing(key)) => {
                debug!("render ignored: {key} is gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Replace whatever is playing with `key`.
    ///
    /// A key missing from the store is a silent no-op. The previous unit and
    /// both resources are released before the new unit is created.
    pub fn select_track(&mut self, key: &str) -> Result<(), SessionError> {
        let Some(index) = self.refresh_tracks()?.index_of(key) else {
            debug!("select ignored: {key} is not in the track list");
            return Ok(());
        };

        let track = match self.fetch_track(key) {
            Ok(track) => track,
            Err(SessionError::TrackMissing(key)) => {
                debug!("select ignored: {key} vanished from the store");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.activate();
        self.release_playback();
        self.bind_controls(&track);

        let audio = self.resources.create_audio(AudioSource {
            bytes: Arc::clone(&track.audio),
            format: track.format,
        });
        self.session.audio_resource = Some(audio);

        let source = self
            .resources
            .audio(audio)
            .ok_or_else(|| SessionError::Engine("audio resource revoked".into()))?;

        let config = EngineConfig {
            looping: false,
            initial_volume: self.session.volume,
            ..self.engine_config.clone()
        };

        let handle = match self.engine.create(source, &config) {
            Ok(handle) => handle,
            Err(e) => {
                self.fail_playback(&e.to_string());
                return Err(e);
            }
        };

        self.session.playback_handle = Some(handle);
        self.session.active_key = Some(track.key.clone());
        self.session.current_index = index;
        self.state = SessionState::Loading;

        info!("loading {} ({})", track.metadata.title, track.key);
        Ok(())
    }

    fn fail_playback(&mut self, cause: &str) {
        error!("playback failed: {cause}");
        self.release_playback();
        self.release_cover();
        self.session.active_key = None;
        self.state = SessionState::Idle;
        if let Some(controls) = &mut self.controls {
            controls.reset_time();
            controls.total = format_time(0.0);
        }
    }

    /// React to one engine event. Events from any handle other than the
    /// active one are dropped.
    pub fn handle_event(
        &mut self,
        handle: EngineHandle,
        event: EngineEvent,
    ) -> Result<(), SessionError> {
        if self.session.playback_handle != Some(handle) {
            trace!("stale {event:?} from handle {}", handle.id());
            return Ok(());
        }

        match event {
            EngineEvent::Ready { duration } => {
                self.engine.set_volume(handle, self.session.volume);

                // A stop during loading leaves the unit parked at the start.
                let autoplay = self.state == SessionState::Loading;
                if autoplay {
                    self.engine.play(handle);
                    self.state = SessionState::Playing;
                    self.start_animation();
                }

                if let Some(controls) = &mut self.controls {
                    controls.total = format_time(duration.as_secs_f64());
                    controls.transport = match autoplay {
                        true => TransportIcon::Pause,
                        false => TransportIcon::Play,
                    };
                }
            }
            EngineEvent::Play => {
                self.state = SessionState::Playing;
                if !self.animator.is_armed() {
                    self.start_animation();
                }
                if let Some(controls) = &mut self.controls {
                    controls.transport = TransportIcon::Pause;
                }
            }
            EngineEvent::Pause => {
                if self.state == SessionState::Playing {
                    self.state = SessionState::Paused;
                }
                if let Some(controls) = &mut self.controls {
                    controls.transport = TransportIcon::Play;
                }
            }
            EngineEvent::TimeUpdate(current) => {
                if let Some(controls) = &mut self.controls {
                    controls.elapsed = format_time(current.as_secs_f64());
                }
            }
            EngineEvent::Finish => return self.on_finish(handle),
            EngineEvent::SeekStart | EngineEvent::SeekEnd => {
                trace!("{event:?} on handle {}", handle.id())
            }
            EngineEvent::Error(cause) => {
                self.fail_playback(&cause);
                return Err(SessionError::Engine(cause));
            }
        }

        Ok(())
    }

    fn on_finish(&mut self, handle: EngineHandle) -> Result<(), SessionError> {
        if self.session.repeat_enabled {
            debug!("repeat: restarting handle {}", handle.id());
            self.pending_restart = Some((handle, Instant::now() + REPEAT_GUARD));
            return Ok(());
        }

        self.advance()
    }

    /// Move past a finished track: the next one in the list, or idle when
    /// the list is empty.
    fn advance(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Finished;
        self.stop_animation();

        let snapshot = self.tracks.refresh(&self.store).map_err(refresh_failed)?;
        let next = snapshot
            .step(resolve_index(&self.session, snapshot), Direction::Next)
            .and_then(|idx| snapshot.get(idx))
            .map(|entry| entry.key.clone());

        match next {
            Some(key) => self.select_track(&key),
            None => {
                info!("track list is empty, going idle");
                self.go_idle();
                Ok(())
            }
        }
    }

    /// Repeat restart once the guard has passed. Repeat switched off in the
    /// meantime advances instead.
    fn restart_if_due(&mut self, now: Instant) -> Result<(), SessionError> {
        let Some((handle, due)) = self.pending_restart else {
            return Ok(());
        };
        if now < due {
            return Ok(());
        }

        self.pending_restart = None;
        if self.session.playback_handle != Some(handle) {
            return Ok(());
        }
        if !self.session.repeat_enabled {
            debug!("repeat turned off before restart, advancing");
            return self.advance();
        }

        self.engine.seek(handle, 0.0);
        self.engine.play(handle);
        self.state = SessionState::Playing;
        self.start_animation();
        Ok(())
    }

    fn animate(&mut self) {
        let handle = self.session.playback_handle;
        let playhead = handle.and_then(|h| self.engine.playhead(h));
        let samples = handle.and_then(|h| self.engine.decoded_samples(h));

        if let Some(scale) = self.animator.frame(playhead, samples.as_deref()) {
            self.session.animation = self.animator.pending();
            if let Some(controls) = &mut self.controls {
                controls.cover_scale = scale;
            }
        }
    }

    /// Per-frame entry point: drain engine events, fire a due repeat
    /// restart, then run the animator. The first error is returned after
    /// every event has been handled.
    pub fn on_frame(&mut self, now: Instant) -> Result<(), SessionError> {
        let mut first_error = None;

        for (handle, event) in self.engine.poll_events() {
            if let Err(e) = self.handle_event(handle, event) {
                first_error.get_or_insert(e);
            }
        }

        if let Err(e) = self.restart_if_due(now) {
            first_error.get_or_insert(e);
        }
        self.animate();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn navigate(&mut self, direction: Direction) -> Result<(), SessionError> {
        if self.state == SessionState::Idle {
            return Ok(());
        }

        let snapshot = self.tracks.refresh(&self.store).map_err(refresh_failed)?;
        let target = snapshot
            .step(resolve_index(&self.session, snapshot), direction)
            .and_then(|idx| snapshot.get(idx))
            .map(|entry| entry.key.clone());

        match target {
            Some(key) => self.select_track(&key),
            None => Ok(()),
        }
    }

    pub fn next(&mut self) -> Result<(), SessionError> {
        self.navigate(Direction::Next)
    }

    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.navigate(Direction::Previous)
    }

    /// Clamped to `0..=1`; NaN is treated as silence.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = clamp_volume(volume);
        self.session.volume = volume;

        if let Some(handle) = self.session.playback_handle {
            self.engine.set_volume(handle, volume);
        }
        if let Some(controls) = &mut self.controls {
            controls.volume = volume;
        }
    }

    pub fn toggle_repeat(&mut self) {
        self.session.repeat_enabled = !self.session.repeat_enabled;
        debug!("repeat {}", self.session.repeat_enabled);

        if let Some(controls) = &mut self.controls {
            controls.repeat = self.session.repeat_enabled;
        }
    }

    pub fn toggle_play_pause(&mut self) {
        match (self.session.playback_handle, self.state) {
            (Some(_), SessionState::Loading) | (None, _) => {}
            (Some(handle), _) => self.engine.toggle_play_pause(handle),
        }
    }

    /// Jump to `fraction` of the track. Ignored for non-interactive
    /// waveforms.
    pub fn seek(&mut self, fraction: f64) {
        if !self.engine_config.interactive {
            debug!("seek ignored: waveform is not interactive");
            return;
        }
        let Some(handle) = self.session.playback_handle else {
            return;
        };

        let fraction = match fraction.is_nan() {
            true => 0.0,
            false => fraction.clamp(0.0, 1.0),
        };
        self.engine.seek(handle, fraction);
    }

    pub fn seek_by(&mut self, delta: f64) {
        let Some(playhead) = self
            .session
            .playback_handle
            .and_then(|h| self.engine.playhead(h))
        else {
            return;
        };
        if playhead.duration.is_zero() {
            return;
        }

        let current = playhead.current.as_secs_f64() / playhead.duration.as_secs_f64();
        self.seek(current + delta);
    }

    /// Pause and rewind. The active key and index are kept. A stop while
    /// loading keeps the track from starting once it is ready.
    pub fn stop(&mut self) {
        if let Some(handle) = self.session.playback_handle {
            self.engine.stop(handle);
        }

        self.stop_animation();
        self.pending_restart = None;
        if let Some(controls) = &mut self.controls {
            controls.reset_time();
        }

        if matches!(
            self.state,
            SessionState::Loading | SessionState::Playing | SessionState::Finished
        ) {
            self.state = SessionState::Paused;
        }
    }

    /// Release everything the session holds. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.go_idle();
        self.deactivate();
    }

    /// Delete `key` from the store. Removing the active track ends playback.
    pub fn remove_track(&mut self, key: &str) -> Result<(), SessionError> {
        self.store.remove(key).map_err(|e| {
            error!("could not remove {key}: {e}");
            SessionError::from(e)
        })?;

        if self.session.active_key.as_deref() == Some(key) {
            info!("active track {key} removed");
            self.go_idle();
        }

        self.refresh_tracks()?;
        Ok(())
    }

    pub fn open_volume_popover(&mut self) {
        if let Some(controls) = &mut self.controls {
            controls.volume_popover = true;
        }
    }

    pub fn close_volume_popover(&mut self) {
        if let Some(controls) = &mut self.controls {
            controls.volume_popover = false;
        }
    }

    pub fn volume_popover_open(&self) -> bool {
        self.controls.as_ref().is_some_and(|c| c.volume_popover)
    }

    /// Route a UI interaction through the popover listener. Returns `true`
    /// when it closed the popover.
    pub fn dispatch_ui_event(&mut self, event: UiEvent) -> bool {
        if self.outside_listener.is_none() || !self.volume_popover_open() {
            return false;
        }

        match event {
            UiEvent::OutsidePopover => {
                self.close_volume_popover();
                true
            }
            UiEvent::InsidePopover => false,
        }
    }
}
