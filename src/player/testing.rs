use super::{AudioSource, EngineConfig, EngineEvent, EngineHandle, PlaybackEngine, Playhead};
use crate::error::SessionError;
use std::{collections::HashMap, sync::Arc, time::Duration};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Create(EngineHandle),
    Destroy(EngineHandle),
    Play(EngineHandle),
    Pause(EngineHandle),
    Toggle(EngineHandle),
    Stop(EngineHandle),
    Seek(EngineHandle, f64),
    Volume(EngineHandle, f32),
    Loop(EngineHandle, bool),
}

#[derive(Clone, Debug, Default)]
pub struct FakeUnit {
    pub playhead: Playhead,
    pub volume: f32,
    pub looping: bool,
    pub config: Option<EngineConfig>,
}

/// In-process engine that records every command and only emits the events
/// a test pushes.
#[derive(Default)]
pub struct ScriptedEngine {
    pub calls: Vec<Call>,
    pub units: HashMap<EngineHandle, FakeUnit>,
    pub queued: Vec<(EngineHandle, EngineEvent)>,
    pub samples: Option<Arc<[f32]>>,
    pub fail_create: bool,
    next_id: u64,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        ScriptedEngine {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn push(&mut self, handle: EngineHandle, event: EngineEvent) {
        self.queued.push((handle, event))
    }

    pub fn live(&self) -> usize {
        self.units.len()
    }

    pub fn set_playhead(&mut self, handle: EngineHandle, playhead: Playhead) {
        if let Some(unit) = self.units.get_mut(&handle) {
            unit.playhead = playhead
        }
    }

    pub fn plays_of(&self, handle: EngineHandle) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == Call::Play(handle))
            .count()
    }

    fn touch(&mut self, handle: EngineHandle, call: Call) -> Option<&mut FakeUnit> {
        self.calls.push(call);
        self.units.get_mut(&handle)
    }
}

impl PlaybackEngine for ScriptedEngine {
    fn create(
        &mut self,
        _source: AudioSource,
        config: &EngineConfig,
    ) -> Result<EngineHandle, SessionError> {
        if self.fail_create {
            return Err(SessionError::Engine("scripted failure".into()));
        }

        let handle = EngineHandle::new(self.next_id.max(1));
        self.next_id = handle.id() + 1;
        self.calls.push(Call::Create(handle));
        self.units.insert(
            handle,
            FakeUnit {
                volume: config.initial_volume,
                looping: config.looping,
                config: Some(config.clone()),
                ..Default::default()
            },
        );
        Ok(handle)
    }

    fn destroy(&mut self, handle: EngineHandle) -> bool {
        self.calls.push(Call::Destroy(handle));
        self.units.remove(&handle).is_some()
    }

    fn play(&mut self, handle: EngineHandle) {
        if let Some(unit) = self.touch(handle, Call::Play(handle)) {
            unit.playhead.playing = true
        }
    }

    fn pause(&mut self, handle: EngineHandle) {
        if let Some(unit) = self.touch(handle, Call::Pause(handle)) {
            unit.playhead.playing = false
        }
    }

    fn toggle_play_pause(&mut self, handle: EngineHandle) {
        if let Some(unit) = self.touch(handle, Call::Toggle(handle)) {
            unit.playhead.playing = !unit.playhead.playing
        }
    }

    fn stop(&mut self, handle: EngineHandle) {
        if let Some(unit) = self.touch(handle, Call::Stop(handle)) {
            unit.playhead.playing = false;
            unit.playhead.current = Duration::ZERO;
        }
    }

    fn seek(&mut self, handle: EngineHandle, fraction: f64) {
        if let Some(unit) = self.touch(handle, Call::Seek(handle, fraction)) {
            unit.playhead.current = unit.playhead.duration.mul_f64(fraction)
        }
    }

    fn set_volume(&mut self, handle: EngineHandle, volume: f32) {
        if let Some(unit) = self.touch(handle, Call::Volume(handle, volume)) {
            unit.volume = volume
        }
    }

    fn set_loop(&mut self, handle: EngineHandle, looping: bool) {
        if let Some(unit) = self.touch(handle, Call::Loop(handle, looping)) {
            unit.looping = looping
        }
    }

    fn playhead(&self, handle: EngineHandle) -> Option<Playhead> {
        self.units.get(&handle).map(|u| u.playhead)
    }

    fn decoded_samples(&self, handle: EngineHandle) -> Option<Arc<[f32]>> {
        self.units.get(&handle)?;
        self.samples.clone()
    }

    fn poll_events(&mut self) -> Vec<(EngineHandle, EngineEvent)> {
        std::mem::take(&mut self.queued)
    }
}
