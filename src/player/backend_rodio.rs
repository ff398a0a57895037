use super::{AudioSource, EngineConfig, EngineEvent, EngineHandle, PlaybackEngine, Playhead};
use crate::error::SessionError;
use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace, warn};
use rodio::{
    ChannelCount, Decoder, OutputStream, OutputStreamBuilder, SampleRate, Sink, Source,
    source::SeekError,
};
use std::{collections::HashMap, io::Cursor, sync::Arc, thread, time::Duration};

type LoadResult = (EngineHandle, Result<DecodedAudio, String>);
type Units = HashMap<EngineHandle, Unit>;

/// Engine backed by one rodio [`Sink`] per unit.
///
/// Audio is decoded fully on a worker thread so the first channel can be
/// sampled by the animator. Finished loads come back over a channel and are
/// turned into `Ready` on the next [`poll_events`](PlaybackEngine::poll_events).
pub struct RodioEngine {
    stream: OutputStream,
    units: Units,
    next_id: u64,
    loaded_tx: Sender<LoadResult>,
    loaded_rx: Receiver<LoadResult>,
    events: Vec<(EngineHandle, EngineEvent)>,
}

struct DecodedAudio {
    channels: ChannelCount,
    sample_rate: SampleRate,
    samples: Arc<[f32]>,
    first_channel: Arc<[f32]>,
    duration: Duration,
}

impl DecodedAudio {
    fn source(&self) -> SharedSamples {
        SharedSamples {
            channels: self.channels,
            sample_rate: self.sample_rate,
            samples: Arc::clone(&self.samples),
            pos: 0,
        }
    }
}

/// Interleaved samples played straight out of the decoded buffer. Rearming a
/// unit only clones the `Arc`.
struct SharedSamples {
    channels: ChannelCount,
    sample_rate: SampleRate,
    samples: Arc<[f32]>,
    pos: usize,
}

impl Iterator for SharedSamples {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.samples.get(self.pos).copied()?;
        self.pos += 1;
        Some(sample)
    }
}

impl Source for SharedSamples {
    fn current_span_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.pos)
    }

    fn channels(&self) -> ChannelCount {
        self.channels
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() / usize::from(self.channels).max(1);
        Some(Duration::from_secs_f64(
            frames as f64 / f64::from(self.sample_rate.max(1)),
        ))
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        let step = usize::from(self.channels).max(1);
        let frame = (pos.as_secs_f64() * f64::from(self.sample_rate)) as usize;
        self.pos = (frame * step).min(self.samples.len());
        Ok(())
    }
}

struct Unit {
    volume: f32,
    looping: bool,
    audio: Option<DecodedAudio>,
    sink: Option<Sink>,
    finished: bool,
    seeking: bool,
    last_second: Option<u64>,
}

impl RodioEngine {
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let (loaded_tx, loaded_rx) = crossbeam_channel::unbounded();

        Ok(Self {
            stream,
            units: HashMap::new(),
            next_id: 1,
            loaded_tx,
            loaded_rx,
            events: Vec::new(),
        })
    }

    fn emit(&mut self, handle: EngineHandle, event: EngineEvent) {
        self.events.push((handle, event))
    }

    fn unit_mut(&mut self, handle: EngineHandle, op: &str) -> Option<&mut Unit> {
        let unit = self.units.get_mut(&handle);
        if unit.is_none() {
            warn!("{op} ignored: engine handle {} is gone", handle.id());
        }
        unit
    }

    fn receive_loads(&mut self) {
        while let Ok((handle, result)) = self.loaded_rx.try_recv() {
            let mixer = self.stream.mixer();
            if let Some(event) = accept_load(&mut self.units, handle, result, || {
                Sink::connect_new(mixer)
            }) {
                self.events.push((handle, event));
            }
        }
    }
}

/// Attach a finished decode to its unit. Loads for handles that were
/// destroyed meanwhile are dropped without connecting a sink.
fn accept_load(
    units: &mut Units,
    handle: EngineHandle,
    result: Result<DecodedAudio, String>,
    connect: impl FnOnce() -> Sink,
) -> Option<EngineEvent> {
    let Some(unit) = units.get_mut(&handle) else {
        trace!("discarding late load for handle {}", handle.id());
        return None;
    };

    match result {
        Ok(audio) => {
            let sink = connect();
            sink.pause();
            sink.set_volume(unit.volume);
            sink.append(audio.source());

            let duration = audio.duration;
            unit.sink = Some(sink);
            unit.audio = Some(audio);

            debug!("handle {} ready ({:.1}s)", handle.id(), duration.as_secs_f32());
            Some(EngineEvent::Ready { duration })
        }
        Err(e) => Some(EngineEvent::Error(e)),
    }
}

/// `Finish` for units that ran dry, `TimeUpdate` once per elapsed second
/// for the rest. Looping units are refilled instead of finishing.
fn progress_events(units: &mut Units) -> Vec<(EngineHandle, EngineEvent)> {
    let mut events = Vec::new();

    for (&handle, unit) in units.iter_mut() {
        let (Some(sink), Some(audio)) = (&unit.sink, &unit.audio) else {
            continue;
        };

        if sink.is_paused() || unit.finished {
            continue;
        }

        if sink.empty() {
            match unit.looping {
                true => {
                    sink.append(audio.source());
                    sink.play();
                    unit.last_second = None;
                }
                false => {
                    unit.finished = true;
                    events.push((handle, EngineEvent::Finish));
                }
            }
            continue;
        }

        let pos = sink.get_pos();
        let secs = pos.as_secs();
        if unit.last_second != Some(secs) {
            unit.last_second = Some(secs);
            events.push((handle, EngineEvent::TimeUpdate(pos)));
        }
    }

    events
}

impl Unit {
    fn new(volume: f32, looping: bool) -> Self {
        Unit {
            volume: volume.clamp(0.0, 1.0),
            looping,
            audio: None,
            sink: None,
            finished: false,
            seeking: false,
            last_second: None,
        }
    }

    /// The sink drains its source at the end of a track; refill it before
    /// the unit can play or seek again.
    fn rearm(&mut self) {
        if let (Some(sink), Some(audio)) = (&self.sink, &self.audio) {
            if sink.empty() {
                sink.append(audio.source());
            }
        }
        self.finished = false;
    }
}

impl PlaybackEngine for RodioEngine {
    fn create(
        &mut self,
        source: AudioSource,
        config: &EngineConfig,
    ) -> Result<EngineHandle, SessionError> {
        let handle = EngineHandle::new(self.next_id);
        self.next_id += 1;

        let tx = self.loaded_tx.clone();
        thread::Builder::new()
            .name(format!("decode-{}", handle.id()))
            .spawn(move || {
                let result = decode(source).map_err(|e| e.to_string());
                let _ = tx.send((handle, result));
            })
            .map_err(|e| SessionError::Engine(e.to_string()))?;

        self.units
            .insert(handle, Unit::new(config.initial_volume, config.looping));

        Ok(handle)
    }

    fn destroy(&mut self, handle: EngineHandle) -> bool {
        match self.units.remove(&handle) {
            Some(unit) => {
                if let Some(sink) = unit.sink {
                    sink.stop();
                }
                debug!("destroyed handle {}", handle.id());
                true
            }
            None => false,
        }
    }

    fn play(&mut self, handle: EngineHandle) {
        let Some(unit) = self.unit_mut(handle, "play") else {
            return;
        };
        if unit.sink.is_none() {
            warn!("play ignored: handle {} is still loading", handle.id());
            return;
        }

        unit.rearm();
        if let Some(sink) = &unit.sink {
            sink.play();
        }
        self.emit(handle, EngineEvent::Play);
    }

    fn pause(&mut self, handle: EngineHandle) {
        let Some(sink) = self.unit_mut(handle, "pause").and_then(|u| u.sink.as_ref()) else {
            return;
        };
        sink.pause();
        self.emit(handle, EngineEvent::Pause);
    }

    fn toggle_play_pause(&mut self, handle: EngineHandle) {
        let Some(unit) = self.unit_mut(handle, "toggle") else {
            return;
        };
        let paused = match &unit.sink {
            Some(sink) => sink.is_paused() || unit.finished,
            None => return,
        };

        match paused {
            true => self.play(handle),
            false => self.pause(handle),
        }
    }

    fn stop(&mut self, handle: EngineHandle) {
        let Some(unit) = self.unit_mut(handle, "stop") else {
            return;
        };
        unit.rearm();
        unit.last_second = None;

        let Some(sink) = &unit.sink else {
            return;
        };
        sink.pause();
        if let Err(e) = sink.try_seek(Duration::ZERO) {
            warn!("rewind failed on handle {}: {e}", handle.id());
        }
        self.emit(handle, EngineEvent::Pause);
    }

    fn seek(&mut self, handle: EngineHandle, fraction: f64) {
        let Some(unit) = self.unit_mut(handle, "seek") else {
            return;
        };
        let Some(duration) = unit.audio.as_ref().map(|a| a.duration) else {
            return;
        };

        let target = duration.mul_f64(fraction.clamp(0.0, 1.0));
        unit.seeking = true;
        unit.rearm();

        let result = unit.sink.as_ref().map(|sink| sink.try_seek(target));
        unit.seeking = false;
        unit.last_second = None;

        if let Some(Err(e)) = result {
            warn!("seek failed on handle {}: {e}", handle.id());
        }

        self.emit(handle, EngineEvent::SeekStart);
        self.emit(handle, EngineEvent::SeekEnd);
    }

    fn set_volume(&mut self, handle: EngineHandle, volume: f32) {
        let Some(unit) = self.unit_mut(handle, "set_volume") else {
            return;
        };
        unit.volume = volume;
        if let Some(sink) = &unit.sink {
            sink.set_volume(volume);
        }
    }

    fn set_loop(&mut self, handle: EngineHandle, looping: bool) {
        if let Some(unit) = self.unit_mut(handle, "set_loop") {
            unit.looping = looping
        }
    }

    fn playhead(&self, handle: EngineHandle) -> Option<Playhead> {
        let unit = self.units.get(&handle)?;
        let (sink, audio) = (unit.sink.as_ref()?, unit.audio.as_ref()?);

        Some(Playhead {
            current: sink.get_pos().min(audio.duration),
            duration: audio.duration,
            playing: !sink.is_paused() && !unit.finished && !sink.empty(),
            seeking: unit.seeking,
        })
    }

    fn decoded_samples(&self, handle: EngineHandle) -> Option<Arc<[f32]>> {
        let audio = self.units.get(&handle)?.audio.as_ref()?;
        Some(Arc::clone(&audio.first_channel))
    }

    fn poll_events(&mut self) -> Vec<(EngineHandle, EngineEvent)> {
        self.receive_loads();
        let progress = progress_events(&mut self.units);
        self.events.extend(progress);
        std::mem::take(&mut self.events)
    }
}

fn decode(source: AudioSource) -> Result<DecodedAudio> {
    let len = source.bytes.len() as u64;

    let mut builder = Decoder::builder()
        .with_data(Cursor::new(source.bytes))
        .with_byte_len(len)
        .with_seekable(true);

    if let Some(hint) = source.format.decoder_hint() {
        builder = builder.with_hint(hint);
    }

    let decoder = builder.build()?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.collect();

    let step = usize::from(channels).max(1);
    let rate = sample_rate.max(1);
    let frames = samples.len() / step;

    let first_channel: Arc<[f32]> = samples.iter().step_by(step).copied().collect();

    Ok(DecodedAudio {
        channels,
        sample_rate,
        samples: Arc::from(samples),
        first_channel,
        duration: Duration::from_secs_f64(frames as f64 / rate as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileType;

    const RATE: u32 = 8000;

    /// 16-bit PCM stereo with a constant value per channel.
    fn wav(frames: u32, left: i16, right: i16) -> Vec<u8> {
        let channels = 2u16;
        let bits = 16u16;
        let block = channels * bits / 8;
        let data_len = frames * u32::from(block);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&RATE.to_le_bytes());
        bytes.extend_from_slice(&(RATE * u32::from(block)).to_le_bytes());
        bytes.extend_from_slice(&block.to_le_bytes());
        bytes.extend_from_slice(&bits.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for _ in 0..frames {
            bytes.extend_from_slice(&left.to_le_bytes());
            bytes.extend_from_slice(&right.to_le_bytes());
        }
        bytes
    }

    fn decoded(frames: usize) -> DecodedAudio {
        DecodedAudio {
            channels: 2,
            sample_rate: RATE,
            samples: Arc::from(vec![0.25f32; frames * 2]),
            first_channel: Arc::from(vec![0.25f32; frames]),
            duration: Duration::from_secs_f64(frames as f64 / f64::from(RATE)),
        }
    }

    /// A unit whose sink has nothing queued, as at the natural end of a track.
    fn drained_unit(looping: bool) -> Unit {
        let (sink, _queue) = Sink::new();
        sink.play();

        let mut unit = Unit::new(1.0, looping);
        unit.audio = Some(decoded(16));
        unit.sink = Some(sink);
        unit
    }

    fn h(id: u64) -> EngineHandle {
        EngineHandle::new(id)
    }

    #[test]
    fn decode_keeps_first_channel_and_duration() {
        let source = AudioSource {
            bytes: Arc::from(wav(800, 16384, -16384)),
            format: FileType::WAV,
        };

        let audio = decode(source).unwrap();

        assert_eq!(audio.channels, 2);
        assert_eq!(audio.sample_rate, RATE);
        assert_eq!(audio.samples.len(), 1600);
        assert_eq!(audio.first_channel.len(), 800);
        assert!(audio.first_channel.iter().all(|s| (s - 0.5).abs() < 1e-3));
        assert!((audio.duration.as_secs_f64() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn decode_rejects_noise() {
        let source = AudioSource {
            bytes: Arc::from(vec![7u8; 64]),
            format: FileType::UNKNOWN,
        };
        assert!(decode(source).is_err());
    }

    #[test]
    fn load_for_destroyed_handle_is_dropped() {
        let mut units = Units::new();
        let event = accept_load(&mut units, h(3), Ok(decoded(8)), || {
            unreachable!("no sink for a destroyed handle")
        });

        assert!(event.is_none());
        assert!(units.is_empty());
    }

    #[test]
    fn load_is_ready_once_and_waits_paused() {
        let mut units = Units::new();
        units.insert(h(1), Unit::new(0.5, false));

        let event = accept_load(&mut units, h(1), Ok(decoded(800)), || Sink::new().0);
        assert_eq!(
            event,
            Some(EngineEvent::Ready {
                duration: Duration::from_secs_f64(0.1)
            })
        );

        let sink = units[&h(1)].sink.as_ref().unwrap();
        assert!(sink.is_paused());
        assert_eq!(sink.volume(), 0.5);

        assert!(progress_events(&mut units).is_empty());
    }

    #[test]
    fn failed_load_reports_error() {
        let mut units = Units::new();
        units.insert(h(1), Unit::new(1.0, false));

        let event = accept_load(&mut units, h(1), Err("bad header".into()), || Sink::new().0);
        assert_eq!(event, Some(EngineEvent::Error("bad header".into())));
        assert!(units[&h(1)].sink.is_none());
    }

    #[test]
    fn finish_fires_once_per_natural_end() {
        let mut units = Units::new();
        units.insert(h(1), drained_unit(false));

        assert_eq!(progress_events(&mut units), vec![(h(1), EngineEvent::Finish)]);
        assert!(progress_events(&mut units).is_empty());

        let unit = units.get_mut(&h(1)).unwrap();
        unit.rearm();
        assert!(!unit.finished);
        assert!(!unit.sink.as_ref().unwrap().empty());
    }

    #[test]
    fn looping_unit_refills_without_finish() {
        let mut units = Units::new();
        units.insert(h(1), drained_unit(true));

        let events = progress_events(&mut units);

        assert!(!events.iter().any(|(_, e)| *e == EngineEvent::Finish));
        let unit = &units[&h(1)];
        assert!(!unit.finished);
        assert!(!unit.sink.as_ref().unwrap().empty());
    }

    #[test]
    fn shared_source_seeks_on_frame_boundaries() {
        let audio = decoded(800);
        let mut source = audio.source();

        source.try_seek(Duration::from_millis(50)).unwrap();
        assert_eq!(source.pos, 800);
        assert_eq!(source.by_ref().count(), 800);

        assert_eq!(audio.source().total_duration(), Some(audio.duration));
        assert!(Arc::ptr_eq(&audio.source().samples, &audio.samples));
    }
}
