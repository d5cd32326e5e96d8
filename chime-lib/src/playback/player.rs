//! A media element backed by rodio and symphonia.
//!
//! The rodio output stream is not `Send`, so a playback thread owns it and
//! publishes its sink through a shared mutex. Commands act on the shared
//! sink; the thread ticks a pause-aware timer to track the playhead and
//! emits notifications over an mpsc channel. Seeking tears the thread down
//! and respawns it decoding from the target offset.

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, error};
use rodio::{Decoder, OutputStream, Sink, Source};
use symphonia::core::errors::Result;

use crate::element::{MediaElement, MediaEvent};
use crate::info::Info;
use crate::tools::timer::Timer;

/// Notification cadence of the playback thread.
const TICK: Duration = Duration::from_millis(100);

pub struct AudioElement {
    path: PathBuf,
    info: Info,
    sink: Arc<Mutex<Option<Sink>>>,
    volume: Arc<Mutex<f32>>,
    muted: Arc<AtomicBool>,
    abort: Arc<AtomicBool>,
    thread_alive: Arc<AtomicBool>,
    events: Sender<MediaEvent>,
}

impl AudioElement {
    /// Probe the resource and start a playback thread, paused at offset 0.
    /// The receiver carries this element's notifications; `MetadataLoaded`
    /// is already queued on it when `open` returns.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Self, Receiver<MediaEvent>)> {
        let info = Info::probe(path.as_ref())?;
        let (events, receiver) = channel();

        let this = Self {
            path: path.as_ref().to_path_buf(),
            info,
            sink: Arc::new(Mutex::new(None)),
            volume: Arc::new(Mutex::new(0.7)),
            muted: Arc::new(AtomicBool::new(false)),
            abort: Arc::new(AtomicBool::new(false)),
            thread_alive: Arc::new(AtomicBool::new(false)),
            events,
        };

        let _ = this.events.send(MediaEvent::MetadataLoaded(this.info.duration));
        this.spawn_thread(0.0);

        Ok((this, receiver))
    }

    pub fn set_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = volume;
    }

    fn effective_volume(muted: bool, volume: f32) -> f32 {
        if muted {
            0.0
        } else {
            volume
        }
    }

    /// Whether a seek should leave the respawned thread playing. A sink
    /// left behind by a dead playback thread is not evidence of playback.
    fn resume_after_seek(thread_alive: bool, sink_playing: bool) -> bool {
        thread_alive && sink_playing
    }

    /// Final playhead to report when the source runs out. With an unknown
    /// duration the last computed offset stands; running off the end never
    /// rewinds the readout.
    fn final_position(duration: f64, last_ts: f64) -> f64 {
        if duration > 0.0 {
            duration
        } else {
            last_ts
        }
    }

    /// Request the playback thread to abort and wait for it to exit.
    fn kill_current(&self) {
        self.abort.store(true, Ordering::SeqCst);
        while self.thread_alive.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Wait until the playback thread has published its sink.
    fn wait_for_sink(&self) {
        while self.sink.lock().unwrap().is_none() && self.thread_alive.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(10));
        }
    }

    fn spawn_thread(&self, start_at: f64) {
        self.abort.store(false, Ordering::SeqCst);
        self.thread_alive.store(true, Ordering::SeqCst);
        *self.sink.lock().unwrap() = None;

        let path = self.path.clone();
        let duration = self.info.duration;
        let sink_mutex = self.sink.clone();
        let volume = self.volume.clone();
        let muted = self.muted.clone();
        let abort = self.abort.clone();
        let thread_alive = self.thread_alive.clone();
        let events = self.events.clone();

        thread::spawn(move || {
            // The output stream must outlive the sink and is not Send, so
            // this thread owns it for the whole playback.
            let (_stream, stream_handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(err) => {
                    error!("no audio output available: {}", err);
                    thread_alive.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let file = match std::fs::File::open(&path) {
                Ok(file) => file,
                Err(err) => {
                    error!("failed to open {}: {}", path.display(), err);
                    thread_alive.store(false, Ordering::SeqCst);
                    return;
                }
            };
            let source = match Decoder::new(BufReader::new(file)) {
                Ok(decoder) => decoder.skip_duration(Duration::from_secs_f64(start_at)),
                Err(err) => {
                    error!("failed to decode {}: {}", path.display(), err);
                    thread_alive.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let sink = match Sink::try_new(&stream_handle) {
                Ok(sink) => sink,
                Err(err) => {
                    error!("failed to create audio sink: {}", err);
                    thread_alive.store(false, Ordering::SeqCst);
                    return;
                }
            };
            sink.pause();
            sink.set_volume(Self::effective_volume(
                muted.load(Ordering::Relaxed),
                *volume.lock().unwrap(),
            ));
            sink.append(source);
            *sink_mutex.lock().unwrap() = Some(sink);
            debug!("playback thread started at {:.2}s", start_at);

            let mut timer = Timer::new();
            let mut last_ts = start_at;

            loop {
                if abort.load(Ordering::SeqCst) {
                    if let Some(sink) = sink_mutex.lock().unwrap().take() {
                        sink.stop();
                    }
                    break;
                }

                let finished = {
                    let guard = sink_mutex.lock().unwrap();
                    let Some(sink) = guard.as_ref() else {
                        break;
                    };

                    sink.set_volume(Self::effective_volume(
                        muted.load(Ordering::Relaxed),
                        *volume.lock().unwrap(),
                    ));
                    if sink.is_paused() {
                        timer.pause();
                    } else {
                        timer.resume();
                    }

                    sink.empty()
                };

                if finished {
                    // The sink dies with its thread; a later seek must not
                    // consult it.
                    sink_mutex.lock().unwrap().take();
                    let final_ts = Self::final_position(duration, last_ts);
                    let _ = events.send(MediaEvent::PositionAdvanced(final_ts));
                    let _ = events.send(MediaEvent::Ended);
                    break;
                }

                let mut ts = start_at + timer.elapsed().as_secs_f64();
                if duration > 0.0 {
                    ts = ts.min(duration);
                }
                last_ts = ts;
                let _ = events.send(MediaEvent::PositionAdvanced(ts));

                thread::sleep(TICK);
            }

            thread_alive.store(false, Ordering::SeqCst);
        });
    }
}

impl MediaElement for AudioElement {
    fn play(&mut self) {
        // Replay after the thread ran off the end of the resource restarts
        // decoding from offset 0.
        if !self.thread_alive.load(Ordering::SeqCst) {
            self.spawn_thread(0.0);
        }
        self.wait_for_sink();
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink.pause();
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink.set_volume(Self::effective_volume(muted, *self.volume.lock().unwrap()));
        }
    }

    fn set_position(&mut self, seconds: f64) {
        let target = if self.info.duration > 0.0 {
            seconds.clamp(0.0, self.info.duration)
        } else {
            0.0
        };

        let sink_playing = self
            .sink
            .lock()
            .unwrap()
            .as_ref()
            .map(|sink| !sink.is_paused())
            .unwrap_or(false);
        let was_playing =
            Self::resume_after_seek(self.thread_alive.load(Ordering::SeqCst), sink_playing);

        self.kill_current();
        self.spawn_thread(target);

        if was_playing {
            self.wait_for_sink();
            if let Some(sink) = self.sink.lock().unwrap().as_ref() {
                sink.play();
            }
        }
    }
}

impl Drop for AudioElement {
    fn drop(&mut self) {
        self.abort.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_after_finished_thread_stays_paused() {
        // A finished thread is gone regardless of what state its sink was
        // last seen in; seeking must not restart playback.
        assert!(!AudioElement::resume_after_seek(false, true));
        assert!(!AudioElement::resume_after_seek(false, false));
    }

    #[test]
    fn seek_resumes_only_a_live_playing_sink() {
        assert!(AudioElement::resume_after_seek(true, true));
        assert!(!AudioElement::resume_after_seek(true, false));
    }

    #[test]
    fn final_position_keeps_last_offset_when_duration_unknown() {
        assert_eq!(AudioElement::final_position(0.0, 12.5), 12.5);
        assert_eq!(AudioElement::final_position(180.0, 12.5), 180.0);
    }
}
