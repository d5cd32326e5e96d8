use std::time::Duration;

use chime_lib::controller::{format_time, Controller};
use chime_lib::element::MediaElement;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

/// Seek step for the arrow keys, in slider percentage points.
const SEEK_STEP_PERCENT: f64 = 5.0;

pub struct StatusSnapshot {
    pub text: String,
    /// Slider position in [0, 1].
    pub progress_ratio: f64,
}

pub fn status_text<M: MediaElement>(controller: &Controller<M>) -> StatusSnapshot {
    let state = controller.state();
    let transport = if state.playing { "▶ Playing" } else { "⏸ Paused" };
    let sound = if state.muted { "muted" } else { "sound on" };
    let text = format!(
        "{}   {} / {}   ({})",
        transport,
        format_time(state.current_time),
        format_time(state.duration),
        sound
    );

    StatusSnapshot {
        text,
        progress_ratio: (controller.progress_percent() / 100.0).clamp(0.0, 1.0),
    }
}

/// Poll for one key event and translate it into a controller intent.
/// Returns false when the user quits.
pub fn handle_key_event<M: MediaElement>(controller: &mut Controller<M>) -> bool {
    if event::poll(Duration::from_millis(100)).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                return true;
            }
            match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Char(' ') => controller.toggle_play(),
                KeyCode::Char('m') | KeyCode::Char('M') => controller.toggle_mute(),
                KeyCode::Left => {
                    let percent = (controller.progress_percent() - SEEK_STEP_PERCENT).max(0.0);
                    controller.seek_percent(percent);
                }
                KeyCode::Right => {
                    let percent = (controller.progress_percent() + SEEK_STEP_PERCENT).min(100.0);
                    controller.seek_percent(percent);
                }
                _ => {}
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chime_lib::element::MediaEvent;

    struct NullElement;

    impl MediaElement for NullElement {
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn set_muted(&mut self, _muted: bool) {}
        fn set_position(&mut self, _seconds: f64) {}
    }

    #[test]
    fn status_line_shows_transport_and_times() {
        let mut controller = Controller::new(NullElement);
        controller.handle_event(MediaEvent::MetadataLoaded(599.0));
        controller.handle_event(MediaEvent::PositionAdvanced(65.0));

        let status = status_text(&controller);
        assert!(status.text.contains("⏸ Paused"));
        assert!(status.text.contains("1:05 / 9:59"));
        assert!(status.text.contains("sound on"));
    }

    #[test]
    fn progress_ratio_stays_in_bounds_without_metadata() {
        let mut controller = Controller::new(NullElement);
        controller.handle_event(MediaEvent::PositionAdvanced(10.0));

        let status = status_text(&controller);
        assert_eq!(status.progress_ratio, 0.0);
    }
}
