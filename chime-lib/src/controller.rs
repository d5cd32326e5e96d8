//! The playback controller: four pieces of UI state kept in sync with a
//! media element through its commands and notifications.

use crate::element::{MediaElement, MediaEvent};

/// The UI-facing playback state. All fields start at their defaults and are
/// mutated only by user intents and media-element notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub playing: bool,
    pub muted: bool,
    /// Playhead offset in seconds.
    pub current_time: f64,
    /// Resource length in seconds; 0.0 until metadata is known.
    pub duration: f64,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            playing: false,
            muted: false,
            current_time: 0.0,
            duration: 0.0,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

/// Mediates between user intents and the media element. Generic over the
/// element so it can be driven by a recording fake in tests.
pub struct Controller<M: MediaElement> {
    state: PlaybackState,
    media: M,
}

impl<M: MediaElement> Controller<M> {
    pub fn new(media: M) -> Self {
        Self {
            state: PlaybackState::new(),
            media,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// Flip the playing flag and command the element to match.
    pub fn toggle_play(&mut self) {
        self.state.playing = !self.state.playing;
        if self.state.playing {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    /// Flip the muted flag and command the element to match.
    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        self.media.set_muted(self.state.muted);
    }

    /// Map a slider percentage to a time offset and command the element to
    /// reposition. With an unknown duration the target is 0.
    pub fn seek_percent(&mut self, percent: f64) {
        let target = percent / 100.0 * self.state.duration;
        self.media.set_position(target);
    }

    /// Apply one notification from the media element.
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PositionAdvanced(seconds) => self.state.current_time = seconds,
            MediaEvent::MetadataLoaded(seconds) => self.state.duration = seconds,
            MediaEvent::Ended => self.state.playing = false,
        }
    }

    /// Slider display percentage. Never divides by zero.
    pub fn progress_percent(&self) -> f64 {
        if self.state.duration > 0.0 {
            self.state.current_time / self.state.duration * 100.0
        } else {
            0.0
        }
    }
}

/// Format a second count as `M:SS`, minutes unpadded. Negative or NaN input
/// collapses to `"0:00"` through the saturating cast.
pub fn format_time(seconds: f64) -> String {
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Command {
        Play,
        Pause,
        SetMuted(bool),
        SetPosition(f64),
    }

    #[derive(Default)]
    struct FakeElement {
        commands: Vec<Command>,
    }

    impl MediaElement for FakeElement {
        fn play(&mut self) {
            self.commands.push(Command::Play);
        }

        fn pause(&mut self) {
            self.commands.push(Command::Pause);
        }

        fn set_muted(&mut self, muted: bool) {
            self.commands.push(Command::SetMuted(muted));
        }

        fn set_position(&mut self, seconds: f64) {
            self.commands.push(Command::SetPosition(seconds));
        }
    }

    fn controller() -> Controller<FakeElement> {
        Controller::new(FakeElement::default())
    }

    #[test]
    fn toggle_play_twice_restores_state_and_commands_element() {
        let mut controller = controller();
        assert!(!controller.state().playing);

        controller.toggle_play();
        assert!(controller.state().playing);

        controller.toggle_play();
        assert!(!controller.state().playing);
        assert_eq!(
            controller.media_mut().commands,
            vec![Command::Play, Command::Pause]
        );
    }

    #[test]
    fn toggle_mute_twice_restores_state() {
        let mut controller = controller();

        controller.toggle_mute();
        assert!(controller.state().muted);

        controller.toggle_mute();
        assert!(!controller.state().muted);
        assert_eq!(
            controller.media_mut().commands,
            vec![Command::SetMuted(true), Command::SetMuted(false)]
        );
    }

    #[test]
    fn ended_forces_playing_false() {
        let mut controller = controller();
        controller.toggle_play();
        controller.handle_event(MediaEvent::PositionAdvanced(3.5));

        controller.handle_event(MediaEvent::Ended);

        assert!(!controller.state().playing);
        assert_eq!(controller.state().current_time, 3.5);
    }

    #[test]
    fn ended_is_a_no_op_when_already_paused() {
        let mut controller = controller();
        controller.handle_event(MediaEvent::Ended);
        assert!(!controller.state().playing);
    }

    #[test]
    fn notifications_overwrite_their_fields() {
        let mut controller = controller();

        controller.handle_event(MediaEvent::MetadataLoaded(180.0));
        controller.handle_event(MediaEvent::PositionAdvanced(12.25));

        assert_eq!(controller.state().duration, 180.0);
        assert_eq!(controller.state().current_time, 12.25);
    }

    #[test]
    fn seek_maps_percent_to_time_offset() {
        let mut controller = controller();
        controller.handle_event(MediaEvent::MetadataLoaded(200.0));

        controller.seek_percent(25.0);
        controller.seek_percent(0.0);
        controller.seek_percent(100.0);

        assert_eq!(
            controller.media_mut().commands,
            vec![
                Command::SetPosition(50.0),
                Command::SetPosition(0.0),
                Command::SetPosition(200.0),
            ]
        );
    }

    #[test]
    fn seek_with_unknown_duration_targets_zero() {
        let mut controller = controller();
        controller.seek_percent(60.0);
        assert_eq!(
            controller.media_mut().commands,
            vec![Command::SetPosition(0.0)]
        );
    }

    #[test]
    fn progress_percent_tracks_position() {
        let mut controller = controller();
        controller.handle_event(MediaEvent::MetadataLoaded(400.0));
        controller.handle_event(MediaEvent::PositionAdvanced(100.0));
        assert_eq!(controller.progress_percent(), 25.0);
    }

    #[test]
    fn progress_percent_is_zero_with_unknown_duration() {
        let mut controller = controller();
        controller.handle_event(MediaEvent::PositionAdvanced(10.0));
        assert_eq!(controller.progress_percent(), 0.0);
    }

    #[test]
    fn formats_seconds_as_minutes_and_padded_remainder() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(599.0), "9:59");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(59.9), "0:59");
    }

    #[test]
    fn formats_invalid_input_as_zero() {
        assert_eq!(format_time(-5.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
