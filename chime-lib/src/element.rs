//! The contract between the playback controller and whatever actually makes
//! sound.

/// Transport commands the controller issues to a media element.
///
/// Implementations are expected to clamp out-of-range positions themselves;
/// the controller never does.
pub trait MediaElement {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn set_position(&mut self, seconds: f64);
}

/// Notifications a media element emits at its own cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// The playhead moved to the given offset in seconds.
    PositionAdvanced(f64),
    /// The resource duration (in seconds) became known.
    MetadataLoaded(f64),
    /// Playback ran off the end of the resource.
    Ended,
}
