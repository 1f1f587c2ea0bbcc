use jointfx_core::{PlaybackAction, RolloffCurve, WindowKind};

/// Looping positional sound emitter attached to the figure.
pub trait AudioSink {
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    fn set_pitch(&mut self, pitch: f32);
    fn set_volume(&mut self, volume: f32);
    fn set_rolloff_curve(&mut self, curve: &RolloffCurve);
    /// Fills `buffer` with magnitudes of the currently playing signal.
    fn read_spectrum(&mut self, buffer: &mut [f32], window: WindowKind);
}

// Forward a modulator decision to the sink
pub fn apply_playback(sink: &mut dyn AudioSink, action: PlaybackAction) {
    match action {
        PlaybackAction::Play => {
            log::debug!("sound: play");
            sink.play();
        }
        PlaybackAction::Stop => {
            log::debug!("sound: stop");
            sink.stop();
        }
        PlaybackAction::Restart => {
            log::debug!("sound: sink stopped while toggled on, restarting");
            sink.play();
        }
    }
}
