use crate::router::Controls;

/// The session starts the way a bare service start would: no action
/// given, which begins playback at the first track.
pub fn apply_playback_defaults(controls: &Controls) {
    controls.dispatch_action(None);
}
