use super::*;
use std::path::PathBuf;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        path: PathBuf::from("/tmp/music/test.mp3"),
        title: "Test Title".to_string(),
        description: "Test Artist - Test Album".to_string(),
        artwork: Some(PathBuf::from("/tmp/music/cover.jpg")),
        duration: Some(Duration::from_micros(1_234_567)),
    }
}

fn make_handle() -> (MprisHandle, Arc<Mutex<SharedState>>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, _notify_rx) = mpsc::channel::<()>();
    (
        MprisHandle {
            state: state.clone(),
            notify: notify_tx,
        },
        state,
    )
}

fn make_iface(state: Arc<Mutex<SharedState>>) -> PlayerIface {
    let (tx, _rx) = mpsc::channel();
    PlayerIface {
        controls: Controls::new(tx),
        state,
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state) = make_handle();

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.description.as_deref(), Some("Test Artist - Test Album"));
        assert!(s.url.as_deref().unwrap().contains("/tmp/music/test.mp3"));
        assert!(s.art_url.as_deref().unwrap().contains("cover.jpg"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.description, None);
        assert_eq!(s.url, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn empty_description_is_dropped_from_metadata() {
    let (handle, state) = make_handle();
    let track = Track {
        description: String::new(),
        ..make_track()
    };

    handle.set_track_metadata(Some(0), Some(&track));

    assert_eq!(state.lock().unwrap().description, None);
}

#[test]
fn playback_status_maps_snapshots_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let iface = make_iface(state.clone());

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().status = PlaybackStatus::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().status = PlaybackStatus::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn status_for_treats_only_the_blank_snapshot_as_stopped() {
    let initial = PlaybackState::initial();
    assert_eq!(status_for(&initial), PlaybackStatus::Stopped);

    let playing = PlaybackState {
        track: 1,
        playing: true,
        duration: Duration::from_secs(200),
        position: Duration::ZERO,
    };
    assert_eq!(status_for(&playing), PlaybackStatus::Playing);

    let paused = PlaybackState {
        playing: false,
        ..playing
    };
    assert_eq!(status_for(&paused), PlaybackStatus::Paused);
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.description = Some("Artist - Album".to_string());
        s.url = Some("file:///tmp/test.mp3".to_string());
        s.art_url = Some("file:///tmp/cover.jpg".to_string());
        s.length_micros = Some(42);
        s.track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1")
            .ok()
            .map(|p| p.into());
    }
    let iface = make_iface(state);

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:comment",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_iface_routes_remote_actions() {
    let (tx, rx) = mpsc::channel();
    let iface = PlayerIface {
        controls: Controls::new(tx),
        state: Arc::new(Mutex::new(SharedState::default())),
    };

    iface.previous();
    iface.play_pause();
    iface.next();

    use crate::audio::Command;
    assert_eq!(rx.try_recv(), Ok(Command::Prev));
    assert_eq!(rx.try_recv(), Ok(Command::TogglePause));
    assert_eq!(rx.try_recv(), Ok(Command::Next));
}
