use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::warn;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::audio::PlaybackState;
use crate::catalog::Track;
use crate::router::{ACTION_NEXT, ACTION_PLAY_PAUSE, ACTION_PREV, Controls};

const BUS_NAME: &str = "org.mpris.MediaPlayer2.vivace";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Map a playback snapshot onto the MPRIS status triple. A snapshot is
/// Stopped only before anything has ever loaded; after that pause is
/// Paused, even at position zero.
pub fn status_for(state: &PlaybackState) -> PlaybackStatus {
    if state.playing {
        PlaybackStatus::Playing
    } else if state.duration_known() || state.position > Duration::ZERO {
        PlaybackStatus::Paused
    } else {
        PlaybackStatus::Stopped
    }
}

#[derive(Debug, Default)]
struct SharedState {
    status: PlaybackStatus,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

/// Updates the published interface in place; the D-Bus object lives for
/// the whole session, only its properties change.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: mpsc::Sender<()>,
}

impl MprisHandle {
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            s.title = track.map(|t| t.title.clone());
            s.description = track
                .map(|t| t.description.clone())
                .filter(|d| !d.is_empty());
            s.url = track.map(|t| format!("file://{}", t.path.display()));
            s.art_url = track
                .and_then(|t| t.artwork.as_ref())
                .map(|p| format!("file://{}", p.display()));
            s.length_micros = track
                .and_then(|t| t.duration)
                .map(|d| d.as_micros() as i64);
            s.track_id = index.and_then(|i| {
                ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}"))
                    .ok()
                    .map(|p| p.into())
            });
        }
        let _ = self.notify.send(());
    }

    pub fn set_playback(&self, status: PlaybackStatus) {
        if let Ok(mut s) = self.state.lock() {
            s.status = status;
        }
        let _ = self.notify.send(());
    }
}

struct RootIface;

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for a terminal player.
    }

    fn quit(&self) {
        // Sessions end from the keyboard, not the bus.
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "vivace"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    controls: Controls,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.controls.dispatch_action(Some(ACTION_NEXT));
    }

    fn previous(&self) {
        self.controls.dispatch_action(Some(ACTION_PREV));
    }

    fn play(&self) {
        self.controls.dispatch_action(Some(ACTION_PLAY_PAUSE));
    }

    fn pause(&self) {
        self.controls.dispatch_action(Some(ACTION_PLAY_PAUSE));
    }

    fn play_pause(&self) {
        self.controls.dispatch_action(Some(ACTION_PLAY_PAUSE));
    }

    fn stop(&self) {
        self.controls.dispatch_action(Some(ACTION_PLAY_PAUSE));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.status {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(ref id) = s.track_id
            && let Ok(v) = OwnedValue::try_from(Value::from(id.clone()))
        {
            map.insert("mpris:trackid".to_string(), v);
        }
        insert_str(&mut map, "xesam:title", s.title.as_deref());
        insert_str(&mut map, "xesam:comment", s.description.as_deref());
        insert_str(&mut map, "xesam:url", s.url.as_deref());
        insert_str(&mut map, "mpris:artUrl", s.art_url.as_deref());
        if let Some(micros) = s.length_micros
            && let Ok(v) = OwnedValue::try_from(Value::from(micros))
        {
            map.insert("mpris:length".to_string(), v);
        }
        map
    }
}

fn insert_str(map: &mut HashMap<String, OwnedValue>, key: &str, value: Option<&str>) {
    if let Some(value) = value
        && let Ok(v) = OwnedValue::try_from(Value::from(value.to_string()))
    {
        map.insert(key.to_string(), v);
    }
}

/// Register the player on the session bus. Bus failures are non-fatal;
/// playback works without a desktop session.
pub fn spawn_mpris(controls: Controls) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("mpris: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!("mpris: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(OBJECT_PATH, RootIface).await {
                warn!("mpris: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        controls,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("mpris: failed to register player iface: {e}");
                return;
            }

            let iface_ref = match object_server
                .interface::<_, PlayerIface>(OBJECT_PATH)
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    warn!("mpris: failed to resolve player iface: {e}");
                    return;
                }
            };

            // Batch property-changed signals; a short poll keeps the
            // bridge free of a second async channel type.
            loop {
                Timer::after(Duration::from_millis(250)).await;
                let mut dirty = false;
                loop {
                    match notify_rx.try_recv() {
                        Ok(()) => dirty = true,
                        Err(mpsc::TryRecvError::Empty) => break,
                        Err(mpsc::TryRecvError::Disconnected) => return,
                    }
                }
                if dirty {
                    let iface = iface_ref.get().await;
                    let emitter = iface_ref.signal_emitter();
                    let _ = iface.playback_status_changed(emitter).await;
                    let _ = iface.metadata_changed(emitter).await;
                }
            }
        });
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

#[cfg(test)]
mod tests;
