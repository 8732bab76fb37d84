//! Call sessions for video consultations.
//!
//! The conference itself runs on an external hosted widget; this module only
//! tracks which appointments have a live call, derives the room name handed to
//! that widget, and keeps per-call state (start instant, consultation notes).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

#[derive(Clone, Debug)]
pub struct CallSession {
    pub appointment_id: i64,
    pub room_name: String,
    pub started_at: DateTime<Utc>,
    pub notes: String,
}

/// Everything a client needs to embed the external widget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinDetails {
    pub domain: String,
    pub script_url: String,
    pub room_name: String,
    pub options: RoomOptions,
    /// True when an earlier join already created this session; the caller
    /// must not construct a second widget instance.
    pub rejoined: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallStatus {
    pub room_name: String,
    pub elapsed_secs: u64,
    pub notes: String,
}

pub struct CallSessionManager {
    domain: String,
    script_url: String,
    room_prefix: String,
    active: RwLock<HashMap<i64, CallSession>>,
}

impl CallSessionManager {
    pub fn new(domain: impl Into<String>, script_url: impl Into<String>, room_prefix: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            script_url: script_url.into(),
            room_prefix: room_prefix.into(),
            active: RwLock::new(HashMap::new()),
        }
    }

    fn room_name(&self, appointment_id: i64) -> String {
        format!("{}-{}", self.room_prefix, appointment_id)
    }

    /// Join the call for an appointment. Idempotent: a second join while the
    /// session is live returns the existing room instead of opening another.
    pub async fn join(&self, appointment_id: i64) -> JoinDetails {
        let mut active = self.active.write().await;
        let (session, rejoined) = match active.get(&appointment_id) {
            Some(existing) => (existing.clone(), true),
            None => {
                let session = CallSession {
                    appointment_id,
                    room_name: self.room_name(appointment_id),
                    started_at: Utc::now(),
                    notes: String::new(),
                };
                active.insert(appointment_id, session.clone());
                info!(appointment_id, room = %session.room_name, "call session started");
                (session, false)
            }
        };
        JoinDetails {
            domain: self.domain.clone(),
            script_url: self.script_url.clone(),
            room_name: session.room_name,
            options: RoomOptions::consultation(),
            rejoined,
        }
    }

    pub async fn status(&self, appointment_id: i64) -> Option<CallStatus> {
        let active = self.active.read().await;
        let session = active.get(&appointment_id)?;
        let elapsed = (Utc::now() - session.started_at).num_seconds().max(0) as u64;
        Some(CallStatus {
            room_name: session.room_name.clone(),
            elapsed_secs: elapsed,
            notes: session.notes.clone(),
        })
    }

    /// Replace the free-text consultation notes; false if no live session.
    pub async fn set_notes(&self, appointment_id: i64, notes: String) -> bool {
        let mut active = self.active.write().await;
        match active.get_mut(&appointment_id) {
            Some(session) => {
                session.notes = notes;
                true
            }
            None => false,
        }
    }

    /// End the call and dispose the session; false if none was live.
    pub async fn end(&self, appointment_id: i64) -> bool {
        let mut active = self.active.write().await;
        let ended = active.remove(&appointment_id).is_some();
        if ended {
            info!(appointment_id, "call session ended");
        }
        ended
    }
}

/// Widget options forwarded verbatim to the external conferencing script.
/// Field names serialize to the collaborator's expected keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomOptions {
    pub width: String,
    pub height: String,
    #[serde(rename = "configOverwrite")]
    pub config: ConfigOverwrite,
    #[serde(rename = "interfaceConfigOverwrite")]
    pub interface: InterfaceConfigOverwrite,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverwrite {
    #[serde(rename = "prejoinPageEnabled")]
    pub prejoin_page_enabled: bool,
    #[serde(rename = "startWithAudioMuted")]
    pub start_with_audio_muted: bool,
    #[serde(rename = "startWithVideoMuted")]
    pub start_with_video_muted: bool,
    #[serde(rename = "disableFilmstripAutohiding")]
    pub disable_filmstrip_autohiding: bool,
    pub filmstrip: FilmstripOptions,
    #[serde(rename = "disableTileView")]
    pub disable_tile_view: bool,
    #[serde(rename = "disableSelfView")]
    pub disable_self_view: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilmstripOptions {
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterfaceConfigOverwrite {
    #[serde(rename = "FILMSTRIP_ENABLED")]
    pub filmstrip_enabled: bool,
    #[serde(rename = "DISABLE_TILE_VIEW")]
    pub disable_tile_view: bool,
    #[serde(rename = "TOOLBAR_BUTTONS")]
    pub toolbar_buttons: Vec<String>,
    #[serde(rename = "SHOW_JITSI_WATERMARK")]
    pub show_jitsi_watermark: bool,
    #[serde(rename = "SHOW_WATERMARK_FOR_GUESTS")]
    pub show_watermark_for_guests: bool,
    #[serde(rename = "SHOW_BRAND_WATERMARK")]
    pub show_brand_watermark: bool,
    #[serde(rename = "SHOW_POWERED_BY")]
    pub show_powered_by: bool,
}

impl RoomOptions {
    /// Single-filmstrip, no-prejoin consultation layout with a minimal toolbar.
    pub fn consultation() -> Self {
        Self {
            width: "100%".into(),
            height: "100%".into(),
            config: ConfigOverwrite {
                prejoin_page_enabled: false,
                start_with_audio_muted: false,
                start_with_video_muted: false,
                disable_filmstrip_autohiding: true,
                filmstrip: FilmstripOptions { disabled: true },
                disable_tile_view: true,
                disable_self_view: false,
            },
            interface: InterfaceConfigOverwrite {
                filmstrip_enabled: false,
                disable_tile_view: true,
                toolbar_buttons: ["microphone", "camera", "hangup", "desktop", "fullscreen"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                show_jitsi_watermark: false,
                show_watermark_for_guests: false,
                show_brand_watermark: false,
                show_powered_by: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> CallSessionManager {
        CallSessionManager::new("meet.jit.si", "https://meet.jit.si/external_api.js", "doctaba")
    }

    #[tokio::test]
    async fn join_is_idempotent_per_appointment() {
        let calls = manager();

        let first = calls.join(42).await;
        assert_eq!(first.room_name, "doctaba-42");
        assert!(first.room_name.ends_with("-42"));
        assert!(!first.rejoined);

        // Mounting the view twice in succession must not open a second room.
        let second = calls.join(42).await;
        assert_eq!(second.room_name, first.room_name);
        assert!(second.rejoined);

        let other = calls.join(7).await;
        assert_eq!(other.room_name, "doctaba-7");
        assert!(!other.rejoined);
    }

    #[tokio::test]
    async fn status_notes_and_teardown() {
        let calls = manager();
        assert!(calls.status(42).await.is_none());

        calls.join(42).await;
        let status = calls.status(42).await.expect("live session");
        assert_eq!(status.room_name, "doctaba-42");
        assert!(status.notes.is_empty());

        assert!(calls.set_notes(42, "BP normal, follow up in 2 weeks".into()).await);
        assert_eq!(calls.status(42).await.unwrap().notes, "BP normal, follow up in 2 weeks");

        assert!(calls.end(42).await);
        assert!(!calls.end(42).await, "ending twice is a no-op");
        assert!(calls.status(42).await.is_none());

        // A fresh join after teardown starts a new session.
        let rejoin = calls.join(42).await;
        assert!(!rejoin.rejoined);
        assert_eq!(calls.status(42).await.unwrap().notes, "", "notes do not leak across sessions");
    }

    #[tokio::test]
    async fn widget_options_serialize_to_collaborator_keys() {
        let json = serde_json::to_value(RoomOptions::consultation()).unwrap();
        assert_eq!(json["configOverwrite"]["prejoinPageEnabled"], false);
        assert_eq!(json["configOverwrite"]["filmstrip"]["disabled"], true);
        assert_eq!(json["interfaceConfigOverwrite"]["SHOW_JITSI_WATERMARK"], false);
        assert_eq!(
            json["interfaceConfigOverwrite"]["TOOLBAR_BUTTONS"],
            serde_json::json!(["microphone", "camera", "hangup", "desktop", "fullscreen"])
        );
        assert_eq!(json["width"], "100%");
    }
}
