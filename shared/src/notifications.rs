//! Notification payloads delivered over WebSocket and push

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain events users get notified about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationEvent {
    #[serde(rename_all = "camelCase")]
    RestTimerFinished { pause_time_secs: u64 },
    #[serde(rename_all = "camelCase")]
    FriendRequestReceived { from: Uuid, username: String },
    #[serde(rename_all = "camelCase")]
    FriendRequestAccepted { by: Uuid, username: String },
}

impl NotificationEvent {
    /// Short identifier, used for metrics labels and logs
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::RestTimerFinished { .. } => "rest_timer_finished",
            NotificationEvent::FriendRequestReceived { .. } => "friend_request_received",
            NotificationEvent::FriendRequestAccepted { .. } => "friend_request_accepted",
        }
    }
}

/// A notification ready to be sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(flatten)]
    pub event: NotificationEvent,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(event: NotificationEvent) -> Self {
        let (title, body) = match &event {
            NotificationEvent::RestTimerFinished { pause_time_secs } => (
                "Rest is over".to_string(),
                format!("Your {} second rest has finished. Time for the next set!", pause_time_secs),
            ),
            NotificationEvent::FriendRequestReceived { username, .. } => (
                "New friend request".to_string(),
                format!("{} wants to be your friend", username),
            ),
            NotificationEvent::FriendRequestAccepted { username, .. } => (
                "Friend request accepted".to_string(),
                format!("{} accepted your friend request", username),
            ),
        };

        Self {
            event,
            title,
            body,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_json_is_tagged() {
        let notification = Notification::new(NotificationEvent::RestTimerFinished {
            pause_time_secs: 90,
        });
        let value = serde_json::to_value(&notification).unwrap();

        assert_eq!(value["type"], "restTimerFinished");
        assert_eq!(value["pauseTimeSecs"], 90);
        assert_eq!(value["title"], "Rest is over");
        assert!(value["body"].as_str().unwrap().contains("90 second"));
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_notification_round_trip() {
        let notification = Notification::new(NotificationEvent::FriendRequestReceived {
            from: Uuid::new_v4(),
            username: "ironlifter".to_string(),
        });
        let json = serde_json::to_string(&notification).unwrap();
        let parsed: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, notification);
    }

    #[test]
    fn test_event_kind() {
        let event = NotificationEvent::FriendRequestAccepted {
            by: Uuid::nil(),
            username: "a".to_string(),
        };
        assert_eq!(event.kind(), "friend_request_accepted");
    }
}
