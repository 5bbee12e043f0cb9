//! User notifications
//!
//! Notifications reach a user two ways: connected WebSocket clients receive
//! them through a per-user broadcast channel, and registered browser push
//! subscriptions receive them through the configured push relay. Delivery is
//! best effort; failures are logged and never reach the caller.

use crate::config::PushConfig;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use training_tracker_shared::{Notification, NotificationEvent, PushSubscription};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 32;

/// Per-user broadcast channels for connected clients
#[derive(Clone, Default)]
pub struct NotificationHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<String>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a user's notifications, creating the channel on first use
    pub async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Send a serialized notification; returns the number of receivers
    pub async fn publish(&self, user_id: Uuid, payload: String) -> usize {
        let channels = self.channels.read().await;
        match channels.get(&user_id) {
            Some(sender) => sender.send(payload).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop the user's channel once their last receiver is gone
    pub async fn remove_if_idle(&self, user_id: Uuid) {
        let mut channels = self.channels.write().await;
        if channels
            .get(&user_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&user_id);
        }
    }
}

/// Body sent to the push relay
#[derive(Serialize)]
struct PushMessage<'a> {
    subscription: &'a PushSubscription,
    notification: &'a Notification,
}

/// Forwards notifications to a Web Push relay over HTTP
#[derive(Clone)]
pub struct PushGateway {
    client: reqwest::Client,
    relay_url: Option<String>,
}

impl PushGateway {
    pub fn new(config: &PushConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build push HTTP client")?;

        Ok(Self {
            client,
            relay_url: config.relay_url.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.relay_url.is_some()
    }

    /// Deliver one notification to one subscription
    pub async fn send(&self, subscription: &PushSubscription, notification: &Notification) -> Result<()> {
        let Some(url) = &self.relay_url else {
            return Ok(());
        };

        self.client
            .post(url)
            .json(&PushMessage {
                subscription,
                notification,
            })
            .send()
            .await
            .context("Push relay request failed")?
            .error_for_status()
            .context("Push relay rejected notification")?;

        Ok(())
    }
}

/// Fan-out of domain events to the hub and push subscriptions
#[derive(Clone)]
pub struct NotificationService {
    hub: NotificationHub,
    push: PushGateway,
    users: UserRepository,
}

impl NotificationService {
    pub fn new(hub: NotificationHub, push: PushGateway, users: UserRepository) -> Self {
        Self { hub, push, users }
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Notify a user; never fails
    pub async fn notify(&self, user_id: Uuid, event: NotificationEvent) {
        let kind = event.kind();
        let notification = Notification::new(event);

        match serde_json::to_string(&notification) {
            Ok(payload) => {
                let receivers = self.hub.publish(user_id, payload).await;
                debug!(%user_id, kind, receivers, "Notification published");
            }
            Err(e) => warn!(%user_id, kind, error = %e, "Failed to serialize notification"),
        }
        metrics::counter!("notifications_published_total", "kind" => kind).increment(1);

        if self.push.is_enabled() {
            self.push_to_subscriptions(user_id, &notification).await;
        }
    }

    async fn push_to_subscriptions(&self, user_id: Uuid, notification: &Notification) {
        let subscriptions = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user.value.push_subscriptions,
            Ok(None) => return,
            Err(e) => {
                warn!(%user_id, error = %e, "Failed to load push subscriptions");
                return;
            }
        };

        for subscription in &subscriptions {
            if let Err(e) = self.push.send(subscription, notification).await {
                warn!(%user_id, endpoint = %subscription.endpoint, error = %e, "Push delivery failed");
            }
        }
    }

    /// Register a push subscription; an existing endpoint is replaced
    pub async fn add_push_subscription(
        &self,
        user_id: Uuid,
        subscription: PushSubscription,
    ) -> Result<(), ApiError> {
        if subscription.endpoint.trim().is_empty() {
            return Err(ApiError::Validation("Subscription endpoint is required".to_string()));
        }

        self.users
            .update_with(user_id, |user| {
                user.push_subscriptions
                    .retain(|s| s.endpoint != subscription.endpoint);
                user.push_subscriptions.push(subscription);
                Ok::<_, ApiError>(())
            })
            .await?;

        info!(%user_id, "Push subscription registered");
        Ok(())
    }

    /// Remove a push subscription by endpoint
    pub async fn remove_push_subscription(&self, user_id: Uuid, endpoint: &str) -> Result<(), ApiError> {
        self.users
            .update_with(user_id, |user| {
                let before = user.push_subscriptions.len();
                user.push_subscriptions.retain(|s| s.endpoint != endpoint);
                if user.push_subscriptions.len() == before {
                    return Err(ApiError::NotFound("Push subscription not found".to_string()));
                }
                Ok(())
            })
            .await
    }
}
