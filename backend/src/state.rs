//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything here is built once at startup and cloned per request; all
//! fields are `Arc`s or wrap `Arc`s.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::dao::DocumentStore;
use crate::repositories::UserRepository;
use crate::services::{NotificationHub, NotificationService, PushGateway, RestTimerService};
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use training_tracker_shared::TrainingPlanDtoMapper;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store backing all repositories
    pub store: Arc<dyn DocumentStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub users: UserRepository,
    pub notifications: NotificationService,
    pub rest_timers: RestTimerService,
    /// Plan card/edit projections with the configured date format
    pub plan_mapper: Arc<TrainingPlanDtoMapper>,
    /// Prometheus exporter; absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// This pre-computes JWT keys and builds the HTTP client for the push
    /// relay, so it should only be called once at application startup.
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Result<Self> {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );

        let users = UserRepository::new(Arc::clone(&store));
        let push = PushGateway::new(&config.push)?;
        let notifications = NotificationService::new(NotificationHub::new(), push, users.clone());
        let rest_timers = RestTimerService::new(notifications.clone(), config.rest_timer.max_pause_secs);
        let plan_mapper = Arc::new(TrainingPlanDtoMapper::new(config.date_formatter()));

        Ok(Self {
            store,
            config: Arc::new(config),
            jwt,
            users,
            notifications,
            rest_timers,
            plan_mapper,
            metrics: None,
        })
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    #[inline]
    pub fn plan_mapper(&self) -> &TrainingPlanDtoMapper {
        &self.plan_mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::InMemoryDocumentStore;

    fn state(config: AppConfig) -> AppState {
        AppState::new(Arc::new(InMemoryDocumentStore::new()), config).unwrap()
    }

    #[tokio::test]
    async fn test_jwt_service_is_precomputed() {
        let state = state(AppConfig::default());
        let user_id = uuid::Uuid::new_v4();
        let token = state.jwt().generate_access_token(user_id).unwrap();
        assert_eq!(state.jwt().validate_access_token(&token).unwrap().sub, user_id);
    }

    #[tokio::test]
    async fn test_mapper_uses_configured_date_format() {
        let mut config = AppConfig::default();
        config.display.date_format = "%Y/%m/%d".to_string();
        let state = state(config);
        assert_eq!(state.plan_mapper().formatter().pattern(), "%Y/%m/%d");
        assert!(state.metrics.is_none());
    }
}
