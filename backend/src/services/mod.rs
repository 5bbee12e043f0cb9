//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, timers and notification delivery.

pub mod friendship;
pub mod notification;
pub mod rest_timer;
pub mod statistics;
pub mod timeout;
pub mod training_plan;
pub mod user;

pub use friendship::FriendshipService;
pub use notification::{NotificationHub, NotificationService, PushGateway};
pub use rest_timer::RestTimerService;
pub use statistics::StatisticsService;
pub use timeout::InactivityTimeoutManager;
pub use training_plan::TrainingPlanService;
pub use user::UserService;
