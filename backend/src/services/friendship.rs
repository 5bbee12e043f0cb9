//! Friend requests and friendships
//!
//! A pending request is stored on the receiving user. Accepting it adds
//! each user to the other's friend list; the two documents are written one
//! after the other, each under its own version check.

use super::notification::NotificationService;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use chrono::Utc;
use tracing::info;
use training_tracker_shared::{FriendRequest, NotificationEvent, UserSummary};
use uuid::Uuid;

pub struct FriendshipService;

impl FriendshipService {
    /// Send a friend request to the user registered under `email`
    pub async fn send_request(
        users: &UserRepository,
        notifications: &NotificationService,
        user_id: Uuid,
        email: &str,
    ) -> Result<UserSummary, ApiError> {
        let sender = users.get(user_id).await?.value;
        let target = users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::NotFound("No user with that email".to_string()))?
            .value;

        if target.id == sender.id {
            return Err(ApiError::Validation(
                "You cannot send a friend request to yourself".to_string(),
            ));
        }
        if sender.is_friend(target.id) {
            return Err(ApiError::Conflict("You are already friends".to_string()));
        }
        if sender.has_request_from(target.id) {
            return Err(ApiError::Conflict(
                "This user already sent you a friend request".to_string(),
            ));
        }

        let request = FriendRequest {
            from: sender.id,
            username: sender.username.clone(),
            sent_at: Utc::now(),
        };
        users
            .update_with(target.id, |doc| {
                if doc.has_request_from(sender.id) {
                    return Err(ApiError::Conflict("Friend request already sent".to_string()));
                }
                doc.friend_requests.push(request);
                Ok(())
            })
            .await?;

        info!(from = %sender.id, to = %target.id, "Friend request sent");
        notifications
            .notify(
                target.id,
                NotificationEvent::FriendRequestReceived {
                    from: sender.id,
                    username: sender.username.clone(),
                },
            )
            .await;

        Ok(target.summary())
    }

    /// Incoming friend requests
    pub async fn list_requests(users: &UserRepository, user_id: Uuid) -> Result<Vec<FriendRequest>, ApiError> {
        Ok(users.get(user_id).await?.value.friend_requests)
    }

    /// Accept the request `from` sent to `user_id`
    pub async fn accept(
        users: &UserRepository,
        notifications: &NotificationService,
        user_id: Uuid,
        from: Uuid,
    ) -> Result<UserSummary, ApiError> {
        let requester = users
            .find_by_id(from)
            .await?
            .ok_or_else(|| ApiError::NotFound("Friend request not found".to_string()))?
            .value;

        let username = users
            .update_with(user_id, |doc| {
                take_request(&mut doc.friend_requests, from)?;
                if !doc.is_friend(from) {
                    doc.friends.push(from);
                }
                Ok::<_, ApiError>(doc.username.clone())
            })
            .await?;

        users
            .update_with(from, |doc| {
                if !doc.is_friend(user_id) {
                    doc.friends.push(user_id);
                }
                // a crossed request from us is settled too
                doc.friend_requests.retain(|r| r.from != user_id);
                Ok::<_, ApiError>(())
            })
            .await?;

        info!(%user_id, friend = %from, "Friend request accepted");
        notifications
            .notify(from, NotificationEvent::FriendRequestAccepted { by: user_id, username })
            .await;

        Ok(requester.summary())
    }

    /// Decline the request `from` sent to `user_id`
    pub async fn decline(users: &UserRepository, user_id: Uuid, from: Uuid) -> Result<(), ApiError> {
        users
            .update_with(user_id, |doc| take_request(&mut doc.friend_requests, from))
            .await?;
        info!(%user_id, declined = %from, "Friend request declined");
        Ok(())
    }

    /// Friends of a user; friends whose account is gone are skipped
    pub async fn list_friends(users: &UserRepository, user_id: Uuid) -> Result<Vec<UserSummary>, ApiError> {
        let user = users.get(user_id).await?.value;
        let mut friends = Vec::with_capacity(user.friends.len());
        for friend_id in user.friends {
            if let Some(friend) = users.find_by_id(friend_id).await? {
                friends.push(friend.value.summary());
            }
        }
        Ok(friends)
    }

    /// End a friendship on both sides
    pub async fn remove_friend(users: &UserRepository, user_id: Uuid, friend_id: Uuid) -> Result<(), ApiError> {
        users
            .update_with(user_id, |doc| {
                if !doc.is_friend(friend_id) {
                    return Err(ApiError::NotFound("Friend not found".to_string()));
                }
                doc.friends.retain(|f| *f != friend_id);
                Ok(())
            })
            .await?;

        if users.find_by_id(friend_id).await?.is_some() {
            users
                .update_with(friend_id, |doc| {
                    doc.friends.retain(|f| *f != user_id);
                    Ok::<_, ApiError>(())
                })
                .await?;
        }

        info!(%user_id, %friend_id, "Friend removed");
        Ok(())
    }
}

fn take_request(requests: &mut Vec<FriendRequest>, from: Uuid) -> Result<FriendRequest, ApiError> {
    let index = requests
        .iter()
        .position(|r| r.from == from)
        .ok_or_else(|| ApiError::NotFound("Friend request not found".to_string()))?;
    Ok(requests.remove(index))
}
