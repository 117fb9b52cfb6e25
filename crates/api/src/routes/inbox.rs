use axum::{Json, extract::State};
use bson::oid::ObjectId;
use sellerdesk_services::messaging::{Message, ProductSnapshot, Thread, ThreadMessage};
use sellerdesk_services::messaging::inbox::format_date;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::{
        auth::{AuthUser, MaybeAuthUser},
        json::JsonBody,
        nonce::NonceCheckedUser,
    },
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ThreadRequest {
    pub counterpart_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub receiver_id: String,
    pub message: String,
    pub product_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub message_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub counterpart_id: String,
    pub counterpart_name: String,
    pub counterpart_avatar: Option<String>,
    pub latest_message: String,
    pub latest_message_id: String,
    pub latest_date: String,
    pub latest_date_formatted: String,
    pub message_count: usize,
    pub is_unread: bool,
    pub product: Option<ProductSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
    pub content: String,
    pub product_id: Option<String>,
    pub is_read: bool,
    pub is_current_user: bool,
    pub date: String,
    pub date_formatted: String,
}

fn parse_id(field: &str, value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value.trim())
        .map_err(|_| ApiError::Validation(format!("{field}: not a valid id")))
}

fn thread_response(thread: Thread) -> ThreadResponse {
    ThreadResponse {
        counterpart_id: thread.counterpart_id.to_hex(),
        counterpart_name: thread.counterpart_name,
        counterpart_avatar: thread.counterpart_avatar,
        latest_message: thread.latest_message,
        latest_message_id: thread.latest_message_id.to_hex(),
        latest_date: thread.latest_date,
        latest_date_formatted: thread.latest_date_formatted,
        message_count: thread.message_count,
        is_unread: thread.is_unread,
        product: thread.product,
    }
}

fn message_response(message: Message, viewer: ObjectId) -> MessageResponse {
    let (date, date_formatted) = format_date(message.created_at);
    MessageResponse {
        id: message.id.to_hex(),
        sender_id: message.sender_id.to_hex(),
        receiver_id: message.receiver_id.to_hex(),
        sender_name: None,
        sender_avatar: None,
        content: message.content,
        product_id: message.product_ref.map(|p| p.to_hex()),
        is_read: message.is_read,
        is_current_user: message.sender_id == viewer,
        date,
        date_formatted,
    }
}

fn thread_message_response(entry: ThreadMessage, viewer: ObjectId) -> MessageResponse {
    MessageResponse {
        sender_name: Some(entry.sender_name),
        sender_avatar: entry.sender_avatar,
        is_current_user: entry.is_current_user,
        date: entry.date,
        date_formatted: entry.date_formatted,
        ..message_response(entry.message, viewer)
    }
}

pub async fn get_inbox(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let inbox = state.inbox.build_inbox(auth.user_id).await?;
    let threads: Vec<ThreadResponse> = inbox.threads.into_iter().map(thread_response).collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "threads": threads,
        "unread_count": inbox.unread_count,
    })))
}

/// Returns the conversation and marks the caller's unread messages in it
/// as read.
pub async fn get_thread(
    State(state): State<AppState>,
    NonceCheckedUser(auth): NonceCheckedUser,
    JsonBody(body): JsonBody<ThreadRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let counterpart = parse_id("counterpart_id", &body.counterpart_id)?;
    let view = state.inbox.open_thread(auth.user_id, counterpart).await?;
    let messages: Vec<MessageResponse> = view
        .messages
        .into_iter()
        .map(|entry| thread_message_response(entry, auth.user_id))
        .collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "messages": messages,
        "product": view.product,
    })))
}

pub async fn send_reply(
    State(state): State<AppState>,
    NonceCheckedUser(auth): NonceCheckedUser,
    JsonBody(body): JsonBody<ReplyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let receiver = parse_id("receiver_id", &body.receiver_id)?;
    // Clients send "" or "0" when the reply is not about a product.
    let product = match body.product_id.as_deref().map(str::trim) {
        None | Some("") | Some("0") => None,
        Some(id) => Some(parse_id("product_id", id)?),
    };

    let message = state
        .inbox
        .send_reply(auth.user_id, receiver, &body.message, product)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": message_response(message, auth.user_id),
    })))
}

pub async fn mark_thread_read(
    State(state): State<AppState>,
    NonceCheckedUser(auth): NonceCheckedUser,
    JsonBody(body): JsonBody<MarkReadRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ids = body
        .message_ids
        .iter()
        .map(|id| parse_id("message_ids", id))
        .collect::<Result<Vec<_>, _>>()?;

    let marked_read = state.inbox.mark_thread_read(auth.user_id, &ids).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "marked_read": marked_read,
    })))
}

/// Polled by the dashboard badge. Anonymous callers get zero.
pub async fn get_unread_count(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = state
        .counter
        .unread_count_for(auth.map(|a| a.user_id))
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": count,
    })))
}
