use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// Customer/seller conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(flatten, with = "de::record_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub participants: Vec<String>,
    #[serde(default, alias = "lastMessage")]
    pub last_message: Option<String>,
    #[serde(default, alias = "unreadCount")]
    pub unread_count: u32,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(flatten, with = "de::record_id")]
    pub id: String,
    #[serde(default, alias = "conversationId", deserialize_with = "de::opt_id")]
    pub conversation_id: Option<String>,
    #[serde(alias = "senderId", alias = "sender", deserialize_with = "de::id")]
    pub sender_id: String,
    pub content: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read: bool,
}
