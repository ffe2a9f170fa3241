//! Customer/seller messaging

use serde::Serialize;

use super::{segment, Access, ApiClient, ApiResult};
use crate::models::{Conversation, Message};

pub struct Chat<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartConversation<'r> {
    participant_id: &'r str,
}

#[derive(Serialize)]
struct SendMessage<'r> {
    content: &'r str,
}

impl<'a> Chat<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn conversations(&self) -> ApiResult<Vec<Conversation>> {
        self.client
            .get("/chat/conversations", Access::Authenticated)
            .await
    }

    /// Open (or reopen) a conversation with another user
    pub async fn start(&self, participant_id: &str) -> ApiResult<Conversation> {
        self.client
            .post(
                "/chat/conversations",
                &StartConversation { participant_id },
                Access::Authenticated,
            )
            .await
    }

    pub async fn messages(&self, conversation_id: &str) -> ApiResult<Vec<Message>> {
        self.client
            .get(
                &format!("/chat/conversations/{}/messages", segment(conversation_id)),
                Access::Authenticated,
            )
            .await
    }

    pub async fn send(&self, conversation_id: &str, content: &str) -> ApiResult<Message> {
        self.client
            .post(
                &format!("/chat/conversations/{}/messages", segment(conversation_id)),
                &SendMessage { content },
                Access::Authenticated,
            )
            .await
    }

    pub async fn mark_read(&self, conversation_id: &str) -> ApiResult<()> {
        let _: serde_json::Value = self
            .client
            .post_empty(
                &format!("/chat/conversations/{}/read", segment(conversation_id)),
                Access::Authenticated,
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_server::FakeBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_and_list_messages() {
        let backend = FakeBackend::new()
            .route(
                "POST",
                "/chat/conversations/c1/messages",
                201,
                json!({"_id": "m2", "conversationId": "c1", "senderId": "u1", "content": "Still available?"}),
            )
            .route(
                "GET",
                "/chat/conversations/c1/messages",
                200,
                json!([
                    {"_id": "m1", "senderId": "u2", "content": "Hello", "read": true},
                    {"_id": "m2", "senderId": "u1", "content": "Still available?"}
                ]),
            )
            .empty_route("POST", "/chat/conversations/c1/read", 204)
            .start()
            .await;
        let client = backend.signed_in_client("t").await;
        let chat = client.chat();

        let sent = chat.send("c1", "Still available?").await.unwrap();
        assert_eq!(sent.id, "m2");
        assert_eq!(
            backend.last_request().body.unwrap(),
            json!({"content": "Still available?"})
        );

        let messages = chat.messages("c1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].read);

        chat.mark_read("c1").await.unwrap();
    }

    #[tokio::test]
    async fn test_start_conversation() {
        let backend = FakeBackend::new()
            .route("POST", "/chat/conversations", 201, json!({"_id": "c9", "participants": ["u1", "s4"]}))
            .start()
            .await;
        let client = backend.signed_in_client("t").await;

        let conversation = client.chat().start("s4").await.unwrap();
        assert_eq!(conversation.participants, vec!["u1", "s4"]);
        assert_eq!(
            backend.last_request().body.unwrap(),
            json!({"participantId": "s4"})
        );
    }
}
