//! The chat endpoint: one customer request in, one reply (or error) out.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use storebot_core::domain::message::IncomingBody;
use storebot_core::handler::{ChatClient, ChatHandler, OrderLookup};
use storebot_core::HandlerError;

pub struct ChatState<C, O> {
    pub handler: ChatHandler<C, O>,
}

/// Wire response: exactly one of `reply` or `error`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatResponseBody {
    Reply { reply: String },
    Error { error: String },
}

pub fn router<C, O>(state: Arc<ChatState<C, O>>) -> Router
where
    C: ChatClient + 'static,
    O: OrderLookup + 'static,
{
    Router::new().route("/api/chat", post(chat)).with_state(state)
}

pub async fn chat<C, O>(
    State(state): State<Arc<ChatState<C, O>>>,
    Json(body): Json<IncomingBody>,
) -> (StatusCode, Json<ChatResponseBody>)
where
    C: ChatClient,
    O: OrderLookup,
{
    let correlation_id = Uuid::new_v4().to_string();
    let history = body.into_history();

    match state.handler.handle(&history).await {
        Ok(reply) => {
            info!(
                event_name = "chat.request_completed",
                correlation_id = %correlation_id,
                turns = history.len(),
                "chat request completed"
            );
            (StatusCode::OK, Json(ChatResponseBody::Reply { reply }))
        }
        Err(error) => {
            let status = match &error {
                HandlerError::Input(_) => StatusCode::BAD_REQUEST,
                HandlerError::Collaborator { .. } => StatusCode::BAD_GATEWAY,
            };
            error!(
                event_name = "chat.request_failed",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                error = %error,
                "chat request failed"
            );
            (status, Json(ChatResponseBody::Error { error: error.to_string() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use axum::{extract::State, http::StatusCode, response::Json};

    use storebot_core::domain::message::{ChatMessage, IncomingBody, IncomingMessage};
    use storebot_core::domain::order::{OrderLookupResponse, OrderRecord};
    use storebot_core::handler::{ChatClient, ChatHandler, OrderLookup};

    use super::{chat, ChatResponseBody, ChatState};

    struct FixedChat(Result<&'static str, &'static str>);

    #[async_trait]
    impl ChatClient for FixedChat {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(detail) => Err(anyhow!("{detail}")),
            }
        }
    }

    struct FixedOrders(Option<&'static str>);

    #[async_trait]
    impl OrderLookup for FixedOrders {
        async fn order_by_id(&self, _id: &str) -> Result<OrderLookupResponse> {
            Ok(self.response())
        }

        async fn orders_by_number(&self, _number: &str) -> Result<OrderLookupResponse> {
            Ok(self.response())
        }
    }

    impl FixedOrders {
        fn response(&self) -> OrderLookupResponse {
            OrderLookupResponse {
                order: self.0.map(|name| OrderRecord {
                    name: Some(name.to_string()),
                    ..Default::default()
                }),
                orders: None,
            }
        }
    }

    fn state(
        chat: FixedChat,
        orders: FixedOrders,
    ) -> State<Arc<ChatState<FixedChat, FixedOrders>>> {
        State(Arc::new(ChatState { handler: ChatHandler::new(chat, orders) }))
    }

    fn single_message(text: &str) -> IncomingBody {
        IncomingBody { message: Some(text.to_string()), messages: None }
    }

    #[tokio::test]
    async fn empty_body_maps_to_bad_request() {
        let (status, Json(body)) =
            chat(state(FixedChat(Ok("hi")), FixedOrders(None)), Json(IncomingBody::default()))
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(matches!(body, ChatResponseBody::Error { .. }));
    }

    #[tokio::test]
    async fn delegated_reply_maps_to_ok() {
        let (status, Json(body)) = chat(
            state(FixedChat(Ok("We are open all week.")), FixedOrders(None)),
            Json(single_message("what are your store hours?")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ChatResponseBody::Reply { reply } = body else { panic!("expected reply") };
        assert_eq!(reply, "We are open all week.");
    }

    #[tokio::test]
    async fn order_summary_comes_back_as_reply() {
        let (status, Json(body)) = chat(
            state(FixedChat(Ok("unused")), FixedOrders(Some("#1042"))),
            Json(single_message("where is order #1042?")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ChatResponseBody::Reply { reply } = body else { panic!("expected reply") };
        assert!(reply.starts_with("Order: #1042"));
    }

    #[tokio::test]
    async fn collaborator_failure_maps_to_bad_gateway() {
        let (status, Json(body)) = chat(
            state(FixedChat(Err("HTTP 503: upstream down")), FixedOrders(None)),
            Json(single_message("hello")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let ChatResponseBody::Error { error } = body else { panic!("expected error") };
        assert!(error.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn message_list_body_is_accepted() {
        let (status, Json(body)) = chat(
            state(FixedChat(Ok("hello back")), FixedOrders(None)),
            Json(IncomingBody {
                message: None,
                messages: Some(vec![IncomingMessage {
                    role: Some("user".to_string()),
                    content: Some("hi there".to_string()),
                }]),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(matches!(body, ChatResponseBody::Reply { .. }));
    }
}
