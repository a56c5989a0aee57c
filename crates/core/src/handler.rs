use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::conversation::{
    plan_reply, with_system_prompt, ReplyPlan, ASK_FOR_IDENTIFIER_REPLY, EMPTY_COMPLETION_REPLY,
    NO_ORDER_FOUND_REPLY,
};
use crate::domain::message::ChatMessage;
use crate::domain::order::OrderLookupResponse;
use crate::errors::HandlerError;
use crate::summary::format_order_summary;

/// Chat-completion collaborator. One attempt per request; failure is the
/// request's failure.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Order-lookup collaborator over the order API's two query shapes.
#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn order_by_id(&self, id: &str) -> Result<OrderLookupResponse>;
    async fn orders_by_number(&self, number: &str) -> Result<OrderLookupResponse>;
}

/// Per-request orchestrator: plan the reply strategy, execute it against
/// the collaborators, and produce one reply text. Stateless across
/// requests; strictly sequential within one.
pub struct ChatHandler<C, O> {
    chat: C,
    orders: O,
}

impl<C, O> ChatHandler<C, O>
where
    C: ChatClient,
    O: OrderLookup,
{
    pub fn new(chat: C, orders: O) -> Self {
        Self { chat, orders }
    }

    pub async fn handle(&self, history: &[ChatMessage]) -> Result<String, HandlerError> {
        if history.is_empty() {
            return Err(HandlerError::input(
                "missing 'message' (or 'messages') in request body",
            ));
        }

        let plan = plan_reply(history);
        debug!(event_name = "chat.reply_planned", plan = ?plan, turns = history.len());

        let reply = match plan {
            ReplyPlan::AskForIdentifier => ASK_FOR_IDENTIFIER_REPLY.to_string(),
            ReplyPlan::LookupOrder { order_id, order_number } => {
                self.execute_lookup(order_id.as_deref(), order_number.as_deref()).await?
            }
            ReplyPlan::DelegateToChat => {
                let messages = with_system_prompt(history);
                self.chat
                    .complete(&messages)
                    .await
                    .map_err(|source| HandlerError::collaborator("chat-completion", source))?
            }
        };

        let reply = reply.trim().to_string();
        if reply.is_empty() {
            return Ok(EMPTY_COMPLETION_REPLY.to_string());
        }
        Ok(reply)
    }

    /// The order id is the more specific key, so it wins when both
    /// identifiers were extracted.
    async fn execute_lookup(
        &self,
        order_id: Option<&str>,
        order_number: Option<&str>,
    ) -> Result<String, HandlerError> {
        let response = match (order_id, order_number) {
            (Some(id), _) => self.orders.order_by_id(id).await,
            (None, Some(number)) => self.orders.orders_by_number(number).await,
            (None, None) => return Ok(NO_ORDER_FOUND_REPLY.to_string()),
        }
        .map_err(|source| HandlerError::collaborator("order-lookup", source))?;

        match response.into_order() {
            Some(order) => Ok(format_order_summary(&order)),
            None => Ok(NO_ORDER_FOUND_REPLY.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::{ChatClient, ChatHandler, OrderLookup};
    use crate::conversation::{ASK_FOR_IDENTIFIER_REPLY, EMPTY_COMPLETION_REPLY, NO_ORDER_FOUND_REPLY};
    use crate::domain::message::{ChatMessage, Role};
    use crate::domain::order::{OrderLookupResponse, OrderRecord};
    use crate::errors::HandlerError;

    struct ScriptedChat {
        reply: Result<String>,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedChat {
        fn replying(text: &str) -> Self {
            Self { reply: Ok(text.to_string()), seen: Mutex::new(Vec::new()) }
        }

        fn failing(detail: &str) -> Self {
            Self { reply: Err(anyhow!("{detail}")), seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl ChatClient for ScriptedChat {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.seen.lock().expect("lock").extend_from_slice(messages);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(error) => Err(anyhow!("{error}")),
            }
        }
    }

    #[derive(Default)]
    struct ScriptedOrders {
        record: Option<OrderRecord>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedOrders {
        fn with_order(name: &str) -> Self {
            Self {
                record: Some(OrderRecord { name: Some(name.to_string()), ..Default::default() }),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OrderLookup for ScriptedOrders {
        async fn order_by_id(&self, id: &str) -> Result<OrderLookupResponse> {
            self.calls.lock().expect("lock").push(format!("by_id:{id}"));
            Ok(OrderLookupResponse { order: self.record.clone(), orders: None })
        }

        async fn orders_by_number(&self, number: &str) -> Result<OrderLookupResponse> {
            self.calls.lock().expect("lock").push(format!("by_number:{number}"));
            Ok(OrderLookupResponse {
                order: None,
                orders: Some(self.record.clone().into_iter().collect()),
            })
        }
    }

    fn user(text: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::user(text)]
    }

    #[tokio::test]
    async fn empty_history_is_an_input_error() {
        let handler = ChatHandler::new(ScriptedChat::replying("hi"), ScriptedOrders::default());
        let error = handler.handle(&[]).await.expect_err("input error");
        assert!(matches!(error, HandlerError::Input(_)));
    }

    #[tokio::test]
    async fn non_order_message_is_delegated_with_system_prompt() {
        let chat = ScriptedChat::replying("You can reset it from the login page.");
        let handler = ChatHandler::new(chat, ScriptedOrders::default());

        let reply = handler
            .handle(&user("hi, how do I reset my password?"))
            .await
            .expect("delegated reply");
        assert_eq!(reply, "You can reset it from the login page.");

        let seen = handler.chat.seen.lock().expect("lock");
        assert_eq!(seen[0].role, Role::System);
        assert_eq!(seen[1].content, "hi, how do I reset my password?");
        assert!(handler.orders.calls.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn order_question_without_identifier_gets_fixed_clarification() {
        let chat = ScriptedChat::replying("model text that must not be used");
        let handler = ChatHandler::new(chat, ScriptedOrders::default());

        let reply =
            handler.handle(&user("what's the status of my order?")).await.expect("clarification");
        assert_eq!(reply, ASK_FOR_IDENTIFIER_REPLY);
        assert!(handler.chat.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn lookup_by_number_renders_summary() {
        let handler =
            ChatHandler::new(ScriptedChat::replying("unused"), ScriptedOrders::with_order("#1042"));

        let reply = handler.handle(&user("where is order #1042?")).await.expect("summary");
        assert!(reply.starts_with("Order: #1042"));
        assert_eq!(handler.orders.calls.lock().expect("lock").as_slice(), ["by_number:1042"]);
    }

    #[tokio::test]
    async fn order_id_wins_over_order_number() {
        let handler = ChatHandler::new(
            ScriptedChat::replying("unused"),
            ScriptedOrders::with_order("#1042"),
        );

        handler
            .handle(&user("order #1042, shopify id 5412345678"))
            .await
            .expect("summary");
        assert_eq!(
            handler.orders.calls.lock().expect("lock").as_slice(),
            ["by_id:5412345678"]
        );
    }

    #[tokio::test]
    async fn missing_order_degrades_to_not_found_reply() {
        let handler =
            ChatHandler::new(ScriptedChat::replying("unused"), ScriptedOrders::default());

        let reply = handler.handle(&user("track order #9999")).await.expect("reply, not error");
        assert_eq!(reply, NO_ORDER_FOUND_REPLY);
    }

    #[tokio::test]
    async fn chat_failure_surfaces_as_collaborator_error() {
        let handler = ChatHandler::new(
            ScriptedChat::failing("HTTP 503: upstream down"),
            ScriptedOrders::default(),
        );

        let error = handler.handle(&user("hello there")).await.expect_err("collaborator error");
        let message = error.to_string();
        assert!(message.starts_with("chat-completion request failed"));
        assert!(message.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn blank_completion_falls_back_to_fixed_reply() {
        let handler =
            ChatHandler::new(ScriptedChat::replying("   "), ScriptedOrders::default());

        let reply = handler.handle(&user("good morning")).await.expect("fallback");
        assert_eq!(reply, EMPTY_COMPLETION_REPLY);
    }
}
