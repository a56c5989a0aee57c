use crate::domain::message::{latest_user_text, ChatMessage};
use crate::identifiers::extract_identifiers;
use crate::intent::is_order_related;

/// Instructions sent as message 0 on every delegated completion.
pub const SYSTEM_PROMPT: &str = "You are a helpful support assistant for an online storefront.\n\
IMPORTANT:\n\
- Reply in the same language the customer is using.\n\
- Keep answers concise and clear.\n\
- If the user asks about order status/details/tracking/refund, ask for their Order ID \
(a long number) OR their Order Number like #1001 if you don't have it yet.\n\
- When order data is provided to you, summarize the key details (financial status, \
fulfillment status, shipping/tracking if present, items, total, created date) and ask \
any missing follow-up questions.\n\
- Never reveal API keys or access tokens.";

/// Deterministic clarification for order questions with no identifier. This
/// is intentionally not model-generated, so the prompt for identifiers can
/// never be hallucinated away.
pub const ASK_FOR_IDENTIFIER_REPLY: &str = "To help with your order, please share your Order ID \
                                            (long number) or Order Number like #1001.";

pub const NO_ORDER_FOUND_REPLY: &str =
    "No order was found with that ID/number. Please double-check and try again.";

/// Shown when the chat backend answers with empty text.
pub const EMPTY_COMPLETION_REPLY: &str = "Sorry — I couldn't generate a response right now.";

/// The three reply strategies. Exactly one is chosen per incoming request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyPlan {
    /// Order-related message with no usable identifier: answer with the
    /// fixed clarification text.
    AskForIdentifier,
    /// Order-related message carrying at least one identifier: look the
    /// order up and render a summary. The executor prefers `order_id` when
    /// both are present, since it is the more specific key.
    LookupOrder { order_id: Option<String>, order_number: Option<String> },
    /// Everything else goes to the chat backend with the full history.
    DelegateToChat,
}

/// Decide the reply strategy for the latest user turn. A history without a
/// user turn delegates to chat.
pub fn plan_reply(history: &[ChatMessage]) -> ReplyPlan {
    let Some(text) = latest_user_text(history) else {
        return ReplyPlan::DelegateToChat;
    };

    if !is_order_related(text) {
        return ReplyPlan::DelegateToChat;
    }

    let identifiers = extract_identifiers(text);
    if identifiers.is_empty() {
        return ReplyPlan::AskForIdentifier;
    }

    ReplyPlan::LookupOrder {
        order_id: identifiers.order_id,
        order_number: identifiers.order_number,
    }
}

/// History with the system prompt prepended as message 0. The caller always
/// passes raw history, so the prompt is never duplicated.
pub fn with_system_prompt(history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    messages.extend_from_slice(history);
    messages
}
