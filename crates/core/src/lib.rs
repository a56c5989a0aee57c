//! Storebot Core - deterministic support-chat pipeline
//!
//! This crate is the "brain" of storebot - the request pipeline that:
//! - Decides whether a customer message is order-related (keyword intent)
//! - Pulls loosely-formatted order identifiers out of free text
//! - Renders a heterogeneous order record into a stable, readable summary
//! - Plans the reply per message (clarify / lookup / delegate to chat)
//!
//! # Architecture
//!
//! The pipeline is a constrained, strictly sequential loop per request:
//! 1. **Intent** (`intent`) - keyword match against a fixed vocabulary
//! 2. **Identifiers** (`identifiers`) - regex extraction of order id/number
//! 3. **Planning** (`conversation`) - choose one of three reply strategies
//! 4. **Execution** (`handler`) - call collaborators, format the reply
//!
//! # Key Types
//!
//! - `ChatHandler` - Main orchestrator (see `handler` module)
//! - `ChatClient` / `OrderLookup` - Pluggable collaborator traits
//! - `ReplyPlan` - The three-way routing decision
//!
//! # Safety Principle
//!
//! The LLM never sees or invents order data. Order lookups and summaries
//! are deterministic; the model only handles general conversation and is
//! never asked to phrase the identifier clarification.

pub mod config;
pub mod conversation;
pub mod domain;
pub mod errors;
pub mod handler;
pub mod identifiers;
pub mod intent;
pub mod summary;

pub use conversation::{plan_reply, with_system_prompt, ReplyPlan};
pub use domain::message::{ChatMessage, IncomingBody, Role};
pub use domain::order::{Customer, Fulfillment, LineItem, OrderLookupResponse, OrderRecord};
pub use errors::HandlerError;
pub use handler::{ChatClient, ChatHandler, OrderLookup};
pub use identifiers::{extract_identifiers, ExtractedIdentifiers};
pub use intent::is_order_related;
pub use summary::format_order_summary;
