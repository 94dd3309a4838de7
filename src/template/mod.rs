//! Notification templates.
//!
//! This module provides:
//! - Template and message definitions with `{{variable}}` placeholders
//! - Activation rules deciding which messages fire for a payload
//! - The `TemplateStore` lookup contract and an in-memory implementation
//! - Variable substitution for rendering message content
//!
//! # Example
//!
//! ```ignore
//! let store = InMemoryTemplateStore::new();
//!
//! store.create(Template::new(
//!     "order.shipped",
//!     vec![
//!         Message::new(ChannelType::Email, "Order {{order_id}} is on its way")
//!             .with_subject("Your order has shipped"),
//!         Message::new(ChannelType::Sms, "Order {{order_id}} shipped")
//!             .with_activation(Activation::Present { field: "$phone".into() }),
//!     ],
//! ))?;
//! ```

mod store;
mod substitution;
mod types;

pub use store::{InMemoryTemplateStore, TemplateStore};
pub use substitution::{lookup_path, render};
pub use types::{
    Activation, ChannelType, Message, Template, TemplateError, TemplateResult, TriggerPayload,
};
