//! join-notify — email channel subscribers when someone joins.

pub mod cli;
pub mod config;
pub mod error;
pub mod identifier;
pub mod mailer;
pub mod notify;
pub mod plugin;
pub mod store;
pub mod template;
pub mod validate;
