pub mod config;
pub mod message_id;
pub mod messages;
