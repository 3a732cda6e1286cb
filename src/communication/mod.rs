pub mod messages;
pub mod stream_client;
