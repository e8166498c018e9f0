// ABOUTME: Channel module — the real-time WebSocket link to the support backend.
// ABOUTME: Client lifecycle lives in `client`, the JSON frame format in `frame`.

pub mod client;
pub mod frame;

pub use client::{
    ChannelClient, ChannelError, ChannelEvent, ChannelEvents, ConnectionState, channel_url,
};
pub use frame::{ChatMessage, SenderType};
