//! Polymarket real-time data service (RTDS) client

pub mod types;
pub mod websocket;

pub use types::{PriceTick, StreamEvent, SubscribeRequest};
pub use websocket::RtdsStream;
