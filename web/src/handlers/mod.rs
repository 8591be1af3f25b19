//! HTTP and WebSocket handlers.
//!
//! Both transports call the same engine; they differ only in framing and
//! in how errors travel back to the caller.

pub mod detect;
pub mod websocket;
