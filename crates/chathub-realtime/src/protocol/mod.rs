//! Wire protocol: JSON frames and typed request payloads.

pub mod frames;
pub mod requests;

pub use frames::{ChannelUserChange, SocketFrame};
pub use requests::{parse_request, ChannelRequest, LoginRequest, SendMessageRequest, UserAction};
