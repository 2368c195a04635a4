//! Named channels and the channel registry.

pub mod channel;
pub mod registry;

pub use channel::Channel;
pub use registry::ChannelRegistry;
