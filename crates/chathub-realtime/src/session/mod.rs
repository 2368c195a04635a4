//! Session transport seam and the per-connection supervisor.

pub mod supervisor;
pub mod transport;

pub use supervisor::SessionSupervisor;
pub use transport::{Session, SessionTransport};
