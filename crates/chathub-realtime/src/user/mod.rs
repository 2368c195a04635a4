//! Per-identity user actors and the connected-users pool.

pub mod handle;
pub mod pool;
pub mod request;
pub mod worker;

pub use handle::UserHandle;
pub use pool::ConnectedUsersPool;
pub use request::ActionRequest;
