//! In-process presence bookkeeping.
//!
//! State is local to one server process. Running several instances behind a
//! load balancer needs a shared pub/sub backplane, which is not provided here.

mod registry;
mod rooms;

pub use registry::InMemoryConnectionRegistry;
pub use rooms::InMemoryRoomMembership;
