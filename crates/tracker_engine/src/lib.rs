//! Job tracker engine: the remote gateway and the sync engine that drives
//! the core state machine against it.
mod gateway;
mod sync;
mod types;

pub use gateway::{Gateway, GatewaySettings, ReqwestGateway, DEFAULT_BASE_URL};
pub use sync::SyncEngine;
pub use types::{ErrorKind, FailureKind, GatewayError, MutationOutcome};
