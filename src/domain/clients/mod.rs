//! Client traits for the pipeline's external collaborators.
//!
//! Implementations live in `crate::infrastructure::http`. Mock
//! implementations are generated via `mockall` for unit tests.

pub mod link_probe;
pub mod lookup_client;

pub use link_probe::LinkProbe;
pub use lookup_client::LookupClient;

#[cfg(test)]
pub use link_probe::MockLinkProbe;
#[cfg(test)]
pub use lookup_client::MockLookupClient;
