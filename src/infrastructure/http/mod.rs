//! HTTP integrations for the network and lookup boundaries.
//!
//! - [`ReqwestProbe`] / [`HttpLookupClient`] - production clients over `reqwest`
//! - [`OfflineProbe`] / [`OfflineLookupClient`] - offline clients for test mode

mod lookup;
mod probe;

pub use lookup::{HttpLookupClient, OfflineLookupClient};
pub use probe::{OfflineProbe, ReqwestProbe, build_http_client};
