//! Provider selection and product URL construction.
//!
//! Two provider families host the same logical products behind different
//! URL shapes and authentication schemes: the ESA catalog (OData paths
//! keyed by catalog UUID, Basic auth) and the ASF archive (paths derived
//! from the product name's structure, signed-redirect then Basic auth).
//!
//! A [`SourceRouter`] holds one endpoint per configured role. Selection
//! happens once per request from the request's preference label; there is
//! no mid-request failover. URL construction is attribute-driven and
//! fails fast on malformed product records rather than emitting a URL
//! that cannot work.

mod asf;
mod endpoint;
mod error;
mod esa;
mod product;
mod router;

pub use asf::{ASF_BASE_URL, AsfEndpoint};
pub use endpoint::{ProviderEndpoint, ProviderKind};
pub use error::SourceError;
pub use esa::{DHUS_BASE_URL, EsaEndpoint};
pub use product::ProductRecord;
pub use router::{ESA_MAX_CONCURRENT, SourcePreference, SourceRouter};
