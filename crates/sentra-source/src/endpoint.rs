use serde::Deserialize;

use sentra_fetch::{AuthScheme, Credentials};

use crate::asf::AsfEndpoint;
use crate::error::SourceError;
use crate::esa::EsaEndpoint;
use crate::product::ProductRecord;

/// Which provider family an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    EsaCatalog,
    AsfArchive,
}

/// A configured provider, one variant per family.
///
/// Each variant owns its URL template and its authentication scheme.
/// Endpoints are constructed once per session from injected credentials;
/// there is no process-wide client state.
#[derive(Debug, Clone)]
pub enum ProviderEndpoint {
    EsaCatalog(EsaEndpoint),
    AsfArchive(AsfEndpoint),
}

impl ProviderEndpoint {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderEndpoint::EsaCatalog(_) => ProviderKind::EsaCatalog,
            ProviderEndpoint::AsfArchive(_) => ProviderKind::AsfArchive,
        }
    }

    /// Short label for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderEndpoint::EsaCatalog(_) => "ESA catalog",
            ProviderEndpoint::AsfArchive(_) => "ASF archive",
        }
    }

    /// Build the full-product download URL for a record.
    pub fn download_url(&self, record: &ProductRecord) -> Result<String, SourceError> {
        match self {
            ProviderEndpoint::EsaCatalog(esa) => esa.product_url(record),
            ProviderEndpoint::AsfArchive(asf) => asf.product_url(record),
        }
    }

    /// Build the preview download URL for a record.
    ///
    /// Only the ESA catalog serves quicklooks; requesting one from the
    /// archive provider is a routing mistake, not a transport failure.
    pub fn preview_url(&self, record: &ProductRecord) -> Result<String, SourceError> {
        match self {
            ProviderEndpoint::EsaCatalog(esa) => esa.quicklook_url(record),
            ProviderEndpoint::AsfArchive(_) => Err(SourceError::UnsupportedProductType(
                "preview downloads are only available from the ESA catalog".to_string(),
            )),
        }
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        match self {
            ProviderEndpoint::EsaCatalog(_) => AuthScheme::Basic,
            ProviderEndpoint::AsfArchive(_) => AuthScheme::SignedRedirect,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        match self {
            ProviderEndpoint::EsaCatalog(esa) => esa.credentials(),
            ProviderEndpoint::AsfArchive(asf) => asf.credentials(),
        }
    }
}
