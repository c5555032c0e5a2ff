use sentra_fetch::Credentials;

use crate::error::SourceError;
use crate::product::ProductRecord;

/// Production base URL of the ASF datapool.
pub const ASF_BASE_URL: &str = "https://datapool.asf.alaska.edu";

/// The ASF archive: paths derived from the product name's structure.
///
/// An example download URL, piece by piece:
///
/// ```text
/// https://datapool.asf.alaska.edu   base
/// /GRD_HS                           product type, resolution High, Single pol
/// /SB                               platform Sentinel-1B
/// /S1B_IW_GRDH_1SSV_20161014T012841_20161014T012906_002496_00435F_BB18.zip
/// ```
///
/// The advertised URL redirects to a signed data URL, which is the one
/// that accepts the account's Basic auth.
#[derive(Debug, Clone)]
pub struct AsfEndpoint {
    base_url: String,
    credentials: Credentials,
}

impl AsfEndpoint {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(ASF_BASE_URL, credentials)
    }

    /// Point at a different deployment (tests).
    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// URL of the full product archive.
    pub fn product_url(&self, record: &ProductRecord) -> Result<String, SourceError> {
        let platform = platform_code(&record.name)?;
        let type_segment = type_segment(record)?;
        Ok(format!(
            "{}/{}/{}/{}.zip",
            self.base_url, type_segment, platform, record.name
        ))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

fn platform_code(name: &str) -> Result<&'static str, SourceError> {
    if name.starts_with("S1A") {
        Ok("SA")
    } else if name.starts_with("S1B") {
        Ok("SB")
    } else {
        Err(SourceError::InvalidProductName {
            name: name.to_string(),
            reason: "expected an S1A or S1B product name".to_string(),
        })
    }
}

fn type_segment(record: &ProductRecord) -> Result<String, SourceError> {
    match record.product_type.as_str() {
        "GRD" => {
            let resolution = resolution_code(&record.name, "GRD")?;
            let polarization = polarization_class(record)?;
            Ok(format!("GRD_{resolution}{polarization}"))
        }
        "SLC" => Ok("SLC".to_string()),
        other => Err(SourceError::UnsupportedProductType(other.to_string())),
    }
}

/// The resolution letter follows the product-type token in the name:
/// `..._GRDH_...` is High resolution.
fn resolution_code(name: &str, product_type: &str) -> Result<char, SourceError> {
    let index = name
        .find(product_type)
        .ok_or_else(|| SourceError::InvalidProductName {
            name: name.to_string(),
            reason: format!("product type {product_type} does not appear in the name"),
        })?;

    match name.as_bytes().get(index + product_type.len()) {
        Some(&code) if code.is_ascii_uppercase() => Ok(code as char),
        _ => Err(SourceError::InvalidProductName {
            name: name.to_string(),
            reason: format!("no resolution letter after the {product_type} token"),
        }),
    }
}

/// Single (`S`) for VV/HH acquisitions, dual (`D`) otherwise.
fn polarization_class(record: &ProductRecord) -> Result<char, SourceError> {
    let mode = record
        .polarization_mode
        .as_deref()
        .ok_or(SourceError::MissingAttribute("polarization_mode"))?;
    match mode {
        "VV" | "HH" => Ok('S'),
        _ => Ok('D'),
    }
}
