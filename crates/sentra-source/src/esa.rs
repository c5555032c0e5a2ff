use sentra_fetch::Credentials;

use crate::error::SourceError;
use crate::product::ProductRecord;

/// Production base URL of the ESA catalog's OData API.
pub const DHUS_BASE_URL: &str = "https://scihub.copernicus.eu/dhus";

/// The ESA catalog: products addressed by catalog UUID, Basic auth.
#[derive(Debug, Clone)]
pub struct EsaEndpoint {
    base_url: String,
    credentials: Credentials,
}

impl EsaEndpoint {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(DHUS_BASE_URL, credentials)
    }

    /// Point at a different deployment (mirror instances, tests).
    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// URL of the full product archive.
    pub fn product_url(&self, record: &ProductRecord) -> Result<String, SourceError> {
        let uuid = checked_uuid(&record.uuid)?;
        Ok(format!(
            "{}/odata/v1/Products('{uuid}')/$value",
            self.base_url
        ))
    }

    /// URL of the product's quicklook preview image.
    pub fn quicklook_url(&self, record: &ProductRecord) -> Result<String, SourceError> {
        let uuid = checked_uuid(&record.uuid)?;
        Ok(format!(
            "{}/odata/v1/Products('{uuid}')/Products('Quicklook')/$value",
            self.base_url
        ))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// The OData path embeds the identifier in quotes; only pass through
/// strings that look like a catalog UUID.
fn checked_uuid(raw: &str) -> Result<&str, SourceError> {
    if !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-')
    {
        Ok(raw)
    } else {
        Err(SourceError::InvalidProductId(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> EsaEndpoint {
        EsaEndpoint::new(Credentials::new("user", "pass"))
    }

    #[test]
    fn builds_odata_product_url() {
        let record = ProductRecord::new(
            "2b17b57d-fff4-4645-b539-91f305c27c69",
            "S2B_MSIL1C_20190628T182929_N0207_R027_T12UUA_20190628T221748",
            "S2MSI1C",
        );
        assert_eq!(
            endpoint().product_url(&record).unwrap(),
            "https://scihub.copernicus.eu/dhus/odata/v1/Products('2b17b57d-fff4-4645-b539-91f305c27c69')/$value"
        );
    }

    #[test]
    fn builds_quicklook_url() {
        let record = ProductRecord::new(
            "a8f318d3-b95f-44f6-aa7e-bccbe4b00c4f",
            "S2B_MSIL1C_20190628T182929_N0207_R027_T12UUA_20190628T221748",
            "S2MSI1C",
        );
        let url = endpoint().quicklook_url(&record).unwrap();
        assert!(url.ends_with("/Products('a8f318d3-b95f-44f6-aa7e-bccbe4b00c4f')/Products('Quicklook')/$value"));
    }

    #[test]
    fn rejects_empty_uuid() {
        let record = ProductRecord::new("", "S2B_MSIL1C", "S2MSI1C");
        assert!(matches!(
            endpoint().product_url(&record),
            Err(SourceError::InvalidProductId(_))
        ));
    }

    #[test]
    fn rejects_uuid_with_path_characters() {
        let record = ProductRecord::new("abc')/../secrets", "S2B_MSIL1C", "S2MSI1C");
        assert!(matches!(
            endpoint().product_url(&record),
            Err(SourceError::InvalidProductId(_))
        ));
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let endpoint = EsaEndpoint::with_base_url(
            "https://scihub.copernicus.eu/dhus/",
            Credentials::new("u", "p"),
        );
        let record = ProductRecord::new("deadbeef-0000-1111-2222-333344445555", "X", "S2MSI1C");
        assert!(
            endpoint
                .product_url(&record)
                .unwrap()
                .starts_with("https://scihub.copernicus.eu/dhus/odata")
        );
    }
}
