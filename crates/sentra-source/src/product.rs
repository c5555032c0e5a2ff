use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The slice of a catalog record this crate needs to build download URLs.
///
/// Catalog search and metadata normalization happen upstream; whatever
/// extra fields the provider returned are ignored here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductRecord {
    /// Stable catalog identifier (ESA OData UUID).
    pub uuid: String,

    /// Display name, e.g.
    /// `S1B_IW_GRDH_1SSV_20161014T012841_20161014T012906_002496_00435F_BB18`.
    pub name: String,

    /// Platform label, e.g. `Sentinel-1`.
    #[serde(default)]
    pub platform: Option<String>,

    /// Product type tag: `GRD`, `SLC`, `S2MSI1C`, ...
    pub product_type: String,

    /// SAR polarization mode (`VV`, `HH`, `VV VH`, ...), when applicable.
    #[serde(default)]
    pub polarization_mode: Option<String>,

    /// SAR sensor mode (`IW`, `EW`, ...), when applicable.
    #[serde(default)]
    pub sensor_mode: Option<String>,

    /// Acquisition footprint as WKT; opaque to this crate.
    #[serde(default)]
    pub footprint: Option<String>,

    /// Acquisition start time.
    #[serde(default, alias = "beginposition")]
    pub acquired: Option<DateTime<Utc>>,
}

impl ProductRecord {
    /// Build a minimal record; the optional attributes default to `None`.
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            platform: None,
            product_type: product_type.into(),
            polarization_mode: None,
            sensor_mode: None,
            footprint: None,
            acquired: None,
        }
    }

    #[must_use]
    pub fn polarization(mut self, mode: impl Into<String>) -> Self {
        self.polarization_mode = Some(mode.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_json() {
        let json = r#"{
            "uuid": "2b17b57d-fff4-4645-b539-91f305c27c69",
            "name": "S1B_IW_GRDH_1SSV_20161014T012841_20161014T012906_002496_00435F_BB18",
            "platform": "Sentinel-1",
            "product_type": "GRD",
            "polarization_mode": "VV",
            "sensor_mode": "IW",
            "beginposition": "2016-10-14T01:28:41Z"
        }"#;

        let record: ProductRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.product_type, "GRD");
        assert_eq!(record.polarization_mode.as_deref(), Some("VV"));
        assert!(record.acquired.is_some());
        assert!(record.footprint.is_none());
    }
}
