use serde::{Deserialize, Serialize};

/// Media-type marker prepended to a heatmap before it is handed to an
/// image-rendering surface. The wire format carries the bare base64 body.
pub const HEATMAP_DATA_PREFIX: &str = "data:image/png;base64,";

/// Classification returned by the predictor for one uploaded scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "prediction")]
    pub label: String,
    /// Model confidence in [0, 1].
    pub confidence: f32,
    /// Heatmap overlay, base64-encoded PNG without a data-URI prefix.
    pub heatmap: String,
}

/// One saved classification as stored by the persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedResult {
    pub id: i64,
    /// ISO-8601 instant assigned server-side at save time.
    pub timestamp: String,
    /// Base64-encoded PNG without a data-URI prefix.
    pub heatmap_image: String,
    #[serde(rename = "prediction")]
    pub label: String,
}

/// Body of a save call. The heatmap keeps its data-URI prefix here; the
/// persistence service splits it off before storing the binary body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveRequest {
    pub heatmap: String,
    pub prediction: String,
    pub confidence: f32,
}

/// Body of a batch delete call. Applied all-or-nothing by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteRequest {
    pub ids: Vec<i64>,
}
