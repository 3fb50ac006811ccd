use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a saved layout file holds: the names of the widgets the layout
/// needs plus the engine's own serialized arrangement, kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    #[serde(default)]
    pub imported_components: Vec<String>,
    pub layout_data: Value,
}
