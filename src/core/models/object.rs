use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectContent {
    pub data_type: String,
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub fields: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub content: Option<ObjectContent>,
}

impl ObjectData {
    /// Fields of a Move struct, if this object carries Move content.
    pub fn move_fields(&self) -> Option<&serde_json::Value> {
        self.content
            .as_ref()
            .filter(|c| c.data_type == "moveObject")
            .map(|c| &c.fields)
    }
}
