use serde::Deserialize;
use serde_json::Value;

/// One job execution as it appears in the event file.
///
/// Everything is optional at this layer; the graph builder decides what is
/// malformed so it can report the offending event index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub job: Option<RawJob>,

    /// `null` and a missing key both mean "no inputs".
    #[serde(default)]
    pub inputs: Option<Vec<RawDataset>>,

    #[serde(default)]
    pub outputs: Option<Vec<RawDataset>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    #[serde(default)]
    pub name: Option<String>,

    /// Kept untyped: facet shapes vary between producers.
    #[serde(default)]
    pub facets: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDataset {
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub facets: Option<Value>,
}

impl RawEvent {
    pub fn inputs(&self) -> &[RawDataset] {
        self.inputs.as_deref().unwrap_or_default()
    }

    pub fn outputs(&self) -> &[RawDataset] {
        self.outputs.as_deref().unwrap_or_default()
    }
}
