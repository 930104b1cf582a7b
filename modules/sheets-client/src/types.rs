use serde::{Deserialize, Serialize};

/// Reply to a values.get call. `values` is absent when the range is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Body for values.append / values.update calls.
#[derive(Debug, Clone, Serialize)]
pub struct WriteBody {
    pub values: Vec<Vec<String>>,
}
