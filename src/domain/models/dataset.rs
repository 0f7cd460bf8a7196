use serde::Deserialize;
use serde::Serialize;

use super::wire;

/// An input dataset a query runs against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    pub name: String,
}

impl Dataset {
    pub fn new(id: i64, name: &str) -> Dataset {
        return Dataset {
            id,
            name: name.to_string(),
        };
    }
}
