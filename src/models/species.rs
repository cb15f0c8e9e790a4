//! Fish species catalogue entry

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishSpecies {
    pub name: String,
    pub scientific_name: String,
    pub habitat: String,
    pub best_season: String,
}

impl FishSpecies {
    /// One-line summary shown when a species card is selected
    #[must_use]
    pub fn details(&self) -> String {
        format!(
            "{}: Best found in {} during {}",
            self.name, self.habitat, self.best_season
        )
    }
}
