use serde::{Deserialize, Serialize};

/// Orderings available for discovery results
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    /// Start date descending
    #[default]
    Newest,
    /// Start date ascending
    Oldest,
    /// End date ascending
    EndingSoon,
    /// Redemption count descending
    MostRedemptions,
}

/// Caller-supplied filter and ordering for one discovery request.
/// Ephemeral; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryQuery {
    /// Case-insensitive substring match against title and business name;
    /// empty matches everything
    #[serde(default)]
    pub search_text: String,

    /// Inclusive distance bound in km; unset means any distance
    #[serde(default)]
    pub max_distance_km: Option<f64>,

    #[serde(default)]
    pub sort_mode: SortMode,
}

impl DiscoveryQuery {
    /// Reject malformed bounds instead of clamping them
    pub fn validate(&self) -> Result<(), QueryError> {
        if let Some(km) = self.max_distance_km {
            if !km.is_finite() || km < 0.0 {
                return Err(QueryError::InvalidMaxDistance(km));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QueryError {
    #[error("max distance must be a non-negative number of km: {0}")]
    InvalidMaxDistance(f64),
}
