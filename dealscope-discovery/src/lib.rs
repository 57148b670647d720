pub mod distance;
pub mod engine;
pub mod query;

pub use distance::{DistanceProvider, NoDistances};
pub use engine::discover;
pub use query::{DiscoveryQuery, QueryError, SortMode};
