pub mod models;
pub mod status;

pub use models::{Location, NewOffer, Offer, OfferError};
pub use status::{compute_status, OfferDisplayStatus};
