pub mod client;
pub mod error;
pub mod types;

pub use client::VenueClient;
pub use error::FetchError;
pub use types::ListingResponse;
