// Service exports
pub mod api;
pub mod cache;
pub mod loader;
pub mod store;

pub use api::{RestaurantApiClient, CandidateProvider, ApiError};
pub use cache::CandidateCache;
pub use loader::{CandidateLoader, LoadState, LOAD_FAILED_MESSAGE};
pub use store::{KeyValueStore, MemoryStore, FileStore, StoreError};
