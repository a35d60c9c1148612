//! Data-access layer for the fish identification service.
//!
//! [`FishApiClient`] issues one request per call against the configured
//! base URL and device, and turns catch lists into [`CanonicalCatch`]
//! records with resolved image URLs.

pub mod catches;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod record;
pub mod resolve;
pub mod time;

pub use catches::DEFAULT_RECENT_LIMIT;
pub use client::{FishApiClient, UploadFile};
pub use config::ApiConfig;
pub use error::{FetchError, Result};
pub use record::{CanonicalCatch, RawSighting, normalize_list, to_canonical};
pub use resolve::ImageResolver;
