//! Service layer for the ECO code service.
//!
//! This module contains the business logic for:
//! - Source document retrieval (`DocumentFetcher`)
//! - ECO table extraction (`OpeningParser`)
//! - Move path resolution (`next_move`)

mod fetcher;
mod moves;
mod openings;

pub use fetcher::{DocumentFetcher, FileFetcher, HttpFetcher, fetcher_for};
pub use moves::{MovePath, next_move};
pub use openings::OpeningParser;
