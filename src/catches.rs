//! Queries answered from the device's catch list, without extra endpoints.

use crate::client::FishApiClient;
use crate::error::Result;
use crate::record::CanonicalCatch;
use crate::time::sort_key;
use std::fmt::Display;

pub const DEFAULT_RECENT_LIMIT: usize = 6;

/// Newest first; catches without a usable timestamp go last. Stable.
pub fn most_recent(mut catches: Vec<CanonicalCatch>, limit: usize) -> Vec<CanonicalCatch> {
    catches.sort_by_key(|c| std::cmp::Reverse(sort_key(&c.created_at)));
    catches.truncate(limit);
    catches
}

/// First catch whose id matches `fish_id` once both are rendered as text.
pub fn find_by_id(catches: Vec<CanonicalCatch>, fish_id: impl Display) -> Option<CanonicalCatch> {
    let wanted = fish_id.to_string();
    catches.into_iter().find(|c| c.id == wanted)
}

impl FishApiClient {
    pub async fn get_recent_catches(&self, limit: usize) -> Result<Vec<CanonicalCatch>> {
        let catches = self.get_fish_by_device().await?;
        Ok(most_recent(catches, limit))
    }

    /// `Ok(None)` when the device has no catch with that id.
    pub async fn get_catch_details(&self, fish_id: impl Display) -> Result<Option<CanonicalCatch>> {
        let catches = self.get_fish_by_device().await?;
        Ok(find_by_id(catches, fish_id))
    }

    pub async fn get_fish_details(&self, fish_id: impl Display) -> Result<Option<CanonicalCatch>> {
        self.get_catch_details(fish_id).await
    }
}
