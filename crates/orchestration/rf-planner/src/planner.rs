//! Split planning over a paged listing.
//!
//! Planning walks the listing once, front to back, holding a single page in
//! memory. Split boundaries are absolute key indexes (`n * split_size`); a
//! boundary is emitted as soon as the page containing it is loaded, and the
//! last split is clamped to the final key.

use anyhow::anyhow;
use rf_error::{Result, RfError};
use rf_traits::SharedLister;
use rf_types::{ListRequest, Page, PlannerConfig, Split, SplitSizing};
use tracing::{debug, info};

use crate::lister::OrderingGuard;
use crate::stats::PlanStats;

/// Plans contiguous, size-bounded splits over a bucket prefix.
pub struct SplitPlanner {
    lister: SharedLister,
    config: PlannerConfig,
}

impl SplitPlanner {
    /// Create a planner.
    ///
    /// # Arguments
    ///
    /// * `lister` - The listing capability to page through
    /// * `config` - Bucket, prefix, page size and split sizing
    pub fn new(lister: SharedLister, config: PlannerConfig) -> Self {
        Self { lister, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan splits, discarding statistics.
    pub async fn plan(&self) -> Result<Vec<Split>> {
        let (splits, _) = self.plan_with_stats().await?;
        Ok(splits)
    }

    /// Plan splits and report what the run did.
    ///
    /// The configuration is validated before any listing call is made.
    pub async fn plan_with_stats(&self) -> Result<(Vec<Split>, PlanStats)> {
        let sizing = self.config.resolve()?;
        let mut stats = PlanStats::new();

        debug!(
            container = %self.config.container,
            prefix = %self.config.key_prefix,
            page_size = self.config.page_size,
            ?sizing,
            "Starting split planning"
        );

        let splits = match sizing {
            SplitSizing::BySize(split_size) => self.plan_by_size(split_size, &mut stats).await?,
            SplitSizing::ByCount(split_count) => {
                let total = self.count_keys(&mut stats).await?;
                match split_size_for_count(total, split_count) {
                    Some(split_size) => {
                        debug!(total, split_count, split_size, "Derived split size from key count");
                        self.plan_by_size(split_size, &mut stats).await?
                    }
                    None => Vec::new(),
                }
            }
        };

        stats.complete();

        info!(
            container = %self.config.container,
            prefix = %self.config.key_prefix,
            splits = splits.len(),
            keys = stats.keys_listed,
            pages = stats.pages_fetched,
            "Number of input splits={}",
            splits.len()
        );

        Ok((splits, stats))
    }

    fn first_request(&self) -> ListRequest {
        ListRequest::new(
            &self.config.container,
            &self.config.key_prefix,
            self.config.page_size,
        )
    }

    /// Count the keys under the prefix, one page at a time.
    pub async fn count_keys(&self, stats: &mut PlanStats) -> Result<u64> {
        let mut page = self.lister.list(&self.first_request()).await?;
        stats.record_page(0);
        let mut total = page.len() as u64;

        while !page.is_final() {
            page = self.lister.list_next(&page).await?;
            stats.record_page(0);
            total += page.len() as u64;
        }

        debug!(total, "Counted keys");
        Ok(total)
    }

    /// Plan splits of `split_size` keys (the last one may be smaller).
    pub async fn plan_by_size(&self, split_size: u32, stats: &mut PlanStats) -> Result<Vec<Split>> {
        if split_size == 0 {
            return Err(RfError::config("split size must be at least 1"));
        }

        let target = u64::from(split_size);
        let mut splits = Vec::new();
        let mut ordering = OrderingGuard::default();

        // Keys in pages before the loaded one
        let mut consumed: u64 = 0;
        // Absolute index one past the last emitted split, and that split's end key
        let mut boundary: u64 = 0;
        let mut boundary_key: Option<String> = None;
        // Last key of the most recent non-empty page before the loaded one
        let mut carried_key: Option<String> = None;

        let mut page = self.lister.list(&self.first_request()).await?;

        loop {
            stats.record_page(page.len() as u64);
            for item in &page.items {
                ordering.observe(item);
            }

            let available = consumed + page.len() as u64;
            let last_page = page.is_final();

            debug!(
                keys = page.len(),
                first_index = consumed,
                available,
                last_page,
                "Planning over page"
            );

            loop {
                let mut next = boundary + target;
                if last_page && next > available {
                    next = available;
                }
                if next > available || next == boundary {
                    break;
                }

                let end_key = key_at(&page, consumed, next - 1, carried_key.as_deref())?;
                let split = Split::new(
                    &self.config.container,
                    &self.config.key_prefix,
                    boundary_key.take(),
                    end_key.clone(),
                    (next - boundary) as u32,
                );
                debug!(%split, "Planned split");
                splits.push(split);

                boundary = next;
                boundary_key = Some(end_key);
            }

            if last_page {
                break;
            }

            if let Some(last) = page.items.last() {
                carried_key = Some(last.key.clone());
            }
            consumed = available;
            page = self.lister.list_next(&page).await?;
        }

        stats.splits_planned = splits.len();
        stats.ordering_violations += ordering.violations();
        Ok(splits)
    }
}

/// Key at absolute `index`, given the loaded page starts at `first_index`.
///
/// A boundary can only fall before the loaded page when that page is empty and
/// final; the key then is the last key of the previous page.
fn key_at(page: &Page, first_index: u64, index: u64, carried: Option<&str>) -> Result<String> {
    if index >= first_index {
        let offset = (index - first_index) as usize;
        if let Some(item) = page.items.get(offset) {
            return Ok(item.key.clone());
        }
    } else if index + 1 == first_index {
        if let Some(key) = carried {
            return Ok(key.to_string());
        }
    }

    Err(anyhow!("split boundary {index} is outside the loaded listing page").into())
}

/// Keys per split needed to cover `total` keys with at most `split_count` splits.
///
/// Returns `None` for an empty key space.
fn split_size_for_count(total: u64, split_count: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }

    let size = total.div_ceil(u64::from(split_count.max(1)));
    Some(u32::try_from(size).unwrap_or(u32::MAX))
}
