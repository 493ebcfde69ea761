//! Pagination building.

use serde::{Deserialize, Serialize};

use crate::types::Pagination;

/// Default page size.
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Maximum page size.
pub const MAX_PER_PAGE: u64 = 50;

/// Deployment page size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    /// Page size used when the caller gives none.
    pub default_per_page: u64,
    /// Largest page size a caller may request.
    pub max_per_page: u64,
}

impl PageLimits {
    /// Creates limits, keeping the default within `1..=max`.
    pub fn new(default_per_page: u64, max_per_page: u64) -> Self {
        let max_per_page = max_per_page.max(1);
        Self {
            default_per_page: default_per_page.clamp(1, max_per_page),
            max_per_page,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE, MAX_PER_PAGE)
    }
}

/// Builds a pagination window. Never fails.
///
/// Page numbers below 1 become 1, sizes below 1 become the default, and
/// sizes above the maximum are clamped.
pub fn build_pagination(page: Option<i64>, per_page: Option<i64>, limits: &PageLimits) -> Pagination {
    let limits = PageLimits::new(limits.default_per_page, limits.max_per_page);

    let page = match page {
        Some(p) if p > 0 => p as u64,
        _ => 1,
    };
    let per_page = match per_page {
        Some(n) if n > 0 => (n as u64).min(limits.max_per_page),
        _ => limits.default_per_page,
    };

    Pagination {
        page,
        per_page,
        offset: (page - 1).saturating_mul(per_page),
        limit: per_page,
    }
}
