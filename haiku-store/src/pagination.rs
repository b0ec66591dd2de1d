//! Pagination utilities for haiku listing

/// Limit used when the caller does not pass one
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on records per response
pub const MAX_LIMIT: i64 = 100;

/// Sanitized `LIMIT`/`OFFSET` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// Clamp caller-supplied pagination parameters.
///
/// Negatives become 0 and the limit is capped at [`MAX_LIMIT`].
///
/// # Examples
/// ```
/// use haiku_store::pagination::{clamp_page, MAX_LIMIT};
///
/// let p = clamp_page(-5, -1);
/// assert_eq!((p.limit, p.offset), (0, 0));
///
/// let p = clamp_page(10_000, 20);
/// assert_eq!((p.limit, p.offset), (MAX_LIMIT, 20));
/// ```
pub fn clamp_page(limit: i64, offset: i64) -> Page {
    Page {
        limit: limit.clamp(0, MAX_LIMIT),
        offset: offset.max(0),
    }
}
