//! Pagination parameter handling.
//!
//! JSON:API nests pagination under `page[...]`, and two styles coexist:
//! page-oriented `page[number]`/`page[size]` and row-oriented
//! `page[offset]`/`page[limit]`. When a page number is present it wins
//! outright; raw offset and limit values in the same request are ignored, not
//! combined. Whatever the style, the resolved window always satisfies
//! `offset >= 0` and `1 <= limit <= max_limit`.

use crate::config::PageConfig;
use crate::error::{QueryError, QueryResult};
use crate::params::RawParams;

/// Raw `page[...]` values collected from one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    /// `page[number]`: zero-based page index.
    pub number: Option<u64>,
    /// `page[size]`: rows per page.
    pub size: Option<u64>,
    /// `page[offset]`: rows to skip.
    pub offset: Option<u64>,
    /// `page[limit]`: row ceiling.
    pub limit: Option<u64>,
}

impl PageParams {
    /// Collects every recognized `page[<key>]` parameter from the bag.
    ///
    /// Unrecognized inner keys are ignored. A value that does not parse as a
    /// non-negative integer fails the request, naming the exact parameter.
    pub fn scan(params: &RawParams) -> QueryResult<Self> {
        let mut page = PageParams::default();
        for (inner, value) in params.bracketed("page") {
            let slot = match inner {
                "number" => &mut page.number,
                "size" => &mut page.size,
                "offset" => &mut page.offset,
                "limit" => &mut page.limit,
                _ => continue,
            };
            let parsed = value.parse::<u64>().map_err(|_| QueryError::InvalidParameter {
                parameter: format!("page[{}]", inner),
                detail: format!("expected a non-negative integer, got {:?}", value),
            })?;
            *slot = Some(parsed);
        }
        Ok(page)
    }

    /// Whether any pagination parameter was supplied.
    pub fn is_default(&self) -> bool {
        *self == PageParams::default()
    }

    /// Resolves the collected values into a concrete window.
    ///
    /// Page-oriented parameters take precedence: with `page[number]` present,
    /// the window is `number * size` rows in at `size` rows per page, where
    /// `size` falls back to the configured default page size. Otherwise the
    /// raw offset and limit apply, with the configured default limit filling
    /// the gap. Requested sizes above `max_limit` are capped, not rejected;
    /// an explicit zero is rejected because a zero-row page can never make
    /// progress.
    pub fn resolve(&self, config: &PageConfig) -> QueryResult<PageWindow> {
        if let Some(number) = self.number {
            let size = self.size.unwrap_or(config.default_page_size);
            require_at_least_one("page[size]", size)?;
            let size = size.min(config.max_limit);
            let offset = number.checked_mul(size).ok_or_else(|| QueryError::InvalidParameter {
                parameter: "page[number]".to_string(),
                detail: format!("page {} starts beyond the addressable range", number),
            })?;
            return Ok(PageWindow {
                offset,
                limit: size,
            });
        }

        let limit = self.limit.unwrap_or(config.default_limit);
        require_at_least_one("page[limit]", limit)?;
        Ok(PageWindow {
            offset: self.offset.unwrap_or(0),
            limit: limit.min(config.max_limit),
        })
    }
}

fn require_at_least_one(parameter: &str, value: u64) -> QueryResult<()> {
    if value == 0 {
        return Err(QueryError::InvalidParameter {
            parameter: parameter.to_string(),
            detail: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// A resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to return.
    pub limit: u64,
}

impl PageWindow {
    /// The window for the following page.
    pub fn next(&self) -> Self {
        PageWindow {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }

    /// The window for the preceding page, or `None` on the first page.
    ///
    /// A window that starts mid-page snaps back to offset 0 rather than
    /// going negative.
    pub fn prev(&self) -> Option<Self> {
        if self.offset == 0 {
            return None;
        }
        Some(PageWindow {
            offset: self.offset.saturating_sub(self.limit),
            limit: self.limit,
        })
    }
}
