//! Pagination configuration for the query compiler.
//!
//! This module provides the tunable limits applied during compilation,
//! supporting both programmatic configuration and environment variable
//! overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QUERY_DEFAULT_PAGE_SIZE` | 25 | Page size when `page[number]` has no `page[size]` |
//! | `QUERY_DEFAULT_LIMIT` | 100 | Row limit when no pagination is requested |
//! | `QUERY_MAX_LIMIT` | 100 | Hard ceiling on any requested size or limit |
//!
//! # Example
//!
//! ```rust
//! use mayday_query::PageConfig;
//!
//! // Create from environment
//! let config = PageConfig::from_env();
//!
//! // Or create programmatically
//! let config = PageConfig {
//!     max_limit: 500,
//!     ..Default::default()
//! };
//! ```

use clap::Parser;

/// Pagination limits for query compilation.
///
/// This struct can be constructed from environment variables using
/// [`PageConfig::from_env`], from command line arguments using
/// [`PageConfig::parse`], or programmatically.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "query-config")]
#[command(about = "Pagination limits for the query compiler")]
pub struct PageConfig {
    /// Page size used when `page[number]` is supplied without `page[size]`.
    #[arg(long, env = "QUERY_DEFAULT_PAGE_SIZE", default_value = "25")]
    pub default_page_size: u64,

    /// Row limit used when the request carries no pagination at all.
    #[arg(long, env = "QUERY_DEFAULT_LIMIT", default_value = "100")]
    pub default_limit: u64,

    /// Hard ceiling on any requested page size or limit.
    #[arg(long, env = "QUERY_MAX_LIMIT", default_value = "100")]
    pub max_limit: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            default_limit: 100,
            max_limit: 100,
        }
    }
}

impl PageConfig {
    /// Creates a new PageConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse_from(std::iter::empty::<String>()).unwrap_or_default()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_limit == 0 {
            errors.push("Default limit cannot be 0".to_string());
        }

        if self.max_limit == 0 {
            errors.push("Max limit cannot be 0".to_string());
        }

        if self.default_page_size > self.max_limit {
            errors.push("Default page size cannot exceed max limit".to_string());
        }

        if self.default_limit > self.max_limit {
            errors.push("Default limit cannot exceed max limit".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Small pages and a low ceiling keep fixtures short.
    pub fn for_testing() -> Self {
        Self {
            default_page_size: 5,
            default_limit: 10,
            max_limit: 20,
        }
    }
}
