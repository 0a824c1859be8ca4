//! Web page scraping.
//!
//! Links come from arbitrary publishers, so there is a single generic
//! scraper ([`article`]) rather than one module per site. It follows a
//! two-step pattern:
//!
//! 1. **Fetching**: one GET with a browser-like `User-Agent` and a timeout
//! 2. **Extraction**: title and body picked from a fixed list of selectors
//!
//! Failures are logged with their cause and reported to the caller as
//! "nothing fetched", so one bad link never stops the run.

pub mod article;
