//! Pagination module
//!
//! Baserow pages rows with `page`/`size` parameters and caps `size` at 200.
//! Every list operation goes through one primitive, the single-page fetch;
//! this module plans which pages an aggregate fetch needs and runs them
//! concurrently while keeping page order.
//!
//! # Overview
//!
//! - [`page_count`] / [`plan`] compute the pages covering `count` rows
//! - [`gather_pages`] fans out the page fetches and concatenates the
//!   results by page index, independent of completion order

mod plan;

pub use plan::{gather_pages, page_count, plan, PagePlan};
