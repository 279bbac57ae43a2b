//! API integration tests
//!
//! `common` builds the router over the in-memory backend and drives it with
//! `tower::ServiceExt::oneshot`; `live` targets a running server and is ignored.

mod catalog_tests;
mod circulation_tests;
mod common;
mod live;
mod payment_tests;
