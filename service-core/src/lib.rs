//! service-core: error type, configuration helpers, HTTP middleware and
//! logging shared by the crusher ERP services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
