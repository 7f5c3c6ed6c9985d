//! Request extractors shared across handlers.

pub mod session;
