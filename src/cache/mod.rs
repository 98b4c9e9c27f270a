//! Cache module for API responses
//!
//! This module provides an in-memory cache that stores raw response bytes
//! keyed by request URL, with a configurable TTL (time-to-live). A background
//! task sweeps out entries once they exceed the TTL, so repeated paginated
//! queries within the window never hit the network twice.

mod timed;

pub use timed::TimedCache;
