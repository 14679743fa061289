#![forbid(unsafe_code)]

pub mod error;
pub mod evaluator;
pub mod format;
pub mod model;
pub mod review;
pub mod time;

pub use error::Error;
pub use time::Clock;
