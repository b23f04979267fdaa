#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod player;
pub mod progress;
pub mod time;
pub mod validation;
pub mod wizard;

pub use error::Error;
pub use time::Clock;
