#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(unused_must_use)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
pub mod amm;
pub mod codec;
pub mod types;
pub mod utils;
