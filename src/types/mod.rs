pub mod common;
pub mod error;
pub mod reserves;

pub use common::*;
pub use error::*;
pub use reserves::*;
