pub mod quote;
pub mod slippage;

pub use quote::{ConstantProductCalculator, FeeRate, QuoteCalculator};
pub use slippage::{SwapAmounts, swap_amounts};
