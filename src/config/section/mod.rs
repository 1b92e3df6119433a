//! Configuration section definitions.

mod encode;
mod input;
mod output;

pub use encode::EncodeConfig;
pub use input::{DuplicateMode, InputConfig};
pub use output::OutputConfig;
