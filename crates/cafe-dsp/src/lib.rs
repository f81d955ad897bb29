pub mod control;
pub mod dsp;
pub mod frame;
pub mod numeric;
pub mod pipeline;

pub use control::*;
pub use dsp::*;
pub use frame::*;
pub use pipeline::*;
