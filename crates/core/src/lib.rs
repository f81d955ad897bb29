pub mod error;
pub mod params;
pub mod settings;

pub use error::*;
pub use params::*;
pub use settings::*;
