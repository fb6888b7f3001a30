pub mod procedures;
pub mod settings;

pub use procedures::*;
pub use settings::*;
