pub mod calculations;
pub mod pda;
pub mod validation;

pub use calculations::*;
pub use pda::*;
pub use validation::*;
