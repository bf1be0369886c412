pub mod features;
pub mod prediction;
pub mod series;
pub mod symbol;

pub use features::*;
pub use prediction::*;
pub use series::*;
pub use symbol::*;
