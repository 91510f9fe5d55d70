pub mod amount;
pub mod percentage;
pub mod ratio;

pub use amount::Amount;
pub use percentage::Percentage;
pub use ratio::Ratio;
