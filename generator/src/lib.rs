pub mod error;
pub mod generator;
pub mod names;
pub mod order;
pub mod rules;

pub use error::GenError;
pub use generator::{Code, Generator, Rendered};
pub use order::Order;
