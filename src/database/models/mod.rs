pub mod car;
pub mod dealership;

pub use car::{Car, CarFields};
pub use dealership::Dealership;
