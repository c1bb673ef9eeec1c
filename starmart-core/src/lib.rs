pub mod aggregates;
pub mod dimensions;
pub mod facts;
pub mod tables;
#[cfg(test)]
mod tests;
pub mod transform;

pub use starmart_types;
