pub mod generation;
pub mod store;
