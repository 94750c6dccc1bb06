pub mod basic_models;
pub mod store_models;
