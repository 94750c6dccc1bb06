pub mod config;
pub mod errors;
pub mod generate;
pub mod parse;
pub mod prompts;
pub mod provider;
pub mod routes;
pub mod shutdown;
