pub mod config;
pub mod export;
pub mod export_many;
pub mod link;
pub mod links;
