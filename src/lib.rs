pub mod config;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod output;
pub mod scoring;
