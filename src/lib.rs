pub mod cache;
pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod export;
pub mod fetch;
pub mod quote;
pub mod service;

pub use error::{AppError, Result};
