pub mod config;
pub mod driver;
pub mod error;
pub mod service;
pub mod session;
pub mod translator;
pub mod types;

pub use error::{Error, Result};
