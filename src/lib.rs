pub mod cli;
pub mod dataset;
pub mod discovery;
pub mod error;
pub mod github;
pub mod html;
pub mod importer;
pub mod models;
pub mod storage;
pub mod types;
pub mod web;

pub use error::{Result, StarListsError};
