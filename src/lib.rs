pub mod cards;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod images;
pub mod logging;
