pub mod board;
pub mod capture;
pub mod config;
pub mod error;
pub mod request;
pub mod state;
pub mod statistics;
