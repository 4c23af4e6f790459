pub mod handler;
pub mod models;
pub mod repository;
pub mod service;


pub use models::*;
