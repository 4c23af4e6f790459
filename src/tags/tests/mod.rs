mod repository;
mod service;
