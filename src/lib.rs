pub mod config;
pub mod dto;
pub mod error;
pub mod events;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
