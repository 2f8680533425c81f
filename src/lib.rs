pub mod aircraft;
pub mod airport;
pub mod catalog;
pub mod config;
pub mod crew;
pub mod error;
pub mod flight;
pub mod resource;
pub mod route;
pub mod schedule;
pub mod time;
