extern crate chrono;
extern crate diesel;
extern crate tokio;

pub mod config;
pub mod db;
pub mod destinations;
pub mod geo;
pub mod logger;
pub mod models;
pub mod services;
pub mod web;
