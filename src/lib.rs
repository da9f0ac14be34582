//! Library exports for the tracked-link builder
//!
//! The composer and storage layers are usable on their own; the HTTP
//! modules wrap them for the form front end.

pub mod composer;
pub mod config;
pub mod database;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod service;
pub mod storage;
