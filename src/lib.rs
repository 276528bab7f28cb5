// src/lib.rs

//! Edubox import client library

pub mod error;
pub mod models;
pub mod services;
pub mod transport;
pub mod utils;
