// src/lib.rs

//! Outlet event crawler and static page publisher.

pub mod config;
pub mod error;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod services;
pub mod site;
pub mod storage;
pub mod utils;
