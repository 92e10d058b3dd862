#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod route;
pub mod router;
pub mod view;
