#![doc = include_str!("../README.md")]
pub mod app;
pub mod audio;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod keyboard;
pub mod logging;
