pub mod commands;
pub mod config;
pub mod env_binding;
pub mod error;
pub mod logging;
pub mod platform;
pub mod prereq;
pub mod runtime;
pub mod supervisor;
