// Domain module - Core types shared across layers
pub mod config;
pub mod error;
