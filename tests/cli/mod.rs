//! CLI Integration Test Modules

pub mod argument_parsing;
pub mod lifecycle;
pub mod toml_config;
