//! Application module

pub mod cli;
pub mod context;
pub mod producer;
pub mod startup;
