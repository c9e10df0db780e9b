//! # SQL Param Lint Library
//!
//! Static analysis of SQL placeholder bindings in fluent database call
//! chains.

pub mod cli;
pub mod config;
pub mod error;
pub mod fix;
pub mod inspect;
pub mod output;
pub mod project;
pub mod sql;
pub mod syntax;
