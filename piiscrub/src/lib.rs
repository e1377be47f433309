// piiscrub/src/lib.rs
//! # piiscrub CLI
//!
//! Terminal front end for `piiscrub-core`: loads configuration and the name
//! corpus, runs the pipeline over files or stdin, and prints masked text or
//! detection reports.

pub mod cli;
pub mod commands;
pub mod corpus;
pub mod logger;
pub mod ui;
