//! plumbline library interface for integration tests

#![allow(
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::too_many_lines
)]

pub mod check;
pub mod cli;
pub mod config;
pub mod files;
pub mod fix;
pub mod init;
pub mod output;
pub mod tree;
