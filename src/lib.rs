pub mod acquire;
pub mod app;
pub mod catalog;
pub mod complex;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod identifier;
pub mod interaction;
pub mod merge;
pub mod output;
pub mod score;
pub mod sources;
pub mod table;
pub mod validation;
