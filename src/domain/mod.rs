//! Core domain types and logic.

pub mod assembler;
pub mod catalog;
pub mod config_validation;
pub mod database;
pub mod error;
pub mod instrument_index;
pub mod naming;
pub mod report;
pub mod transaction;
