//! Core domain types and logic.

pub mod error;
pub mod price;
pub mod indicator;
pub mod strategy;
pub mod portfolio;
pub mod broker;
pub mod backtest;
pub mod config_validation;
pub mod catalog;
