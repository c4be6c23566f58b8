//! Search hh.ru vacancies, rank them by salary and keep them in a local
//! JSON store.

pub mod collectors;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;
