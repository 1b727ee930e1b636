//! Core library for the ladle recipe catalog: the recipe model and the
//! file-backed SQLite store. The HTTP surface lives in the `ladle` crate.

pub mod db;
pub mod models;
