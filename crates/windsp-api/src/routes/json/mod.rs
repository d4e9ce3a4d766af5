//! Configuration document routes - read and save the WinDSP JSON file

pub mod api;

pub use api::{api_json_get, api_json_put};
