#![allow(dead_code)]

pub mod app_builder;
pub mod keys;

pub use app_builder::create_test_app;
pub use test_state::{build_test_state, seed_user};
