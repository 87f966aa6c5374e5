pub mod adapter;
pub mod application;
