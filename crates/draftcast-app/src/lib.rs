// Library root: the binary's building blocks, exposed for integration tests.

pub mod config;
pub mod console;
pub mod data;
pub mod feed;
pub mod session;
