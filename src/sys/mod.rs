pub mod navigate;
pub mod runtime;
pub mod server;
