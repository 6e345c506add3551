pub mod config_io;
pub mod http_store;
pub mod memory_store;
pub mod store;
pub mod sync;
pub mod wire;
