pub mod app_config;
pub mod memory;
pub mod profile;

pub use memory::MemoryStore;
pub use profile::ProfileStore;
