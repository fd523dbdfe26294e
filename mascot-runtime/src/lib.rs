pub mod config_store;
pub mod ipc;
pub mod llm;
pub mod memory;
pub mod runtime_engine;
pub mod secrets;
