//! Lua runtime module.
//!
//! Provides the embedded Lua engine, its registration surface, and the host API.

pub mod engine;
pub mod env;
pub mod host;
pub mod sandbox;
pub mod script;

pub use engine::{format_value, LuaEngine};
pub use env::{get_at_path, set_at_path, Callable, ScriptEnv, SEPARATOR};
pub use host::{register_host_api, HostApi, LogLevel};
pub use sandbox::{apply_sandbox, is_sandboxed};
pub use script::Script;
