//! Luatag library - expose marked Rust methods and enums to embedded Lua.
//!
//! This crate registers Rust functions into an `mlua` state in bulk: types list
//! their methods once, mark the ones scripts may call, and the registrar binds
//! them under a dotted namespace.

pub mod cli;
pub mod config;
pub mod error;
pub mod lua;
pub mod registrar;

pub use error::RegistrationError;
pub use lua::{LuaEngine, ScriptEnv};
pub use registrar::{
    register_enum, register_enum_descriptor, register_tagged, register_tagged_instance_methods,
    register_tagged_static_methods, tagged_exports, EnumDescriptor, LuaEnum, LuaGlobal,
    LuaMethods, MethodFilter, MethodTable, Target,
};
