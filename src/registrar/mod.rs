//! Registration of marked Rust methods and enums into Lua.
//!
//! A type lists its methods in a [`MethodTable`] and marks the ones Lua should see
//! with [`LuaGlobal`]. The registrar selects methods with a [`MethodFilter`], binds
//! instance methods to a receiver when one is given, and registers each marker
//! under `path.<name>` in a [`ScriptEnv`](crate::lua::ScriptEnv).

pub mod enums;
pub mod marker;
pub mod methods;
pub mod register;

pub use enums::{EnumDescriptor, LuaEnum};
pub use marker::LuaGlobal;
pub use methods::{
    BindingKind, LuaMethods, MethodEntry, MethodFilter, MethodInfo, MethodTable, Visibility,
};
pub use register::{
    normalize_path, register_enum, register_enum_descriptor, register_tagged,
    register_tagged_instance_methods, register_tagged_static_methods, tagged_exports, Export,
    Target,
};
