//! Bulk registration of marked methods and enums.

use std::sync::Arc;

use mlua::{Lua, MultiValue, Value};
use serde::Serialize;
use tracing::debug;

use super::enums::{EnumDescriptor, LuaEnum};
use super::marker::LuaGlobal;
use super::methods::{
    Binding, BindingKind, BoundFn, LuaMethods, MethodFilter, MethodInfo, MethodTable,
};
use crate::error::{RegistrationError, Result};
use crate::lua::{Callable, ScriptEnv, SEPARATOR};

/// What to register methods from.
pub enum Target<T> {
    /// The type itself: only static methods can be bound.
    Type,
    /// An instance that receiver-bound methods are called on.
    Instance(Arc<T>),
}

/// A registration that would be made, as reported by [`tagged_exports`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    pub key: String,
    pub method: String,
    pub kind: BindingKind,
    pub description: Option<String>,
}

/// Prefix for keys registered under `path`.
///
/// A non-empty path always gets a separator appended, even if it already ends in one.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}{}", path, SEPARATOR)
    }
}

struct Planned<'a, T> {
    key: String,
    method: &'a MethodInfo<T>,
    marker: &'a LuaGlobal,
}

/// Work out every key before touching the environment.
fn plan<'a, T>(
    table: &'a MethodTable<T>,
    filter: MethodFilter,
    path: &str,
) -> Result<Vec<Planned<'a, T>>> {
    let prefix = normalize_path(path);
    let mut planned = Vec::new();

    for method in table.select(filter) {
        for marker in method.markers() {
            let name = marker.exposed_name(method.name());
            if name.is_empty() {
                return Err(RegistrationError::invalid(
                    "name",
                    "marked method has neither a declared nor an override name",
                ));
            }
            planned.push(Planned {
                key: format!("{}{}", prefix, name),
                method,
                marker,
            });
        }
    }

    Ok(planned)
}

/// Register every method of `T` selected by `filter` and carrying a [`LuaGlobal`] marker.
///
/// Each marker yields one function at `path.<name>`. Static methods are registered
/// unbound; instance methods are bound to the target instance, and skipped when the
/// target is the type itself.
pub fn register_tagged<T: LuaMethods>(
    env: &(impl ScriptEnv + ?Sized),
    target: Target<T>,
    filter: MethodFilter,
    path: &str,
) -> Result<()> {
    let table = MethodTable::<T>::of();
    let planned = plan(&table, filter, path)?;

    for entry in planned {
        let callable = match (&entry.method.binding, &target) {
            (Binding::Static(callable), _) => Arc::clone(callable),
            (Binding::Instance(bound), Target::Instance(receiver)) => bind(bound, receiver),
            (Binding::Instance(_), Target::Type) => {
                debug!(key = %entry.key, "skipping instance method without a receiver");
                continue;
            }
        };

        env.register_function(&entry.key, callable)?;
        debug!(key = %entry.key, method = entry.method.name(), "registered lua function");
    }

    Ok(())
}

/// Register the public instance methods of `instance` that carry a marker.
pub fn register_tagged_instance_methods<T: LuaMethods>(
    env: &(impl ScriptEnv + ?Sized),
    instance: Arc<T>,
    path: &str,
) -> Result<()> {
    register_tagged(
        env,
        Target::Instance(instance),
        MethodFilter::PUBLIC_INSTANCE,
        path,
    )
}

/// Register the public static methods of `T` that carry a marker.
pub fn register_tagged_static_methods<T: LuaMethods>(
    env: &(impl ScriptEnv + ?Sized),
    path: &str,
) -> Result<()> {
    register_tagged(env, Target::<T>::Type, MethodFilter::PUBLIC_STATIC, path)
}

/// List what [`register_tagged`] would register for `T`, without registering anything.
pub fn tagged_exports<T: LuaMethods>(filter: MethodFilter, path: &str) -> Result<Vec<Export>> {
    let table = MethodTable::<T>::of();
    let exports = plan(&table, filter, path)?
        .into_iter()
        .map(|entry| Export {
            key: entry.key,
            method: entry.method.name().to_string(),
            kind: entry.method.kind(),
            description: entry.marker.description.clone(),
        })
        .collect();
    Ok(exports)
}

fn bind<T: Send + Sync + 'static>(bound: &BoundFn<T>, receiver: &Arc<T>) -> Callable {
    let bound = Arc::clone(bound);
    let receiver = Arc::clone(receiver);
    Arc::new(move |lua: &Lua, args: MultiValue| bound(lua, &receiver, args))
}

/// Export the members of `T` as a table named after it.
pub fn register_enum<T: LuaEnum>(env: &(impl ScriptEnv + ?Sized)) -> Result<()> {
    register_enum_descriptor(env, &EnumDescriptor::of::<T>())
}

/// Export an enum described at runtime.
pub fn register_enum_descriptor(
    env: &(impl ScriptEnv + ?Sized),
    descriptor: &EnumDescriptor,
) -> Result<()> {
    let name = descriptor.name();
    check_segment("enum_type", name)?;
    for (member, _) in descriptor.members() {
        check_segment("member", member)?;
    }

    env.new_table(name)?;
    for (member, value) in descriptor.members() {
        let path = format!("{}{}{}", name, SEPARATOR, member);
        env.set_value_at_path(&path, Value::Integer(*value))?;
    }

    debug!(name, members = descriptor.members().len(), "registered lua enum");
    Ok(())
}

fn check_segment(argument: &'static str, segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(RegistrationError::invalid(argument, "name is empty"));
    }
    if segment.contains(SEPARATOR) {
        return Err(RegistrationError::invalid(
            argument,
            format!("'{}' contains the path separator", segment),
        ));
    }
    Ok(())
}
