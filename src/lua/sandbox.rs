//! Lua sandbox configuration.
//!
//! Restricts the Lua environment scripts run in.

use anyhow::Result;
use mlua::{Lua, Table, Value};

/// Globals removed from every sandboxed state.
const BLOCKED_GLOBALS: &[&str] = &[
    "os",
    "package",
    "io",
    "debug",
    "loadfile",
    "dofile",
    "load",
    "loadstring",
    "rawget",
    "rawset",
    "rawequal",
    "collectgarbage",
    "getfenv",
    "setfenv",
    "newproxy",
    "getmetatable",
    "setmetatable",
];

/// Registry key of the modules `require` may still return.
const ALLOWED_MODULES_KEY: &str = "luatag.sandbox.modules";

/// Apply sandbox restrictions, also removing each of `extra`.
pub fn apply_sandbox(lua: &Lua, extra: &[String]) -> Result<()> {
    let globals = lua.globals();

    let blocked: Vec<String> = BLOCKED_GLOBALS
        .iter()
        .map(|name| name.to_string())
        .chain(extra.iter().cloned())
        .collect();

    // Snapshot before `package` goes away; scripts never see this table.
    let allowed = allowed_modules(lua, &blocked)?;
    lua.set_named_registry_value(ALLOWED_MODULES_KEY, allowed)?;

    for name in &blocked {
        globals.set(name.as_str(), Value::Nil)?;
    }

    let safe_require = lua.create_function(|lua, module: String| {
        let allowed: Table = lua.named_registry_value(ALLOWED_MODULES_KEY)?;
        let found: Value = allowed.get(module.as_str())?;
        if found.is_nil() {
            return Err(mlua::Error::runtime(format!(
                "require '{}' is not allowed in sandbox",
                module
            )));
        }
        Ok(found)
    })?;
    globals.set("require", safe_require)?;

    Ok(())
}

/// Copy of `package.loaded` without the blocked modules.
fn allowed_modules(lua: &Lua, blocked: &[String]) -> mlua::Result<Table> {
    let allowed = lua.create_table()?;
    let loaded = match lua.globals().get::<Value>("package")? {
        Value::Table(package) => package.get::<Value>("loaded")?,
        _ => Value::Nil,
    };
    if let Value::Table(loaded) = loaded {
        for pair in loaded.pairs::<String, Value>() {
            let (name, module) = pair?;
            if !blocked.contains(&name) {
                allowed.set(name, module)?;
            }
        }
    }
    Ok(allowed)
}

/// Check whether the built-in blocked globals are all absent.
pub fn is_sandboxed(lua: &Lua) -> bool {
    let globals = lua.globals();

    BLOCKED_GLOBALS
        .iter()
        .all(|name| matches!(globals.get::<Value>(*name), Ok(Value::Nil)))
}
