//! Lua engine hosting registered Rust functions.

use anyhow::{Context, Result};
use mlua::{Lua, Value};

use super::env::{get_at_path, Callable, ScriptEnv};
use super::host::register_host_api;
use super::sandbox::apply_sandbox;
use crate::config::Config;

/// A Lua state plus the operations the rest of the crate runs against it.
pub struct LuaEngine {
    lua: Lua,
}

impl LuaEngine {
    /// Create a new Lua engine with sandbox applied.
    pub fn new() -> Result<Self> {
        let lua = Lua::new();
        apply_sandbox(&lua, &[])?;
        Ok(Self { lua })
    }

    /// Create a new Lua engine with the full standard library.
    pub fn new_unsandboxed() -> Self {
        Self { lua: Lua::new() }
    }

    /// Create an engine as configured, with the host API registered.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = Self::new_unsandboxed();
        register_host_api(&engine, config).context("Failed to register host API")?;
        // Last, so configured blocked globals also cover host exports.
        if config.sandbox {
            apply_sandbox(&engine.lua, &config.blocked_globals)?;
        }
        Ok(engine)
    }

    /// Evaluate a Lua expression and return the result as a string.
    pub fn eval<S: AsRef<str>>(&self, code: S) -> Result<String> {
        let result = self.eval_value(code)?;
        Ok(format_value(&result))
    }

    /// Evaluate a Lua expression and return the raw value.
    pub fn eval_value<S: AsRef<str>>(&self, code: S) -> Result<Value> {
        self.lua
            .load(code.as_ref())
            .eval()
            .context("Failed to evaluate Lua code")
    }

    /// Execute Lua code without returning a value.
    pub fn exec<S: AsRef<str>>(&self, code: S) -> Result<()> {
        self.lua
            .load(code.as_ref())
            .exec()
            .context("Failed to execute Lua code")
    }

    /// Get a global value.
    pub fn get_global<S: AsRef<str>>(&self, name: S) -> Result<Value> {
        self.lua
            .globals()
            .get(name.as_ref())
            .context("Failed to get global")
    }

    /// Set a global value.
    pub fn set_global<S: AsRef<str>>(&self, name: S, value: Value) -> Result<()> {
        self.lua
            .globals()
            .set(name.as_ref(), value)
            .context("Failed to set global")
    }

    /// Resolve a dotted path such as `Color.Red` from the globals table.
    pub fn get_path<S: AsRef<str>>(&self, path: S) -> Result<Value> {
        let path = path.as_ref();
        get_at_path(&self.lua, path).with_context(|| format!("Failed to resolve '{}'", path))
    }

    /// Get access to the underlying Lua state.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

impl ScriptEnv for LuaEngine {
    fn register_function(&self, key: &str, callable: Callable) -> mlua::Result<()> {
        self.lua.register_function(key, callable)
    }

    fn new_table(&self, name: &str) -> mlua::Result<()> {
        self.lua.new_table(name)
    }

    fn set_value_at_path(&self, path: &str, value: Value) -> mlua::Result<()> {
        self.lua.set_value_at_path(path, value)
    }
}

/// Format a Lua value as a string for display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.to_string_lossy().to_string(),
        Value::Table(_) => "<table>".to_string(),
        Value::Function(_) => "<function>".to_string(),
        Value::Thread(_) => "<thread>".to_string(),
        Value::UserData(_) => "<userdata>".to_string(),
        Value::LightUserData(_) => "<lightuserdata>".to_string(),
        Value::Error(e) => format!("<error: {}>", e),
        _ => "<unknown>".to_string(),
    }
}
