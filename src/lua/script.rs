//! Loading and running Lua scripts against an engine.

use std::path::Path;

use anyhow::{Context, Result};
use mlua::Value;

use super::engine::LuaEngine;

/// A named chunk of Lua source.
pub struct Script {
    name: String,
    source: String,
}

impl Script {
    /// Load a script from a file; its name is the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = script_name(path)?;
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;

        Ok(Self { name, source })
    }

    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Run the script and return what it returns.
    pub fn run(&self, engine: &LuaEngine) -> Result<Value> {
        engine
            .lua()
            .load(self.source())
            .set_name(self.name.as_str())
            .eval()
            .with_context(|| format!("Failed to run script '{}'", self.name))
    }
}

fn script_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid script path: {}", path.display()))?;

    Ok(stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_returns_value() {
        let engine = LuaEngine::new_unsandboxed();
        let script = Script::from_source("sum", "local a, b = 2, 3\nreturn a * b");
        let value = script.run(&engine).unwrap();
        assert_eq!(value, Value::Integer(6));
    }

    #[test]
    fn test_run_without_return_is_nil() {
        let engine = LuaEngine::new_unsandboxed();
        let script = Script::from_source("side_effect", "touched = true");
        assert!(script.run(&engine).unwrap().is_nil());
        assert_eq!(engine.eval("return touched").unwrap(), "true");
    }

    #[test]
    fn test_error_names_script() {
        let engine = LuaEngine::new_unsandboxed();
        let script = Script::from_source("broken", "error('boom')");
        let err = script.run(&engine).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_from_file_uses_stem() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("startup.lua");
        std::fs::write(&path, "return 1").unwrap();

        let script = Script::from_file(&path).unwrap();
        assert_eq!(script.name(), "startup");
        assert_eq!(script.source(), "return 1");
    }

    #[test]
    fn test_from_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(Script::from_file(temp.path().join("absent.lua")).is_err());
    }
}
