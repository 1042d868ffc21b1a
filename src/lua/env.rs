//! The registration surface of a Lua environment.
//!
//! Keys are dotted paths resolved from the globals table, so `"math2.clamp"`
//! lands in `_G.math2.clamp`. Missing intermediate tables are created on write.

use std::sync::Arc;

use mlua::{Lua, MultiValue, Table, Value};

/// A function callable from Lua, with any receiver already bound.
pub type Callable = Arc<dyn Fn(&Lua, MultiValue) -> mlua::Result<MultiValue> + Send + Sync>;

/// Path separator inside registration keys.
pub const SEPARATOR: char = '.';

/// Operations the registrar needs from a scripting environment.
pub trait ScriptEnv {
    /// Bind `callable` under the dotted `key`.
    fn register_function(&self, key: &str, callable: Callable) -> mlua::Result<()>;

    /// Create an empty table at `name`, replacing whatever was there.
    fn new_table(&self, name: &str) -> mlua::Result<()>;

    /// Store `value` at the dotted `path`.
    fn set_value_at_path(&self, path: &str, value: Value) -> mlua::Result<()>;
}

impl ScriptEnv for Lua {
    fn register_function(&self, key: &str, callable: Callable) -> mlua::Result<()> {
        let function = self.create_function(move |lua, args: MultiValue| callable(lua, args))?;
        set_at_path(self, key, Value::Function(function))
    }

    fn new_table(&self, name: &str) -> mlua::Result<()> {
        let table = Lua::create_table(self)?;
        set_at_path(self, name, Value::Table(table))
    }

    fn set_value_at_path(&self, path: &str, value: Value) -> mlua::Result<()> {
        set_at_path(self, path, value)
    }
}

/// Store `value` at a dotted path, creating intermediate tables.
pub fn set_at_path(lua: &Lua, path: &str, value: Value) -> mlua::Result<()> {
    let (parents, leaf) = match path.rsplit_once(SEPARATOR) {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut table = lua.globals();
    if let Some(parents) = parents {
        for segment in parents.split(SEPARATOR) {
            table = child_table(lua, &table, segment, path)?;
        }
    }

    table.set(leaf, value)
}

/// Resolve a dotted path to a value. Missing segments resolve to `nil`.
pub fn get_at_path(lua: &Lua, path: &str) -> mlua::Result<Value> {
    let mut current = Value::Table(lua.globals());
    for segment in path.split(SEPARATOR) {
        current = match current {
            Value::Table(table) => table.get(segment)?,
            Value::Nil => return Ok(Value::Nil),
            other => return Err(not_a_table(segment, path, &other)),
        };
    }
    Ok(current)
}

fn child_table(lua: &Lua, parent: &Table, segment: &str, path: &str) -> mlua::Result<Table> {
    match parent.get::<Value>(segment)? {
        Value::Table(table) => Ok(table),
        Value::Nil => {
            let table = lua.create_table()?;
            parent.set(segment, table.clone())?;
            Ok(table)
        }
        other => Err(not_a_table(segment, path, &other)),
    }
}

fn not_a_table(segment: &str, path: &str, value: &Value) -> mlua::Error {
    mlua::Error::runtime(format!(
        "cannot index '{}' in path '{}': value is a {}",
        segment,
        path,
        value.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_global() {
        let lua = Lua::new();
        set_at_path(&lua, "answer", Value::Integer(42)).unwrap();
        assert_eq!(lua.globals().get::<i64>("answer").unwrap(), 42);
    }

    #[test]
    fn test_set_creates_intermediate_tables() {
        let lua = Lua::new();
        set_at_path(&lua, "a.b.c", Value::Integer(7)).unwrap();
        let result: i64 = lua.load("return a.b.c").eval().unwrap();
        assert_eq!(result, 7);
    }

    #[test]
    fn test_set_reuses_existing_table() {
        let lua = Lua::new();
        lua.load("ns = { keep = true }").exec().unwrap();
        set_at_path(&lua, "ns.added", Value::Integer(1)).unwrap();
        let keep: bool = lua.load("return ns.keep").eval().unwrap();
        assert!(keep);
    }

    #[test]
    fn test_set_through_non_table_fails() {
        let lua = Lua::new();
        lua.load("ns = 5").exec().unwrap();
        let err = set_at_path(&lua, "ns.x", Value::Integer(1)).unwrap_err();
        assert!(err.to_string().contains("value is a integer"));
    }

    #[test]
    fn test_empty_segment_is_a_key() {
        let lua = Lua::new();
        set_at_path(&lua, "ns..x", Value::Integer(3)).unwrap();
        let result: i64 = lua.load(r#"return ns[""].x"#).eval().unwrap();
        assert_eq!(result, 3);
    }

    #[test]
    fn test_get_missing_is_nil() {
        let lua = Lua::new();
        assert!(get_at_path(&lua, "nothing.here").unwrap().is_nil());
    }

    #[test]
    fn test_get_nested() {
        let lua = Lua::new();
        lua.load("t = { inner = { v = 'x' } }").exec().unwrap();
        let value = get_at_path(&lua, "t.inner.v").unwrap();
        assert_eq!(lua.unpack::<String>(value).unwrap(), "x");
    }

    #[test]
    fn test_register_function_on_lua() {
        let lua = Lua::new();
        let callable: Callable =
            Arc::new(|_lua: &Lua, args: MultiValue| -> mlua::Result<MultiValue> { Ok(args) });
        lua.register_function("util.echo", callable).unwrap();
        let result: String = lua.load("return util.echo('hi')").eval().unwrap();
        assert_eq!(result, "hi");
    }

    #[test]
    fn test_new_table_replaces() {
        let lua = Lua::new();
        lua.load("Mode = { old = 1 }").exec().unwrap();
        lua.new_table("Mode").unwrap();
        assert!(get_at_path(&lua, "Mode.old").unwrap().is_nil());
    }
}
