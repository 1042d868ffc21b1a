//! The host API scripts see, registered through the registrar.
//!
//! Everything here is exposed under the configured namespace (`host` by default),
//! plus the `LogLevel` enum as a global table.

use std::collections::BTreeMap;
use std::sync::Arc;

use mlua::{Lua, LuaSerdeExt, Value};

use super::env::ScriptEnv;
use crate::config::Config;
use crate::error::Result;
use crate::registrar::{
    register_enum, register_tagged_instance_methods, register_tagged_static_methods, LuaGlobal,
    LuaMethods, MethodTable,
};

crate::lua_enum! {
    /// Severity accepted by `log`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LogLevel {
        Trace,
        Debug,
        Info,
        Warn,
        Error,
    }
}

impl LogLevel {
    /// Accept either a `LogLevel` member value or a level name.
    fn from_lua_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Self::from_value(*i),
            Value::Number(n) if n.fract() == 0.0 => Self::from_value(*n as i64),
            Value::String(s) => Self::from_name(&s.to_string_lossy()),
            _ => None,
        }
    }

    fn from_value(value: i64) -> Option<Self> {
        [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ]
        .into_iter()
        .find(|level| *level as i64 == value)
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// State behind the host API.
pub struct HostApi {
    params: BTreeMap<String, serde_json::Value>,
}

impl HostApi {
    pub fn new(params: BTreeMap<String, serde_json::Value>) -> Self {
        Self { params }
    }

    fn get_param(&self, lua: &Lua, name: &str, default: Value) -> mlua::Result<Value> {
        match self.params.get(name) {
            Some(value) => lua.to_value(value),
            None => Ok(default),
        }
    }

    fn param_names(&self) -> Vec<String> {
        self.params.keys().cloned().collect()
    }
}

impl LuaMethods for HostApi {
    fn methods(methods: &mut MethodTable<Self>) {
        methods
            .method("get_param", |lua, this, (name, default): (String, Value)| {
                this.get_param(lua, &name, default)
            })
            .tag(LuaGlobal::new().with_description(
                "Look up a configured parameter, falling back to the given default",
            ));

        methods
            .method("param_names", |_, this, ()| Ok(this.param_names()))
            .tag(LuaGlobal::named("params").with_description("Names of configured parameters"));

        methods
            .method("log", |_, _this, (level, message): (Value, String)| {
                let level = LogLevel::from_lua_value(&level).ok_or_else(|| {
                    mlua::Error::runtime(format!("unknown log level: {:?}", level))
                })?;
                log_message(level, &message);
                Ok(())
            })
            .tag(LuaGlobal::new().with_description("Log a message at a LogLevel"));

        methods
            .function("cosine_similarity", |_, (a, b): (Vec<f64>, Vec<f64>)| {
                Ok(cosine_similarity(&a, &b))
            })
            .tag(LuaGlobal::new().with_description("Cosine similarity of two number arrays"))
            .tag(LuaGlobal::named("cosine").with_description("Alias of cosine_similarity"));

        methods
            .function("version", |_, ()| Ok(env!("CARGO_PKG_VERSION")))
            .tag(LuaGlobal::new().with_description("Version of the host"));
    }
}

/// Register the host API and `LogLevel` into `env` as `config` describes.
pub fn register_host_api(env: &(impl ScriptEnv + ?Sized), config: &Config) -> Result<()> {
    let api = Arc::new(HostApi::new(config.params.clone()));
    register_tagged_instance_methods(env, api, &config.namespace)?;
    register_tagged_static_methods::<HostApi>(env, &config.namespace)?;
    register_enum::<LogLevel>(env)?;
    Ok(())
}

/// Compute cosine similarity between two vectors.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

fn log_message(level: LogLevel, message: &str) {
    match level {
        LogLevel::Trace => tracing::trace!(target: "lua", "{}", message),
        LogLevel::Debug => tracing::debug!(target: "lua", "{}", message),
        LogLevel::Info => tracing::info!(target: "lua", "{}", message),
        LogLevel::Warn => tracing::warn!(target: "lua", "{}", message),
        LogLevel::Error => tracing::error!(target: "lua", "{}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrar::{tagged_exports, MethodFilter};

    fn lua_with_api(params: &[(&str, serde_json::Value)]) -> Lua {
        let lua = Lua::new();
        let config = Config {
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            ..Config::default()
        };
        register_host_api(&lua, &config).unwrap();
        lua
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-10);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[-1.0, -2.0, -3.0]);
        assert!((sim - (-1.0)).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_similarity_empty() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_different_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_register_host_api() {
        let lua = lua_with_api(&[]);
        let host: mlua::Table = lua.globals().get("host").unwrap();
        for name in ["get_param", "params", "log", "cosine_similarity", "cosine", "version"] {
            assert!(host.get::<mlua::Function>(name).is_ok(), "missing {}", name);
        }
        assert!(host.get::<Value>("param_names").unwrap().is_nil());
    }

    #[test]
    fn test_cosine_alias_from_lua() {
        let lua = lua_with_api(&[]);
        let result: f64 = lua
            .load("return host.cosine({1.0, 2.0, 3.0}, {1.0, 2.0, 3.0})")
            .eval()
            .unwrap();
        assert!((result - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_get_param_returns_default() {
        let lua = lua_with_api(&[]);
        let result: i32 = lua
            .load(r#"return host.get_param("unknown_param", 42)"#)
            .eval()
            .unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn test_get_param_returns_configured() {
        let lua = lua_with_api(&[("threshold", serde_json::json!(0.25))]);
        let result: f64 = lua
            .load(r#"return host.get_param("threshold", 1.0)"#)
            .eval()
            .unwrap();
        assert_eq!(result, 0.25);
    }

    #[test]
    fn test_params_sorted() {
        let lua = lua_with_api(&[
            ("zeta", serde_json::json!(1)),
            ("alpha", serde_json::json!(2)),
        ]);
        let names: Vec<String> = lua.load("return host.params()").eval().unwrap();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_log_levels_from_lua() {
        let lua = lua_with_api(&[]);
        lua.load(r#"host.log(LogLevel.Warn, "by value"); host.log("info", "by name")"#)
            .exec()
            .unwrap();
        let result = lua.load(r#"host.log("loud", "nope")"#).exec();
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_enum_registered() {
        let lua = lua_with_api(&[]);
        let error: i64 = lua.load("return LogLevel.Error").eval().unwrap();
        assert_eq!(error, LogLevel::Error as i64);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_lua_value(&Value::Integer(3)), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_lua_value(&Value::Number(1.0)), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_lua_value(&Value::Integer(9)), None);
        assert_eq!(LogLevel::from_name("WARNING"), Some(LogLevel::Warn));
    }

    #[test]
    fn test_exports_list() {
        let exports = tagged_exports::<HostApi>(MethodFilter::PUBLIC_STATIC, "host").unwrap();
        let keys: Vec<&str> = exports.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["host.cosine_similarity", "host.cosine", "host.version"]);
    }
}
