//! The `LuaGlobal` marker.

/// Marks a method for global usage in Lua scripts.
///
/// Attach it to a method through [`MethodEntry::tag`](super::MethodEntry::tag).
/// A method may carry several markers; each one produces its own registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LuaGlobal {
    /// Alternative name to call the function by in Lua. Unset or empty means the declared name.
    pub name: Option<String>,
    /// Human-readable description of the function.
    pub description: Option<String>,
}

impl LuaGlobal {
    /// A marker that keeps the method's declared name.
    pub fn new() -> Self {
        Self::default()
    }

    /// A marker that exposes the method under `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The name the method is exposed under.
    pub fn exposed_name<'a>(&'a self, declared: &'a str) -> &'a str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => declared,
        }
    }
}
