//! Enumerations exported to Lua as tables of named integers.

/// An enum type whose members can be exported to Lua.
///
/// Usually implemented through [`lua_enum!`](crate::lua_enum).
pub trait LuaEnum: 'static {
    /// Name of the Lua table holding the members.
    const NAME: &'static str;
    /// Member names and underlying values, in declaration order.
    const MEMBERS: &'static [(&'static str, i64)];
}

/// Declare a fieldless `#[repr(i64)]` enum and implement [`LuaEnum`] for it.
///
/// ```
/// luatag::lua_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Color {
///         Red,
///         Green = 5,
///         Blue,
///     }
/// }
///
/// use luatag::LuaEnum;
/// assert_eq!(Color::NAME, "Color");
/// assert_eq!(Color::MEMBERS, &[("Red", 0), ("Green", 5), ("Blue", 6)]);
/// ```
#[macro_export]
macro_rules! lua_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $value:expr)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i64)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(= $value)?
            ),+
        }

        impl $crate::LuaEnum for $name {
            const NAME: &'static str = stringify!($name);
            const MEMBERS: &'static [(&'static str, i64)] =
                &[$((stringify!($variant), $name::$variant as i64)),+];
        }
    };
}

/// Runtime description of an enum: its name and ordered members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    name: String,
    members: Vec<(String, i64)>,
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn of<E: LuaEnum>() -> Self {
        Self {
            name: E::NAME.to_string(),
            members: E::MEMBERS
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push((name.into(), value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[(String, i64)] {
        &self.members
    }
}
