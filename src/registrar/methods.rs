//! Method tables: the explicit list of methods a host type offers to Lua.

use std::sync::Arc;

use bitflags::bitflags;
use mlua::{FromLuaMulti, IntoLuaMulti, Lua, MultiValue};
use serde::Serialize;

use super::marker::LuaGlobal;
use crate::lua::Callable;

/// A method that needs a receiver, with arguments and results already erased to Lua values.
pub type BoundFn<T> = Arc<dyn Fn(&Lua, &T, MultiValue) -> mlua::Result<MultiValue> + Send + Sync>;

bitflags! {
    /// Which methods of a type to enumerate.
    ///
    /// A method is selected when both its binding flag and its visibility flag are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodFilter: u8 {
        const INSTANCE = 1;
        const STATIC = 1 << 1;
        const PUBLIC = 1 << 2;
        const NON_PUBLIC = 1 << 3;
    }
}

impl MethodFilter {
    pub const PUBLIC_INSTANCE: Self = Self::INSTANCE.union(Self::PUBLIC);
    pub const PUBLIC_STATIC: Self = Self::STATIC.union(Self::PUBLIC);
}

/// Whether a method takes a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Instance,
    Static,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Instance => "instance",
            BindingKind::Static => "static",
        }
    }

    fn flag(&self) -> MethodFilter {
        match self {
            BindingKind::Instance => MethodFilter::INSTANCE,
            BindingKind::Static => MethodFilter::STATIC,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    NonPublic,
}

impl Visibility {
    fn flag(&self) -> MethodFilter {
        match self {
            Visibility::Public => MethodFilter::PUBLIC,
            Visibility::NonPublic => MethodFilter::NON_PUBLIC,
        }
    }
}

pub(crate) enum Binding<T> {
    Instance(BoundFn<T>),
    Static(Callable),
}

impl<T> Binding<T> {
    pub(crate) fn kind(&self) -> BindingKind {
        match self {
            Binding::Instance(_) => BindingKind::Instance,
            Binding::Static(_) => BindingKind::Static,
        }
    }
}

/// One declared method.
pub struct MethodInfo<T> {
    pub(crate) name: String,
    pub(crate) binding: Binding<T>,
    pub(crate) visibility: Visibility,
    pub(crate) markers: Vec<LuaGlobal>,
}

impl<T> MethodInfo<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BindingKind {
        self.binding.kind()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn markers(&self) -> &[LuaGlobal] {
        &self.markers
    }

    pub fn matches(&self, filter: MethodFilter) -> bool {
        filter.contains(self.kind().flag()) && filter.contains(self.visibility.flag())
    }
}

/// A host type whose methods can be registered into Lua.
///
/// Implementations declare every method once, marking the ones Lua should see:
///
/// ```
/// use luatag::{LuaGlobal, LuaMethods, MethodTable};
///
/// struct Counter {
///     start: i64,
/// }
///
/// impl LuaMethods for Counter {
///     fn methods(methods: &mut MethodTable<Self>) {
///         methods
///             .method("start", |_, this, ()| Ok(this.start))
///             .tag(LuaGlobal::new());
///         methods
///             .function("double", |_, n: i64| Ok(n * 2))
///             .tag(LuaGlobal::named("twice"));
///     }
/// }
/// ```
pub trait LuaMethods: Send + Sync + Sized + 'static {
    fn methods(methods: &mut MethodTable<Self>);
}

/// The methods declared by a [`LuaMethods`] type, in declaration order.
pub struct MethodTable<T> {
    methods: Vec<MethodInfo<T>>,
}

impl<T: LuaMethods> MethodTable<T> {
    /// Enumerate the methods `T` declares.
    pub fn of() -> Self {
        let mut table = Self {
            methods: Vec::new(),
        };
        T::methods(&mut table);
        table
    }
}

impl<T: Send + Sync + 'static> MethodTable<T> {
    /// Declare a method called with a receiver.
    pub fn method<A, R, F>(&mut self, name: &str, func: F) -> MethodEntry<'_, T>
    where
        A: FromLuaMulti,
        R: IntoLuaMulti,
        F: Fn(&Lua, &T, A) -> mlua::Result<R> + Send + Sync + 'static,
    {
        let bound: BoundFn<T> = Arc::new(move |lua: &Lua, this: &T, args: MultiValue| {
            let args = A::from_lua_multi(args, lua)?;
            func(lua, this, args)?.into_lua_multi(lua)
        });
        self.push(name, Binding::Instance(bound))
    }

    /// Declare a method called without a receiver.
    pub fn function<A, R, F>(&mut self, name: &str, func: F) -> MethodEntry<'_, T>
    where
        A: FromLuaMulti,
        R: IntoLuaMulti,
        F: Fn(&Lua, A) -> mlua::Result<R> + Send + Sync + 'static,
    {
        let callable: Callable = Arc::new(move |lua: &Lua, args: MultiValue| {
            let args = A::from_lua_multi(args, lua)?;
            func(lua, args)?.into_lua_multi(lua)
        });
        self.push(name, Binding::Static(callable))
    }

    fn push(&mut self, name: &str, binding: Binding<T>) -> MethodEntry<'_, T> {
        self.methods.push(MethodInfo {
            name: name.to_string(),
            binding,
            visibility: Visibility::Public,
            markers: Vec::new(),
        });
        let last = self.methods.len() - 1;
        MethodEntry {
            info: &mut self.methods[last],
        }
    }
}

impl<T> MethodTable<T> {
    pub fn iter(&self) -> impl Iterator<Item = &MethodInfo<T>> {
        self.methods.iter()
    }

    /// Methods selected by `filter`, in declaration order.
    pub fn select(&self, filter: MethodFilter) -> impl Iterator<Item = &MethodInfo<T>> {
        self.methods.iter().filter(move |m| m.matches(filter))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Builder handle for the method just declared.
pub struct MethodEntry<'a, T> {
    info: &'a mut MethodInfo<T>,
}

impl<T> MethodEntry<'_, T> {
    /// Attach a marker. Each marker is registered independently.
    pub fn tag(self, marker: LuaGlobal) -> Self {
        self.info.markers.push(marker);
        self
    }

    /// Exclude the method from the public presets.
    pub fn private(self) -> Self {
        self.info.visibility = Visibility::NonPublic;
        self
    }
}
