//! Library registry
//!
//! A [`Library`] is a named function table: a static surface, a chain-wrapper
//! prototype surface, and an optional context factory producing fresh,
//! independently configured instances.

use crate::chain::ChainOutput;
use indexmap::IndexMap;
use migrate_value::{ChainWrapper, Thrown, Value};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Uniform method signature
pub type MethodFn = dyn Fn(&Receiver, &[Value]) -> Result<Value, Thrown> + Send + Sync;

/// Factory producing a fresh library for an optional context value
pub type ContextFactory = Arc<dyn Fn(Option<&Value>) -> Result<Library, Thrown> + Send + Sync>;

/// Which surface of a library a method lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Static function table
    Static,

    /// Chain-wrapper prototype
    Prototype,
}

/// The `this` of a call
#[derive(Debug, Clone)]
pub enum Receiver {
    /// Called on the library itself
    Static,

    /// Called on a chain wrapper
    Chain(ChainWrapper),
}

impl Receiver {
    /// Wrapped value, `undefined` for static calls
    #[inline]
    #[must_use]
    pub fn wrapped(&self) -> Value {
        match self {
            Self::Static => Value::Undefined,
            Self::Chain(wrapper) => wrapper.wrapped.clone(),
        }
    }

    /// Chain mode flag, `false` for static calls
    #[inline]
    #[must_use]
    pub fn chain_all(&self) -> bool {
        match self {
            Self::Static => false,
            Self::Chain(wrapper) => wrapper.chain_all,
        }
    }
}

/// A named callable entry in a library
#[derive(Clone)]
pub struct Method {
    name: Arc<str>,
    func: Arc<MethodFn>,
}

impl Method {
    /// Create method
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with a receiver
    ///
    /// # Errors
    /// Returns whatever the method throws
    #[inline]
    pub fn call(&self, receiver: &Receiver, args: &[Value]) -> Result<Value, Thrown> {
        (self.func)(receiver, args)
    }

    /// Invoke as a static function
    ///
    /// # Errors
    /// Returns whatever the method throws
    #[inline]
    pub fn call_static(&self, args: &[Value]) -> Result<Value, Thrown> {
        self.call(&Receiver::Static, args)
    }
}

impl Debug for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Method").field(&self.name).finish()
    }
}

/// Options for [`Library::mixin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixinOptions {
    /// Always wrap results of the prototype form
    pub chain: bool,
}

impl MixinOptions {
    /// Prototype form returns raw results unless the wrapper is in chain mode
    #[inline]
    #[must_use]
    pub fn unchained() -> Self {
        Self { chain: false }
    }
}

impl Default for MixinOptions {
    fn default() -> Self {
        Self { chain: true }
    }
}

/// A versioned function table
#[derive(Clone)]
pub struct Library {
    version: String,
    statics: IndexMap<String, Method>,
    prototype: IndexMap<String, Method>,
    context_factory: Option<ContextFactory>,
}

impl Library {
    /// Create empty library
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            statics: IndexMap::new(),
            prototype: IndexMap::new(),
            context_factory: None,
        }
    }

    /// Version label
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Define or replace a static method
    pub fn define_static<F>(&mut self, name: &str, func: F) -> &mut Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        self.install(Surface::Static, Method::new(name, func))
    }

    /// Define or replace a prototype method
    pub fn define_prototype<F>(&mut self, name: &str, func: F) -> &mut Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        self.install(Surface::Prototype, Method::new(name, func))
    }

    /// Install a method under its own name on `surface`
    pub fn install(&mut self, surface: Surface, method: Method) -> &mut Self {
        let table = match surface {
            Surface::Static => &mut self.statics,
            Surface::Prototype => &mut self.prototype,
        };
        table.insert(method.name().to_string(), method);
        self
    }

    /// Set the context factory
    pub fn with_context_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(Option<&Value>) -> Result<Library, Thrown> + Send + Sync + 'static,
    {
        self.context_factory = Some(Arc::new(factory));
        self
    }

    /// The context factory, if any
    #[inline]
    #[must_use]
    pub fn context_factory(&self) -> Option<&ContextFactory> {
        self.context_factory.as_ref()
    }

    /// Method `name` on `surface`
    #[inline]
    #[must_use]
    pub fn method(&self, surface: Surface, name: &str) -> Option<&Method> {
        match surface {
            Surface::Static => self.statics.get(name),
            Surface::Prototype => self.prototype.get(name),
        }
    }

    /// Static method `name`
    #[inline]
    #[must_use]
    pub fn static_method(&self, name: &str) -> Option<&Method> {
        self.statics.get(name)
    }

    /// Prototype method `name`
    #[inline]
    #[must_use]
    pub fn prototype_method(&self, name: &str) -> Option<&Method> {
        self.prototype.get(name)
    }

    /// Static method names in definition order
    pub fn static_names(&self) -> impl Iterator<Item = &str> {
        self.statics.keys().map(String::as_str)
    }

    /// Prototype method names in definition order
    pub fn prototype_names(&self) -> impl Iterator<Item = &str> {
        self.prototype.keys().map(String::as_str)
    }

    /// Call static method `name`
    ///
    /// # Errors
    /// Throws a `TypeError` if `name` is not defined, otherwise whatever the
    /// method throws
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, Thrown> {
        match self.statics.get(name) {
            Some(method) => method.call_static(args),
            None => Err(Thrown::type_error(format!("{name} is not a function"))),
        }
    }

    /// Call prototype method `name` on `wrapper`
    ///
    /// # Errors
    /// Throws a `TypeError` if `name` is not defined, otherwise whatever the
    /// method throws
    pub fn call_chain(
        &self,
        wrapper: &ChainWrapper,
        name: &str,
        args: &[Value],
    ) -> Result<Value, Thrown> {
        match self.prototype.get(name) {
            Some(method) => method.call(&Receiver::Chain(wrapper.clone()), args),
            None => Err(Thrown::type_error(format!("{name} is not a function"))),
        }
    }

    /// Wrap a value for implicit chaining
    #[inline]
    #[must_use]
    pub fn wrap(&self, value: impl Into<Value>) -> ChainWrapper {
        ChainWrapper::new(value.into(), false)
    }

    /// Wrap a value for explicit chaining
    #[inline]
    #[must_use]
    pub fn chain(&self, value: impl Into<Value>) -> ChainWrapper {
        ChainWrapper::new(value.into(), true)
    }

    /// Add a function to both surfaces
    ///
    /// The prototype form calls `method` with the wrapped value prepended to
    /// its arguments. Its result is wrapped when `options.chain` is set or the
    /// receiver is in chain mode, and returned raw otherwise.
    pub fn mixin(&mut self, name: &str, method: Method, options: MixinOptions) -> &mut Self {
        self.statics.insert(name.to_string(), method.clone());
        self.define_prototype(name, move |receiver, args| {
            let chain_all = receiver.chain_all();
            let mut call_args = Vec::with_capacity(args.len() + 1);
            call_args.push(receiver.wrapped());
            call_args.extend_from_slice(args);

            let result = method.call_static(&call_args)?;
            Ok(ChainOutput::select(result, chain_all, options.chain).into())
        })
    }

    /// Build a fresh library through the context factory
    ///
    /// # Errors
    /// Throws a `TypeError` if the library has no context factory, otherwise
    /// whatever the factory throws
    pub fn run_in_context(&self, context: Option<&Value>) -> Result<Library, Thrown> {
        match &self.context_factory {
            Some(factory) => factory(context),
            None => Err(Thrown::type_error("runInContext is not a function")),
        }
    }
}

impl Debug for Library {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("version", &self.version)
            .field("statics", &self.statics.keys().collect::<Vec<_>>())
            .field("prototype", &self.prototype.keys().collect::<Vec<_>>())
            .field("context_factory", &self.context_factory.is_some())
            .finish()
    }
}
