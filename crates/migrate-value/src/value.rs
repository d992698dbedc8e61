//! Dynamic value model
//!
//! Provides [`Value`], the uniform currency passed between an instrumented
//! library and its probe. Containers have reference semantics so aliasing and
//! cycles behave the way callers of a dynamic library expect.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// Signature of a native callable stored in a [`Function`]
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, Thrown> + Send + Sync;

/// A dynamically-typed value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Undefined,

    /// Explicit null
    Null,

    /// Boolean
    Bool(bool),

    /// IEEE-754 number
    Number(f64),

    /// UTF-8 string
    String(String),

    /// Shared, mutable list
    Array(Array),

    /// Shared, mutable, insertion-ordered map
    Object(Object),

    /// Callable
    Function(Function),

    /// Unique token
    Symbol(Symbol),

    /// Host handle that cannot be inspected
    Opaque(Opaque),

    /// Chain wrapper surfaced as a value
    Wrapper(Box<ChainWrapper>),
}

impl Value {
    /// Build an array value from items
    #[must_use]
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Array(Array::from_vec(items.into_iter().map(Into::into).collect()))
    }

    /// Build an object value from key/value pairs
    #[must_use]
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let object = Object::new();
        for (key, value) in entries {
            object.insert(key, value);
        }
        Self::Object(object)
    }

    /// `undefined` or `null`
    #[inline]
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Numeric view, if this is a number
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view, if this is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Array handle, if this is an array
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Object handle, if this is an object
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Function handle, if this is a function
    #[inline]
    #[must_use]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Chain wrapper, if this is a wrapper
    #[inline]
    #[must_use]
    pub fn as_wrapper(&self) -> Option<&ChainWrapper> {
        match self {
            Self::Wrapper(w) => Some(w),
            _ => None,
        }
    }

    /// JavaScript-style truthiness
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Short type label used in diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
            Self::Symbol(_) => "symbol",
            Self::Opaque(_) => "opaque",
            Self::Wrapper(_) => "wrapper",
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::inspect(self))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::inspect(self))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(Array::from_vec(value))
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Self::Function(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<Opaque> for Value {
    fn from(value: Opaque) -> Self {
        Self::Opaque(value)
    }
}

impl From<ChainWrapper> for Value {
    fn from(value: ChainWrapper) -> Self {
        Self::Wrapper(Box::new(value))
    }
}

/// Address of the allocation behind an `Arc`, used as an identity key
#[inline]
fn arc_addr<T: ?Sized>(arc: &Arc<T>) -> usize {
    Arc::as_ptr(arc).cast::<()>() as usize
}

/// Shared, mutable list with reference semantics
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    /// Create empty array
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing vector
    #[inline]
    #[must_use]
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Identity of the underlying allocation
    #[inline]
    #[must_use]
    pub fn id(&self) -> usize {
        arc_addr(&self.0)
    }

    /// Whether both handles refer to the same array
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the array has no elements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Element at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Append an element
    #[inline]
    pub fn push(&self, value: impl Into<Value>) {
        self.0.write().push(value.into());
    }

    /// Overwrite the element at `index`, growing with `undefined` as needed
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.0.write();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value.into();
    }

    /// Shallow copy of the current elements
    ///
    /// The lock is released before returning, so callers may recurse into
    /// nested (possibly self-referencing) containers.
    #[inline]
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.0.read().clone()
    }
}

/// Shared, mutable, insertion-ordered map with reference semantics
#[derive(Clone, Default)]
pub struct Object(Arc<RwLock<IndexMap<String, Value>>>);

impl Object {
    /// Create empty object
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the underlying allocation
    #[inline]
    #[must_use]
    pub fn id(&self) -> usize {
        arc_addr(&self.0)
    }

    /// Whether both handles refer to the same object
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of own keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the object has no keys
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Value stored under `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Insert or replace `key`
    #[inline]
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.write().insert(key.into(), value.into());
    }

    /// Shallow copy of the current entries in insertion order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// A callable value
///
/// Identity is the identity of the body; two `Function`s built from the same
/// `Arc` are the same function.
#[derive(Clone)]
pub struct Function {
    name: Option<Arc<str>>,
    explicit_return: bool,
    body: Arc<NativeFn>,
}

impl Function {
    /// Create anonymous function
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        Self {
            name: None,
            explicit_return: false,
            body: Arc::new(body),
        }
    }

    /// Create named function
    pub fn named<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        Self::new(body).with_name(name)
    }

    /// Function returning its first argument
    #[must_use]
    pub fn identity() -> Self {
        Self::named("identity", |args| {
            Ok(args.first().cloned().unwrap_or_default())
        })
    }

    /// Set the display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    /// Mark the function as producing a meaningful return value
    ///
    /// Iteration methods that collect callback results honor this flag when
    /// deciding whether a probe may substitute the callback.
    #[inline]
    #[must_use]
    pub fn with_explicit_return(mut self) -> Self {
        self.explicit_return = true;
        self
    }

    /// Display name, if any
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the caller declared a meaningful return value
    #[inline]
    #[must_use]
    pub fn has_explicit_return(&self) -> bool {
        self.explicit_return
    }

    /// Invoke the function
    ///
    /// # Errors
    /// Returns whatever the body throws
    #[inline]
    pub fn call(&self, args: &[Value]) -> Result<Value, Thrown> {
        (self.body)(args)
    }

    /// Whether both handles share a body
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        arc_addr(&self.body) == arc_addr(&other.body)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("explicit_return", &self.explicit_return)
            .finish_non_exhaustive()
    }
}

/// Unique token compared by identity
#[derive(Debug, Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a fresh symbol
    #[inline]
    #[must_use]
    pub fn new(description: &str) -> Self {
        Self(Arc::from(description))
    }

    /// Description given at creation
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.0
    }

    /// Whether both handles are the same symbol
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        arc_addr(&self.0) == arc_addr(&other.0)
    }
}

/// Host handle with a type label, never structurally inspected
#[derive(Clone)]
pub struct Opaque {
    type_name: Arc<str>,
    handle: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    /// Wrap a host value
    pub fn new<T: Any + Send + Sync>(type_name: &str, handle: T) -> Self {
        Self {
            type_name: Arc::from(type_name),
            handle: Arc::new(handle),
        }
    }

    /// Type label
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the handle as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref()
    }

    /// Whether both handles share an allocation
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        arc_addr(&self.handle) == arc_addr(&other.handle)
    }
}

impl Debug for Opaque {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opaque")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Value wrapper supporting fluent chaining
///
/// `chain_all` controls whether prototype methods keep their results wrapped.
#[derive(Debug, Clone)]
pub struct ChainWrapper {
    /// Wrapped raw value
    pub wrapped: Value,

    /// Explicit chain mode
    pub chain_all: bool,
}

impl ChainWrapper {
    /// Create wrapper
    #[inline]
    #[must_use]
    pub fn new(wrapped: Value, chain_all: bool) -> Self {
        Self { wrapped, chain_all }
    }
}

/// A thrown value, the error half of every call
#[derive(Debug, Clone, thiserror::Error)]
#[error("uncaught {0}")]
pub struct Thrown(pub Value);

impl Thrown {
    /// Throw an arbitrary value
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Throw an error object with `name` and `message`
    #[must_use]
    pub fn error(name: &str, message: impl Into<String>) -> Self {
        Self(Value::object([
            ("name", Value::from(name)),
            ("message", Value::String(message.into())),
        ]))
    }

    /// Throw a `TypeError`
    #[inline]
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::error("TypeError", message)
    }

    /// The thrown value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_has_reference_semantics() {
        let a = Array::new();
        let b = a.clone();
        b.push(1);
        assert_eq!(a.len(), 1);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn array_set_grows_with_undefined() {
        let a = Array::from_vec(vec![Value::from(1)]);
        a.set(3, "x");
        assert_eq!(a.len(), 4);
        assert!(matches!(a.get(2), Some(Value::Undefined)));
    }

    #[test]
    fn object_keeps_insertion_order() {
        let o = Object::new();
        o.insert("b", 1);
        o.insert("a", 2);
        let keys: Vec<_> = o.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn function_identity_follows_body() {
        let f = Function::new(|_| Ok(Value::Null));
        let renamed = f.clone().with_name("g");
        let other = Function::new(|_| Ok(Value::Null));
        assert!(f.ptr_eq(&renamed));
        assert!(!f.ptr_eq(&other));
    }

    #[test]
    fn identity_returns_first_argument() {
        let id = Function::identity();
        let out = id.call(&[Value::from(7), Value::from(8)]).unwrap();
        assert_eq!(out.as_f64(), Some(7.0));
        assert!(matches!(id.call(&[]).unwrap(), Value::Undefined));
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::array(Vec::<Value>::new()).is_truthy());
    }

    #[test]
    fn thrown_type_error_carries_message() {
        let err = Thrown::type_error("nope");
        let obj = err.value().as_object().unwrap();
        assert_eq!(obj.get("name").unwrap().as_str(), Some("TypeError"));
        assert_eq!(obj.get("message").unwrap().as_str(), Some("nope"));
    }

    #[test]
    fn symbols_are_unique() {
        let a = Symbol::new("x");
        let b = Symbol::new("x");
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn opaque_downcasts() {
        let o = Opaque::new("Promise", 42u8);
        assert_eq!(o.type_name(), "Promise");
        assert_eq!(o.downcast_ref::<u8>(), Some(&42));
    }
}
