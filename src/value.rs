//! The dynamic values handed to the renderers.
//!
//! Containers are shared handles: cloning a [`List`] clones the handle, so a
//! list can be pushed into itself. Such graphs keep themselves alive; that is
//! accepted for the short-lived values built for diagnostics.

use crate::any_value::Object;
use crate::class::{self, Class, Type, TypeKey};
use crate::error::MapperError;
use crate::render;
use parking_lot::{RwLock, RwLockReadGuard};
use rust_decimal::Decimal;
use std::any::type_name;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A value that can be rendered.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Decimal(Decimal),
    Path(PathBuf),
    String(String),
    BoolArray(Arc<[bool]>),
    ByteArray(Arc<[i8]>),
    CharArray(Arc<[char]>),
    ShortArray(Arc<[i16]>),
    IntArray(Arc<[i32]>),
    LongArray(Arc<[i64]>),
    FloatArray(Arc<[f32]>),
    DoubleArray(Arc<[f64]>),
    /// An array of non-primitive elements
    Array(Array),
    List(List),
    Set(Set),
    Map(Map),
    Throwable(Throwable),
    Object(Arc<dyn Object>),
}

impl Value {
    /// Wraps a user-defined object.
    pub fn object<T: Object>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    /// The value's runtime type, or `None` for [`Value::Null`].
    pub fn runtime_type(&self) -> Option<Type> {
        let ty = match self {
            Value::Null => return None,
            Value::Bool(_) => Type::Class(&class::BOOLEAN),
            Value::Byte(_) => Type::Class(&class::BYTE),
            Value::Short(_) => Type::Class(&class::SHORT),
            Value::Int(_) => Type::Class(&class::INT),
            Value::Long(_) => Type::Class(&class::LONG),
            Value::Float(_) => Type::Class(&class::FLOAT),
            Value::Double(_) => Type::Class(&class::DOUBLE),
            Value::Char(_) => Type::Class(&class::CHAR),
            Value::Decimal(_) => Type::Class(&class::BIG_DECIMAL),
            Value::Path(_) => Type::Class(&class::PATH),
            Value::String(_) => Type::Class(&class::STRING),
            Value::BoolArray(_) => Type::Array(&class::BOOLEAN),
            Value::ByteArray(_) => Type::Array(&class::BYTE),
            Value::CharArray(_) => Type::Array(&class::CHAR),
            Value::ShortArray(_) => Type::Array(&class::SHORT),
            Value::IntArray(_) => Type::Array(&class::INT),
            Value::LongArray(_) => Type::Array(&class::LONG),
            Value::FloatArray(_) => Type::Array(&class::FLOAT),
            Value::DoubleArray(_) => Type::Array(&class::DOUBLE),
            Value::Array(array) => Type::Array(array.component()),
            Value::List(list) => Type::Class(list.class()),
            Value::Set(set) => Type::Class(set.class()),
            Value::Map(map) => Type::Class(map.class()),
            Value::Throwable(throwable) => Type::Class(throwable.class()),
            Value::Object(object) => Type::Class(object.class()),
        };
        Some(ty)
    }

    pub fn type_key(&self) -> TypeKey {
        self.runtime_type().into()
    }

    /// Handle address for arrays and containers; `None` for plain values.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::BoolArray(a) => Some(address(a)),
            Value::ByteArray(a) => Some(address(a)),
            Value::CharArray(a) => Some(address(a)),
            Value::ShortArray(a) => Some(address(a)),
            Value::IntArray(a) => Some(address(a)),
            Value::LongArray(a) => Some(address(a)),
            Value::FloatArray(a) => Some(address(a)),
            Value::DoubleArray(a) => Some(address(a)),
            Value::Array(a) => Some(a.identity()),
            Value::List(l) => Some(l.identity()),
            Value::Set(s) => Some(s.identity()),
            Value::Map(m) => Some(m.identity()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Value::BoolArray(_)
                | Value::ByteArray(_)
                | Value::CharArray(_)
                | Value::ShortArray(_)
                | Value::IntArray(_)
                | Value::LongArray(_)
                | Value::FloatArray(_)
                | Value::DoubleArray(_)
                | Value::Array(_)
        )
    }

    /// Natural ordering between two values.
    ///
    /// Returns `None` when the values are not mutually comparable: different
    /// kinds, containers, null, or objects whose `compare_to` declines.
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Byte(a), Value::Byte(b)) => Some(a.cmp(b)),
            (Value::Short(a), Value::Short(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
            (Value::Double(a), Value::Double(b)) => Some(a.total_cmp(b)),
            (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Path(a), Value::Path(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Object(a), Value::Object(b)) => a.compare_to(&**b),
            _ => None,
        }
    }

    /// Borrows the wrapped object as its concrete type.
    ///
    /// # Errors
    ///
    /// Returns `MapperError::TypeMismatch` if the value is not an object of
    /// type `T`.
    pub fn downcast_object<T: Object>(&self) -> Result<&T, MapperError> {
        match self {
            Value::Object(object) => (**object)
                .as_any()
                .downcast_ref::<T>()
                .ok_or_else(|| MapperError::TypeMismatch {
                    expected: type_name::<T>(),
                    actual: object.class().name.to_string(),
                }),
            other => Err(MapperError::TypeMismatch {
                expected: type_name::<T>(),
                actual: other.type_key().to_string(),
            }),
        }
    }
}

/// Scalars compare by value (floats bitwise), arrays and containers by
/// identity, objects through [`Object::equals`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Throwable(a), Value::Throwable(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.equals(&**b),
            (a, b) => match (a.identity(), b.identity()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

/// The natural text of the value, without consulting any registry.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&render::natural_text(self))
    }
}

fn address<T: ?Sized>(arc: &Arc<T>) -> usize {
    Arc::as_ptr(arc).cast::<()>() as usize
}

// ============================================================================
// Arrays
// ============================================================================

/// A fixed-length array of non-primitive elements.
#[derive(Clone)]
pub struct Array {
    component: &'static Class,
    items: Arc<RwLock<Vec<Value>>>,
}

impl Array {
    /// Creates an array of `len` nulls.
    pub fn new(component: &'static Class, len: usize) -> Self {
        Self::from_values(component, vec![Value::Null; len])
    }

    pub fn from_values<I, V>(component: &'static Class, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            component,
            items: Arc::new(RwLock::new(values.into_iter().map(Into::into).collect())),
        }
    }

    pub fn component(&self) -> &'static Class {
        self.component
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `MapperError::IndexOutOfBounds` if `index >= len`.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<(), MapperError> {
        let value = value.into();
        let mut items = self.items.write();
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(MapperError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read_recursive().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn identity(&self) -> usize {
        address(&self.items)
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.items.read_recursive()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Array")
            .field("component", &self.component.name)
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// Lists
// ============================================================================

/// An ordered sequence.
#[derive(Clone)]
pub struct List {
    class: &'static Class,
    items: Arc<RwLock<Vec<Value>>>,
}

impl List {
    pub fn new() -> Self {
        Self::with_class(&class::ARRAY_LIST)
    }

    pub fn with_class(class: &'static Class) -> Self {
        Self {
            class,
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn class(&self) -> &'static Class {
        self.class
    }

    pub fn push(&self, value: impl Into<Value>) {
        let value = value.into();
        self.items.write().push(value);
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read_recursive().get(index).cloned()
    }

    pub fn values(&self) -> Vec<Value> {
        self.items.read_recursive().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn identity(&self) -> usize {
        address(&self.items)
    }

    pub fn ptr_eq(&self, other: &List) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.items.read_recursive()
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Into<Value>> FromIterator<V> for List {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let list = List::new();
        *list.items.write() = iter.into_iter().map(Into::into).collect();
        list
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("List")
            .field("class", &self.class.name)
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// Sets
// ============================================================================

/// A collection without duplicates.
///
/// Sets whose class is a `SortedSet` keep their elements in natural order;
/// other sets iterate in insertion order.
#[derive(Clone)]
pub struct Set {
    class: &'static Class,
    items: Arc<RwLock<Vec<Value>>>,
}

impl Set {
    pub fn new() -> Self {
        Self::with_class(&class::HASH_SET)
    }

    pub fn sorted() -> Self {
        Self::with_class(&class::TREE_SET)
    }

    pub fn with_class(class: &'static Class) -> Self {
        Self {
            class,
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn class(&self) -> &'static Class {
        self.class
    }

    pub fn is_sorted(&self) -> bool {
        self.class.is_subtype_of(&class::SORTED_SET)
    }

    /// Adds `value` unless an equal element is present. Returns whether the
    /// set changed.
    pub fn insert(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        let sorted = self.is_sorted();
        let mut items = self.items.write();
        if items.iter().any(|e| same_key(sorted, e, &value)) {
            return false;
        }
        let index = if sorted {
            sorted_position(&items, &value, |e| e)
        } else {
            items.len()
        };
        items.insert(index, value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        let sorted = self.is_sorted();
        self.items
            .read_recursive()
            .iter()
            .any(|e| same_key(sorted, e, value))
    }

    pub fn values(&self) -> Vec<Value> {
        self.items.read_recursive().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn identity(&self) -> usize {
        address(&self.items)
    }

    pub fn ptr_eq(&self, other: &Set) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.items.read_recursive()
    }
}

impl Default for Set {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Into<Value>> FromIterator<V> for Set {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let set = Set::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Set")
            .field("class", &self.class.name)
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// Maps
// ============================================================================

/// A key-value mapping.
///
/// Maps whose class is a `SortedMap` keep their entries in natural key order;
/// other maps iterate in insertion order.
#[derive(Clone)]
pub struct Map {
    class: &'static Class,
    entries: Arc<RwLock<Vec<(Value, Value)>>>,
}

impl Map {
    pub fn new() -> Self {
        Self::with_class(&class::HASH_MAP)
    }

    pub fn sorted() -> Self {
        Self::with_class(&class::TREE_MAP)
    }

    pub fn with_class(class: &'static Class) -> Self {
        Self {
            class,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn class(&self) -> &'static Class {
        self.class
    }

    pub fn is_sorted(&self) -> bool {
        self.class.is_subtype_of(&class::SORTED_MAP)
    }

    /// Associates `value` with `key`, returning the previous value if the key
    /// was present.
    ///
    /// Sorted maps also treat a key that compares equal as present; the
    /// original key is kept and only the value is replaced.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let sorted = self.is_sorted();
        let mut entries = self.entries.write();
        if let Some(entry) = entries.iter_mut().find(|(k, _)| same_key(sorted, k, &key)) {
            return Some(std::mem::replace(&mut entry.1, value));
        }
        let index = if sorted {
            sorted_position(&entries, &key, |(k, _)| k)
        } else {
            entries.len()
        };
        entries.insert(index, (key, value));
        None
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        let sorted = self.is_sorted();
        self.entries
            .read_recursive()
            .iter()
            .find(|(k, _)| same_key(sorted, k, key))
            .map(|(_, v)| v.clone())
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.read_recursive().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn identity(&self) -> usize {
        address(&self.entries)
    }

    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<(Value, Value)>> {
        self.entries.read_recursive()
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Map")
            .field("class", &self.class.name)
            .field("len", &self.len())
            .finish()
    }
}

/// Element and key matching: equality, plus equal natural order in sorted
/// containers.
fn same_key(sorted: bool, existing: &Value, candidate: &Value) -> bool {
    existing == candidate
        || (sorted && candidate.natural_cmp(existing) == Some(Ordering::Equal))
}

/// First index whose element sorts after `value`; incomparable values go last.
fn sorted_position<T>(items: &[T], value: &Value, key: impl Fn(&T) -> &Value) -> usize {
    items
        .iter()
        .position(|item| value.natural_cmp(key(item)) == Some(Ordering::Less))
        .unwrap_or(items.len())
}

// ============================================================================
// Throwables
// ============================================================================

/// An error value, rendered with its cause chain.
#[derive(Clone)]
pub struct Throwable {
    class: &'static Class,
    error: Arc<dyn Error + Send + Sync>,
}

impl Throwable {
    pub fn new<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::with_class(&class::EXCEPTION, error)
    }

    pub fn with_class<E: Error + Send + Sync + 'static>(class: &'static Class, error: E) -> Self {
        Self {
            class,
            error: Arc::new(error),
        }
    }

    pub fn class(&self) -> &'static Class {
        self.class
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn ptr_eq(&self, other: &Throwable) -> bool {
        address(&self.error) == address(&other.error)
    }
}

impl fmt::Debug for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Throwable")
            .field("class", &self.class.name)
            .field("message", &self.error.to_string())
            .finish()
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    Decimal => Decimal,
    PathBuf => Path,
    &Path => Path,
    String => String,
    &str => String,
    Vec<bool> => BoolArray,
    Vec<i8> => ByteArray,
    Vec<char> => CharArray,
    Vec<i16> => ShortArray,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Array => Array,
    List => List,
    Set => Set,
    Map => Map,
    Throwable => Throwable,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_types() {
        assert_eq!(Value::Null.runtime_type(), None);
        assert_eq!(Value::from(1).runtime_type(), Some(Type::Class(&class::INT)));
        assert_eq!(
            Value::from(vec![1, 2]).runtime_type(),
            Some(Type::Array(&class::INT))
        );
        assert_eq!(
            Value::from(Array::new(&class::STRING, 2)).runtime_type(),
            Some(Type::Array(&class::STRING))
        );
        assert_eq!(
            Value::from(List::new()).runtime_type(),
            Some(Type::Class(&class::ARRAY_LIST))
        );
        assert_eq!(
            Value::from(Set::sorted()).runtime_type(),
            Some(Type::Class(&class::TREE_SET))
        );
    }

    #[test]
    fn test_containers_compare_by_identity() {
        let a: List = vec![1, 2].into_iter().collect();
        let b: List = vec![1, 2].into_iter().collect();

        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));

        let ints: Value = vec![1, 2].into();
        assert_eq!(ints, ints.clone());
        assert_ne!(ints, Value::from(vec![1, 2]));
    }

    #[test]
    fn test_natural_ordering() {
        assert_eq!(
            Value::from("a").natural_cmp(&Value::from("b")),
            Some(Ordering::Less)
        );
        assert_eq!(Value::from(1).natural_cmp(&Value::from(1i64)), None);
        assert_eq!(Value::from(1).natural_cmp(&Value::Null), None);
        assert_eq!(
            Value::from(f64::NAN).natural_cmp(&Value::from(1.0)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_set_deduplicates() {
        let set = Set::new();
        assert!(set.insert("a"));
        assert!(set.insert("b"));
        assert!(!set.insert("a"));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Value::from("b")));
    }

    #[test]
    fn test_sorted_set_keeps_order() {
        let set = Set::sorted();
        for value in [3, 1, 2, 1] {
            set.insert(value);
        }
        assert_eq!(
            set.values(),
            vec![Value::from(1), Value::from(2), Value::from(3)]
        );
    }

    #[test]
    fn test_map_insert_replaces() {
        let map = Map::sorted();
        assert_eq!(map.insert("b", 2), None);
        assert_eq!(map.insert("a", 1), None);
        assert_eq!(map.insert("b", 3), Some(Value::from(2)));

        let keys: Vec<Value> = map.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
        assert_eq!(map.get(&Value::from("b")), Some(Value::from(3)));
    }

    #[test]
    fn test_sorted_containers_merge_equal_ranks() {
        let first = Value::object(Ranked(1, "first"));
        let second = Value::object(Ranked(1, "second"));

        // Identity equality keeps both in unsorted containers
        let map = Map::new();
        map.insert(first.clone(), "a");
        map.insert(second.clone(), "b");
        assert_eq!(map.len(), 2);

        // Equal natural order is the same key in sorted ones
        let map = Map::sorted();
        assert_eq!(map.insert(first.clone(), "a"), None);
        assert_eq!(map.insert(second.clone(), "b"), Some(Value::from("a")));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&second), Some(Value::from("b")));
        assert_eq!(map.entries()[0].0, first);

        let set = Set::sorted();
        assert!(set.insert(first));
        assert!(!set.insert(second.clone()));
        assert!(set.contains(&second));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_array_bounds() {
        let array = Array::new(&class::OBJECT, 1);
        assert!(array.set(0, "x").is_ok());
        assert_eq!(
            array.set(1, "y"),
            Err(MapperError::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(array.get(0), Some(Value::from("x")));
    }

    #[test]
    fn test_downcast_mismatch() {
        let err = Value::from(5).downcast_object::<Point>().unwrap_err();
        assert!(matches!(err, MapperError::TypeMismatch { .. }));
        assert!(err.to_string().contains("int"));
    }

    #[derive(Debug)]
    struct Point;

    impl fmt::Display for Point {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("Point")
        }
    }

    impl Object for Point {
        fn class(&self) -> &'static Class {
            &class::OBJECT
        }
    }

    #[derive(Debug)]
    struct Ranked(u32, &'static str);

    impl fmt::Display for Ranked {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}#{}", self.1, self.0)
        }
    }

    impl Object for Ranked {
        fn class(&self) -> &'static Class {
            &class::OBJECT
        }

        fn compare_to(&self, other: &dyn Object) -> Option<Ordering> {
            let other = other.as_any().downcast_ref::<Ranked>()?;
            Some(self.0.cmp(&other.0))
        }
    }
}
