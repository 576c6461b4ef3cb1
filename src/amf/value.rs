//! AMF3 value types
//!
//! Arrays and objects are shared handles so that a value graph may contain
//! cycles (an object whose field points back at itself). Strings, dates and
//! byte arrays are plain values.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use bytes::Bytes;

use crate::error::AmfError;
use super::class::{ClassObject, Reconstructible};

/// AMF3 value
#[derive(Clone)]
pub enum AmfValue {
    /// Undefined (0x00)
    Undefined,

    /// Null (0x01)
    Null,

    /// Boolean (0x02 false / 0x03 true)
    Boolean(bool),

    /// Integer; written as 0x04 when it fits 29 signed bits, otherwise as a Double
    Integer(i64),

    /// IEEE 754 double-precision floating point (0x05)
    Double(f64),

    /// UTF-8 string (0x06)
    String(String),

    /// Date as milliseconds since Unix epoch (0x08)
    Date(f64),

    /// Raw byte array (0x0C)
    ByteArray(Bytes),

    /// Array with associative and dense parts (0x09)
    Array(ArrayRef),

    /// Anonymous, named or typed object (0x0A)
    Object(ObjectRef),

    /// XML text. Held for callers only, never encodable.
    Xml(String),
}

impl AmfValue {
    /// Dense array from a list of values
    pub fn array<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AmfValue>,
    {
        AmfValue::Array(Shared::new(AmfArray::dense(
            values.into_iter().map(Into::into).collect(),
        )))
    }

    /// Array from key/value pairs; keys "0".."n-1" in order collapse to a dense array
    pub fn assoc_array<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AmfValue>,
    {
        AmfValue::Array(Shared::new(AmfArray::from_pairs(pairs)))
    }

    /// Anonymous object from ordered fields
    pub fn object<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AmfValue>,
    {
        AmfValue::Object(Shared::new(AmfObject::Record(Record::with_fields(
            "",
            fields.into_iter().collect(),
        ))))
    }

    /// Named object from ordered fields
    pub fn typed_object<I, K, V>(class_name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AmfValue>,
    {
        AmfValue::Object(Shared::new(AmfObject::Record(Record::with_fields(
            class_name,
            fields.into_iter().collect(),
        ))))
    }

    /// Object backed by an application type
    pub fn from_class<T: ClassObject>(object: T) -> Self {
        AmfValue::Object(Shared::new(AmfObject::Typed(Box::new(object))))
    }

    /// Try to get this value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AmfValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AmfValue::Integer(i) => Some(*i),
            AmfValue::Double(d) if d.fract() == 0.0 && d.is_finite() => Some(*d as i64),
            _ => None,
        }
    }

    /// Try to get this value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AmfValue::Double(n) => Some(*n),
            AmfValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AmfValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            AmfValue::ByteArray(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            AmfValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            AmfValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Check if this value is null or undefined
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, AmfValue::Null | AmfValue::Undefined)
    }

    /// Get a member of an object, or a keyed element of an array
    pub fn get(&self, key: &str) -> Option<AmfValue> {
        match self {
            AmfValue::Object(o) => o.read().get(key),
            AmfValue::Array(a) => a.read().get(key),
            _ => None,
        }
    }

    /// Get a string member of an object value
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            AmfValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Empty every array and object reachable from this value.
    ///
    /// Containers that point back at each other keep themselves alive after
    /// the last outside handle is dropped. Tearing the graph down this way
    /// releases them; other handles into the graph see empty containers
    /// afterwards. Typed objects are released along with the values their
    /// `fields`/`export` expose.
    pub fn break_cycles(&self) {
        let mut pending = vec![self.clone()];
        while let Some(value) = pending.pop() {
            match value {
                AmfValue::Array(array) => {
                    let contents = array.replace(AmfArray::new());
                    pending.extend(contents.assoc.into_iter().map(|(_, v)| v));
                    pending.extend(contents.dense);
                }
                AmfValue::Object(object) => {
                    let contents = object.replace(AmfObject::anonymous());
                    pending.extend(contents.members().into_iter().map(|(_, v)| v));
                }
                _ => {}
            }
        }
    }

    /// Whether two values are the same shared container
    pub fn same_ref(&self, other: &AmfValue) -> bool {
        match (self, other) {
            (AmfValue::Array(a), AmfValue::Array(b)) => a.ptr_eq(b),
            (AmfValue::Object(a), AmfValue::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AmfValue::Undefined => "undefined",
            AmfValue::Null => "null",
            AmfValue::Boolean(_) => "boolean",
            AmfValue::Integer(_) => "integer",
            AmfValue::Double(_) => "double",
            AmfValue::String(_) => "string",
            AmfValue::Date(_) => "date",
            AmfValue::ByteArray(_) => "byte-array",
            AmfValue::Array(_) => "array",
            AmfValue::Object(_) => "object",
            AmfValue::Xml(_) => "xml",
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            AmfValue::Object(o) => {
                let name = o.read().class_name().to_string();
                if name.is_empty() {
                    "object".to_string()
                } else {
                    format!("object {}", name)
                }
            }
            other => other.kind().to_string(),
        }
    }
}

impl Default for AmfValue {
    fn default() -> Self {
        AmfValue::Null
    }
}

impl PartialEq for AmfValue {
    fn eq(&self, other: &Self) -> bool {
        let mut visited = HashSet::new();
        values_eq(self, other, &mut visited)
    }
}

/// Structural equality that tolerates cycles: a pair of containers already
/// under comparison is assumed equal.
fn values_eq(a: &AmfValue, b: &AmfValue, visited: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (AmfValue::Undefined, AmfValue::Undefined) | (AmfValue::Null, AmfValue::Null) => true,
        (AmfValue::Boolean(x), AmfValue::Boolean(y)) => x == y,
        (AmfValue::Integer(x), AmfValue::Integer(y)) => x == y,
        (AmfValue::Double(x), AmfValue::Double(y)) => x == y,
        (AmfValue::String(x), AmfValue::String(y)) => x == y,
        (AmfValue::Xml(x), AmfValue::Xml(y)) => x == y,
        (AmfValue::Date(x), AmfValue::Date(y)) => x.trunc() == y.trunc(),
        (AmfValue::ByteArray(x), AmfValue::ByteArray(y)) => x == y,
        (AmfValue::Array(x), AmfValue::Array(y)) => {
            if x.ptr_eq(y) || !visited.insert((x.id(), y.id())) {
                return true;
            }
            let (xa, ya) = (x.read().clone(), y.read().clone());
            fields_eq(&xa.assoc, &ya.assoc, visited)
                && xa.dense.len() == ya.dense.len()
                && xa
                    .dense
                    .iter()
                    .zip(ya.dense.iter())
                    .all(|(l, r)| values_eq(l, r, visited))
        }
        (AmfValue::Object(x), AmfValue::Object(y)) => {
            if x.ptr_eq(y) || !visited.insert((x.id(), y.id())) {
                return true;
            }
            let (xname, xfields) = {
                let guard = x.read();
                (guard.class_name().to_string(), guard.members())
            };
            let (yname, yfields) = {
                let guard = y.read();
                (guard.class_name().to_string(), guard.members())
            };
            xname == yname && fields_eq(&xfields, &yfields, visited)
        }
        _ => false,
    }
}

fn fields_eq(a: &FieldMap, b: &FieldMap, visited: &mut HashSet<(usize, usize)>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|((ka, va), (kb, vb))| ka == kb && values_eq(va, vb, visited))
}

impl fmt::Debug for AmfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmfValue::Undefined => write!(f, "Undefined"),
            AmfValue::Null => write!(f, "Null"),
            AmfValue::Boolean(b) => write!(f, "Boolean({})", b),
            AmfValue::Integer(i) => write!(f, "Integer({})", i),
            AmfValue::Double(d) => write!(f, "Double({:?})", d),
            AmfValue::String(s) => write!(f, "String({:?})", s),
            AmfValue::Date(ms) => write!(f, "Date({:?})", ms),
            AmfValue::ByteArray(b) => write!(f, "ByteArray({} bytes)", b.len()),
            AmfValue::Xml(s) => write!(f, "Xml({:?})", s),
            AmfValue::Array(a) => f.debug_tuple("Array").field(a).finish(),
            AmfValue::Object(o) => f.debug_tuple("Object").field(o).finish(),
        }
    }
}

impl From<bool> for AmfValue {
    fn from(v: bool) -> Self {
        AmfValue::Boolean(v)
    }
}

impl From<f64> for AmfValue {
    fn from(v: f64) -> Self {
        AmfValue::Double(v)
    }
}

impl From<i32> for AmfValue {
    fn from(v: i32) -> Self {
        AmfValue::Integer(v as i64)
    }
}

impl From<i64> for AmfValue {
    fn from(v: i64) -> Self {
        AmfValue::Integer(v)
    }
}

impl From<u32> for AmfValue {
    fn from(v: u32) -> Self {
        AmfValue::Integer(v as i64)
    }
}

impl From<String> for AmfValue {
    fn from(v: String) -> Self {
        AmfValue::String(v)
    }
}

impl From<&str> for AmfValue {
    fn from(v: &str) -> Self {
        AmfValue::String(v.to_string())
    }
}

impl From<Bytes> for AmfValue {
    fn from(v: Bytes) -> Self {
        AmfValue::ByteArray(v)
    }
}

impl<V: Into<AmfValue>> From<Vec<V>> for AmfValue {
    fn from(v: Vec<V>) -> Self {
        AmfValue::array(v)
    }
}

impl From<AmfArray> for AmfValue {
    fn from(v: AmfArray) -> Self {
        AmfValue::Array(Shared::new(v))
    }
}

impl From<AmfObject> for AmfValue {
    fn from(v: AmfObject) -> Self {
        AmfValue::Object(Shared::new(v))
    }
}

thread_local! {
    static DEBUG_IN_PROGRESS: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// Shared, lockable container used for arrays and objects
pub struct Shared<T>(Arc<RwLock<T>>);

/// Handle to an array
pub type ArrayRef = Shared<AmfArray>;

/// Handle to an object
pub type ObjectRef = Shared<AmfObject>;

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared(Arc::new(RwLock::new(value)))
    }

    /// Read access; a poisoned lock still yields its data
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access; a poisoned lock still yields its data
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the contents, returning the previous value
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.write(), value)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Non-owning handle to the container
    pub fn downgrade(&self) -> Weak<RwLock<T>> {
        Arc::downgrade(&self.0)
    }

    /// Identity of the container, stable while any handle is alive
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id();
        let entered = DEBUG_IN_PROGRESS.with(|active| active.borrow_mut().insert(id));
        if !entered {
            return write!(f, "<cycle>");
        }
        let result = fmt::Debug::fmt(&*self.read(), f);
        DEBUG_IN_PROGRESS.with(|active| active.borrow_mut().remove(&id));
        result
    }
}

/// Ordered field map (insertion order is preserved on the wire)
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: Vec<(String, AmfValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping its original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AmfValue>) -> Option<AmfValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&AmfValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<AmfValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AmfValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<AmfValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, AmfValue);
    type IntoIter = std::vec::IntoIter<(String, AmfValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// AMF3 array: an associative part and a dense part
///
/// Arrays whose associative part is empty are written as dense arrays.
#[derive(Debug, Clone, Default)]
pub struct AmfArray {
    pub assoc: FieldMap,
    pub dense: Vec<AmfValue>,
}

impl AmfArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dense(values: Vec<AmfValue>) -> Self {
        Self {
            assoc: FieldMap::new(),
            dense: values,
        }
    }

    /// Build from key/value pairs. Keys that are exactly "0".."n-1" in
    /// order form a dense array; anything else stays associative.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AmfValue>,
    {
        let assoc: FieldMap = pairs.into_iter().collect();
        let is_dense = assoc
            .keys()
            .enumerate()
            .all(|(i, key)| key == i.to_string());

        if is_dense {
            Self::dense(assoc.into_iter().map(|(_, v)| v).collect())
        } else {
            Self {
                assoc,
                dense: Vec::new(),
            }
        }
    }

    /// No associative members, so the array is written as a plain list
    pub fn is_dense(&self) -> bool {
        self.assoc.is_empty()
    }

    pub fn push(&mut self, value: impl Into<AmfValue>) {
        self.dense.push(value.into());
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AmfValue>) {
        self.assoc.insert(key, value);
    }

    /// Associative member, or dense element when the key is an index
    pub fn get(&self, key: &str) -> Option<AmfValue> {
        if let Some(v) = self.assoc.get(key) {
            return Some(v.clone());
        }
        key.parse::<usize>().ok().and_then(|i| self.dense.get(i).cloned())
    }

    pub fn len(&self) -> usize {
        self.assoc.len() + self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Object without an application type behind it
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Wire class name; empty for anonymous objects
    pub class_name: String,
    pub fields: FieldMap,
}

impl Record {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: FieldMap::new(),
        }
    }

    pub fn with_fields(class_name: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            class_name: class_name.into(),
            fields,
        }
    }
}

impl Reconstructible for Record {
    fn set_field(&mut self, name: &str, value: AmfValue) -> Result<(), AmfError> {
        self.fields.insert(name, value);
        Ok(())
    }
}

/// AMF3 object
#[derive(Debug)]
pub enum AmfObject {
    /// Generic record (anonymous or carrying a class name)
    Record(Record),
    /// Application type implementing the class capabilities
    Typed(Box<dyn ClassObject>),
}

impl AmfObject {
    pub fn anonymous() -> Self {
        AmfObject::Record(Record::default())
    }

    /// Class name as the object knows it (empty for anonymous records)
    pub fn class_name(&self) -> &str {
        match self {
            AmfObject::Record(r) => &r.class_name,
            AmfObject::Typed(t) => t.type_name(),
        }
    }

    /// Fields to put on the wire: the export hook if present, else the
    /// object's structural fields.
    pub fn members(&self) -> FieldMap {
        match self {
            AmfObject::Record(r) => r.fields.clone(),
            AmfObject::Typed(t) => match t.as_exportable() {
                Some(exportable) => exportable.export(),
                None => t.fields(),
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<AmfValue> {
        match self {
            AmfObject::Record(r) => r.fields.get(name).cloned(),
            AmfObject::Typed(_) => self.members().get(name).cloned(),
        }
    }

    pub fn set_field(&mut self, name: &str, value: AmfValue) -> Result<(), AmfError> {
        match self {
            AmfObject::Record(r) => r.set_field(name, value),
            AmfObject::Typed(t) => t.set_field(name, value),
        }
    }

    /// Downcast a typed object to its application type
    pub fn downcast_ref<T: ClassObject>(&self) -> Option<&T> {
        match self {
            AmfObject::Typed(t) => t.as_any().downcast_ref::<T>(),
            AmfObject::Record(_) => None,
        }
    }

    pub fn downcast_mut<T: ClassObject>(&mut self) -> Option<&mut T> {
        match self {
            AmfObject::Typed(t) => t.as_any_mut().downcast_mut::<T>(),
            AmfObject::Record(_) => None,
        }
    }
}

impl Default for AmfObject {
    fn default() -> Self {
        AmfObject::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        let s = AmfValue::String("test".into());
        assert_eq!(s.as_str(), Some("test"));
        assert_eq!(s.as_number(), None);

        let n = AmfValue::Integer(42);
        assert_eq!(n.as_number(), Some(42.0));
        assert_eq!(n.as_i64(), Some(42));
        assert_eq!(AmfValue::Double(7.0).as_i64(), Some(7));
        assert_eq!(AmfValue::Double(7.5).as_i64(), None);

        let o = AmfValue::object([("key", "value")]);
        assert_eq!(o.get_string("key"), Some("value".to_string()));
        assert!(o.get("missing").is_none());
    }

    #[test]
    fn test_from_conversions() {
        let v: AmfValue = "test".into();
        assert!(matches!(v, AmfValue::String(_)));

        let v: AmfValue = 42.0.into();
        assert!(matches!(v, AmfValue::Double(_)));

        let v: AmfValue = 42.into();
        assert!(matches!(v, AmfValue::Integer(42)));

        let v: AmfValue = true.into();
        assert!(matches!(v, AmfValue::Boolean(true)));

        let v: AmfValue = vec![1, 2, 3].into();
        assert_eq!(v.as_array().unwrap().read().dense.len(), 3);
    }

    #[test]
    fn test_field_map_order_and_replace() {
        let mut map = FieldMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        assert_eq!(map.insert("b", 3), Some(AmfValue::Integer(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&AmfValue::Integer(3)));
        assert_eq!(map.remove("a"), Some(AmfValue::Integer(2)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_from_pairs_dense_detection() {
        let dense = AmfArray::from_pairs([("0", "a"), ("1", "b")]);
        assert!(dense.is_dense());
        assert_eq!(dense.dense.len(), 2);

        let gap = AmfArray::from_pairs([("0", "a"), ("2", "b")]);
        assert!(!gap.is_dense());

        let keyed = AmfArray::from_pairs([("1", "a"), ("x", "b")]);
        assert!(!keyed.is_dense());
        assert_eq!(keyed.get("x"), Some(AmfValue::from("b")));

        let padded = AmfArray::from_pairs([("00", "a")]);
        assert!(!padded.is_dense());

        let empty = AmfArray::from_pairs(Vec::<(String, AmfValue)>::new());
        assert!(empty.is_dense());
    }

    #[test]
    fn test_structural_equality() {
        let a = AmfValue::object([("x", 1)]);
        let b = AmfValue::object([("x", 1)]);
        let c = AmfValue::object([("x", 2)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.same_ref(&b));
        assert!(a.same_ref(&a.clone()));

        assert_ne!(
            AmfValue::object([("x", 1)]),
            AmfValue::typed_object("Point", [("x", 1)])
        );
        assert_ne!(AmfValue::Integer(1), AmfValue::Double(1.0));
        assert_eq!(AmfValue::Date(1000.4), AmfValue::Date(1000.0));
    }

    #[test]
    fn test_cyclic_equality_and_debug() {
        let make = || {
            let obj = AmfValue::object([("name", "root")]);
            let handle = obj.as_object().unwrap().clone();
            handle.write().set_field("me", obj.clone()).unwrap();
            obj
        };
        let a = make();
        let b = make();
        assert_eq!(a, b);

        let printed = format!("{:?}", a);
        assert!(printed.contains("<cycle>"));
        assert!(printed.contains("root"));
    }

    #[test]
    fn test_break_cycles_releases_graph() {
        let obj = AmfValue::object([("name", "root")]);
        let list = AmfValue::array(vec![obj.clone()]);
        obj.as_object().unwrap().write().set_field("items", list.clone()).unwrap();
        obj.as_object().unwrap().write().set_field("me", obj.clone()).unwrap();

        let obj_weak = obj.as_object().unwrap().downgrade();
        let list_weak = list.as_array().unwrap().downgrade();
        drop(list);

        obj.break_cycles();
        assert!(obj.get("me").is_none());
        drop(obj);

        assert_eq!(obj_weak.strong_count(), 0);
        assert_eq!(list_weak.strong_count(), 0);
    }

    #[test]
    fn test_shared_replace_keeps_identity() {
        let handle = Shared::new(AmfObject::anonymous());
        let alias = handle.clone();
        handle.replace(AmfObject::Record(Record::new("Thing")));
        assert_eq!(alias.read().class_name(), "Thing");
        assert!(alias.ptr_eq(&handle));
        assert_eq!(alias.id(), handle.id());
    }
}
