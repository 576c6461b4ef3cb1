//! Object capabilities and class resolution
//!
//! Application types take part in object encoding by implementing
//! [`ClassObject`]. Decoding a named object looks the wire class name up in
//! a [`ClassRegistry`], builds a default instance, then either hands it the
//! whole field map ([`Exportable::import`]) or assigns fields one by one
//! ([`Reconstructible::set_field`]).
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//! use amf3_rs::amf::{AmfValue, ClassObject, ClassRegistry, FieldMap, Reconstructible};
//! use amf3_rs::error::AmfError;
//!
//! #[derive(Debug, Default)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! impl Reconstructible for Point {
//!     fn set_field(&mut self, name: &str, value: AmfValue) -> Result<(), AmfError> {
//!         let n = value.as_number();
//!         match (name, n) {
//!             ("x", Some(n)) => self.x = n,
//!             ("y", Some(n)) => self.y = n,
//!             _ => {
//!                 return Err(AmfError::PropertyAssignment {
//!                     class_name: "Point".into(),
//!                     field: name.into(),
//!                 })
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! impl ClassObject for Point {
//!     fn type_name(&self) -> &str {
//!         "Point"
//!     }
//!
//!     fn fields(&self) -> FieldMap {
//!         [("x", self.x), ("y", self.y)].into_iter().collect()
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!
//!     fn as_any_mut(&mut self) -> &mut dyn Any {
//!         self
//!     }
//! }
//!
//! let mut registry = ClassRegistry::new();
//! registry.register_default::<Point>("Point");
//! assert!(registry.contains("Point"));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::AmfError;
use super::value::{AmfValue, FieldMap};

/// Type name of a generic record; it maps to the anonymous (empty) wire name
pub const GENERIC_TYPE_NAME: &str = "Object";

/// Assign decoded fields by name
pub trait Reconstructible {
    /// Set one decoded field. Return `PropertyAssignment` if the field
    /// does not exist or the value has the wrong shape.
    fn set_field(&mut self, name: &str, value: AmfValue) -> Result<(), AmfError>;
}

/// Custom wire representation, replacing structural field enumeration
pub trait Exportable {
    /// Fields to write, in order
    fn export(&self) -> FieldMap;

    /// Receive every decoded field at once
    fn import(&mut self, fields: FieldMap) -> Result<(), AmfError>;
}

/// Application type that can travel as an AMF3 object
pub trait ClassObject: Reconstructible + Send + Sync + fmt::Debug + 'static {
    /// Local type name, fed to the class mapper when class mapping is on
    fn type_name(&self) -> &str;

    /// Structural fields, used when the type has no export hook
    fn fields(&self) -> FieldMap;

    fn as_exportable(&self) -> Option<&dyn Exportable> {
        None
    }

    fn as_exportable_mut(&mut self) -> Option<&mut dyn Exportable> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Builds a default instance of a class
pub type ClassFactory = Arc<dyn Fn() -> Box<dyn ClassObject> + Send + Sync>;

/// Maps a local type name to the class name written on the wire
pub type ClassMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Wire class name to factory lookup, consulted only when decoding objects
#[derive(Clone, Default)]
pub struct ClassRegistry {
    factories: HashMap<String, ClassFactory>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a wire class name, replacing any previous one
    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn ClassObject> + Send + Sync + 'static,
    {
        self.factories.insert(class_name.into(), Arc::new(factory));
        self
    }

    /// Register a type built with `Default::default()`
    pub fn register_default<T>(&mut self, class_name: impl Into<String>) -> &mut Self
    where
        T: ClassObject + Default,
    {
        self.register(class_name, || Box::new(T::default()) as Box<dyn ClassObject>)
    }

    /// Build a fresh instance for a wire class name
    pub fn create(&self, class_name: &str) -> Option<Box<dyn ClassObject>> {
        self.factories.get(class_name).map(|factory| factory())
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ClassRegistry").field("classes", &names).finish()
    }
}

/// Fill a freshly built instance from decoded fields
pub(crate) fn populate(
    object: &mut dyn ClassObject,
    class_name: &str,
    fields: FieldMap,
) -> Result<(), AmfError> {
    if let Some(exportable) = object.as_exportable_mut() {
        return exportable.import(fields);
    }

    for (name, value) in fields {
        object.set_field(&name, value).map_err(|e| match e {
            AmfError::PropertyAssignment { .. } => e,
            _ => AmfError::PropertyAssignment {
                class_name: class_name.to_string(),
                field: name.clone(),
            },
        })?;
    }
    Ok(())
}
