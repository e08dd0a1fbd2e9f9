//! Class descriptors and the type hierarchy walked by the resolver.
//!
//! Rust has no runtime inheritance, so every renderable value reports a
//! [`Class`]: a `'static` descriptor naming its superclass and the interfaces
//! it declares. Descriptors are compared by address, which makes each
//! `static` its own type.
//!
//! ```
//! use sovran_render::class::{self, Class};
//!
//! static SHAPE: Class = Class {
//!     name: "Shape",
//!     primitive: false,
//!     superclass: None,
//!     interfaces: &[],
//! };
//!
//! static CIRCLE: Class = Class {
//!     name: "Circle",
//!     primitive: false,
//!     superclass: Some(&class::OBJECT),
//!     interfaces: &[&SHAPE, &class::COMPARABLE],
//! };
//!
//! assert!(CIRCLE.is_subtype_of(&SHAPE));
//! assert!(!SHAPE.is_subtype_of(&CIRCLE));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

/// A node in the type hierarchy.
///
/// Interfaces are classes without a superclass; their `interfaces` list holds
/// the interfaces they extend. Declaration order of `interfaces` matters: the
/// resolver breaks ties between equally distant ancestors by it.
pub struct Class {
    /// Human-readable name, used in diagnostics and throwable headers.
    pub name: &'static str,
    /// Primitive classes never take part in object-array normalization.
    pub primitive: bool,
    pub superclass: Option<&'static Class>,
    pub interfaces: &'static [&'static Class],
}

impl Class {
    /// Creates a descriptor. Usable in `static` initializers.
    pub const fn new(
        name: &'static str,
        superclass: Option<&'static Class>,
        interfaces: &'static [&'static Class],
    ) -> Self {
        Self {
            name,
            primitive: false,
            superclass,
            interfaces,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    /// Returns true if `self` is `other` or reaches it through superclass or
    /// interface edges.
    pub fn is_subtype_of(&self, other: &Class) -> bool {
        if self == other {
            return true;
        }
        if let Some(superclass) = self.superclass {
            if superclass.is_subtype_of(other) {
                return true;
            }
        }
        self.interfaces.iter().any(|i| i.is_subtype_of(other))
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self, state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Class({})", self.name)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The runtime type of a value: a class, or an array of a component class.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Class(&'static Class),
    Array(&'static Class),
}

impl Type {
    pub fn array_of(component: &'static Class) -> Self {
        Type::Array(component)
    }

    /// True for arrays whose component is not primitive. All of these share
    /// the generic `Object[]` rule unless registered individually.
    pub fn is_object_array(&self) -> bool {
        matches!(self, Type::Array(component) if !component.is_primitive())
    }

    pub fn superclass(&self) -> Option<Type> {
        match self {
            Type::Class(class) => class.superclass.map(Type::Class),
            Type::Array(_) => Some(Type::Class(&OBJECT)),
        }
    }

    /// Directly declared interfaces, in declaration order.
    pub fn interfaces(&self) -> impl Iterator<Item = Type> {
        let interfaces: &'static [&'static Class] = match self {
            Type::Class(class) => class.interfaces,
            Type::Array(_) => &[],
        };
        interfaces.iter().map(|i| Type::Class(*i))
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Class(class) => f.write_str(class.name),
            Type::Array(component) => write!(f, "{}[]", component.name),
        }
    }
}

impl From<&'static Class> for Type {
    fn from(class: &'static Class) -> Self {
        Type::Class(class)
    }
}

/// Registry key: a type, or the sentinel used for the null value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Null,
    Type(Type),
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeKey::Null => f.write_str("null"),
            TypeKey::Type(ty) => fmt::Display::fmt(ty, f),
        }
    }
}

impl From<Type> for TypeKey {
    fn from(ty: Type) -> Self {
        TypeKey::Type(ty)
    }
}

impl From<&'static Class> for TypeKey {
    fn from(class: &'static Class) -> Self {
        TypeKey::Type(Type::Class(class))
    }
}

impl From<Option<Type>> for TypeKey {
    fn from(ty: Option<Type>) -> Self {
        ty.map_or(TypeKey::Null, TypeKey::Type)
    }
}

impl From<Option<&'static Class>> for TypeKey {
    fn from(class: Option<&'static Class>) -> Self {
        class.map_or(TypeKey::Null, TypeKey::from)
    }
}

// ============================================================================
// Built-in classes
// ============================================================================

pub static OBJECT: Class = Class::new("Object", None, &[]);

pub static BOOLEAN: Class = primitive("boolean");
pub static BYTE: Class = primitive("byte");
pub static SHORT: Class = primitive("short");
pub static INT: Class = primitive("int");
pub static LONG: Class = primitive("long");
pub static FLOAT: Class = primitive("float");
pub static DOUBLE: Class = primitive("double");
pub static CHAR: Class = primitive("char");

pub static COMPARABLE: Class = Class::new("Comparable", None, &[]);
pub static ITERABLE: Class = Class::new("Iterable", None, &[]);

pub static COLLECTION: Class = Class {
    name: "Collection",
    primitive: false,
    superclass: None,
    interfaces: &[&ITERABLE],
};

pub static LIST: Class = Class {
    name: "List",
    primitive: false,
    superclass: None,
    interfaces: &[&COLLECTION],
};

pub static SET: Class = Class {
    name: "Set",
    primitive: false,
    superclass: None,
    interfaces: &[&COLLECTION],
};

pub static SORTED_SET: Class = Class {
    name: "SortedSet",
    primitive: false,
    superclass: None,
    interfaces: &[&SET],
};

pub static MAP: Class = Class::new("Map", None, &[]);

pub static SORTED_MAP: Class = Class {
    name: "SortedMap",
    primitive: false,
    superclass: None,
    interfaces: &[&MAP],
};

pub static PATH: Class = Class {
    name: "Path",
    primitive: false,
    superclass: None,
    interfaces: &[&COMPARABLE, &ITERABLE],
};

pub static NUMBER: Class = Class::new("Number", Some(&OBJECT), &[]);

pub static BIG_DECIMAL: Class = Class {
    name: "BigDecimal",
    primitive: false,
    superclass: Some(&NUMBER),
    interfaces: &[&COMPARABLE],
};

pub static STRING: Class = Class {
    name: "String",
    primitive: false,
    superclass: Some(&OBJECT),
    interfaces: &[&COMPARABLE],
};

pub static ARRAY_LIST: Class = Class {
    name: "ArrayList",
    primitive: false,
    superclass: Some(&OBJECT),
    interfaces: &[&LIST],
};

pub static HASH_SET: Class = Class {
    name: "HashSet",
    primitive: false,
    superclass: Some(&OBJECT),
    interfaces: &[&SET],
};

pub static TREE_SET: Class = Class {
    name: "TreeSet",
    primitive: false,
    superclass: Some(&OBJECT),
    interfaces: &[&SORTED_SET],
};

pub static HASH_MAP: Class = Class {
    name: "HashMap",
    primitive: false,
    superclass: Some(&OBJECT),
    interfaces: &[&MAP],
};

pub static TREE_MAP: Class = Class {
    name: "TreeMap",
    primitive: false,
    superclass: Some(&OBJECT),
    interfaces: &[&SORTED_MAP],
};

pub static THROWABLE: Class = Class::new("Throwable", Some(&OBJECT), &[]);
pub static EXCEPTION: Class = Class::new("Exception", Some(&THROWABLE), &[]);

const fn primitive(name: &'static str) -> Class {
    Class {
        name,
        primitive: true,
        superclass: None,
        interfaces: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_by_address() {
        static A: Class = Class::new("Same", None, &[]);
        static B: Class = Class::new("Same", None, &[]);

        assert_eq!(A, A);
        assert_ne!(A, B);
        assert_ne!(TypeKey::from(&A), TypeKey::from(&B));
    }

    #[test]
    fn test_subtype_walk() {
        assert!(TREE_SET.is_subtype_of(&SORTED_SET));
        assert!(TREE_SET.is_subtype_of(&COLLECTION));
        assert!(TREE_SET.is_subtype_of(&ITERABLE));
        assert!(!HASH_SET.is_subtype_of(&SORTED_SET));
        assert!(EXCEPTION.is_subtype_of(&THROWABLE));
        assert!(!INT.is_subtype_of(&OBJECT));
    }

    #[test]
    fn test_array_types() {
        let strings = Type::array_of(&STRING);
        let ints = Type::array_of(&INT);

        assert!(strings.is_object_array());
        assert!(!ints.is_object_array());
        assert_eq!(strings.superclass(), Some(Type::Class(&OBJECT)));
        assert_eq!(strings.interfaces().count(), 0);
        assert_eq!(strings.to_string(), "String[]");
        assert_eq!(ints.to_string(), "int[]");
    }

    #[test]
    fn test_null_key_conversions() {
        assert_eq!(TypeKey::from(None::<Type>), TypeKey::Null);
        assert_eq!(TypeKey::from(None::<&'static Class>), TypeKey::Null);
        assert_eq!(
            TypeKey::from(Some(Type::Class(&STRING))),
            TypeKey::from(&STRING)
        );
        assert_eq!(TypeKey::Null.to_string(), "null");
    }
}
