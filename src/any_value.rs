use crate::class::Class;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::ptr;

/// Upcasts any `'static` value to `&dyn Any` so trait objects can be downcast
/// back to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A user-defined value that takes part in class-directed rendering.
///
/// `Display` supplies the natural text used when no rule matches the
/// object's class or any of its ancestors.
///
/// # Examples
///
/// ```
/// use sovran_render::class::{self, Class};
/// use sovran_render::{Object, Value};
/// use std::fmt;
///
/// static TEMPERATURE: Class = Class::new("Temperature", Some(&class::OBJECT), &[]);
///
/// #[derive(Debug)]
/// struct Temperature(f64);
///
/// impl fmt::Display for Temperature {
///     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
///         write!(f, "{}°C", self.0)
///     }
/// }
///
/// impl Object for Temperature {
///     fn class(&self) -> &'static Class {
///         &TEMPERATURE
///     }
/// }
///
/// let value = Value::object(Temperature(21.5));
/// assert_eq!(value.to_string(), "21.5°C");
/// assert_eq!(value.downcast_object::<Temperature>().unwrap().0, 21.5);
/// ```
pub trait Object: AsAny + fmt::Debug + fmt::Display + Send + Sync {
    /// The class this value reports to the resolver.
    fn class(&self) -> &'static Class;

    /// Natural ordering against another object, if the two are comparable.
    fn compare_to(&self, _other: &dyn Object) -> Option<Ordering> {
        None
    }

    /// Equality used when the object is a set element or map key. Defaults to
    /// identity.
    fn equals(&self, other: &dyn Object) -> bool {
        ptr::addr_eq(self as *const Self, other as *const dyn Object)
    }
}
