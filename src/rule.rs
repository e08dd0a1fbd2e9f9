use crate::render::Renderer;
use crate::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::Arc;

type PlainFn = dyn Fn(&Value) -> String + Send + Sync;
type ContextualFn = dyn Fn(&Value, &mut Renderer<'_>) -> String + Send + Sync;

/// A function that renders one value as text.
///
/// Rules are immutable and cheap to clone. Two rules are equal if they are
/// the same built-in rule or share the same closure.
#[derive(Clone)]
pub struct RenderRule(Kind);

#[derive(Clone)]
enum Kind {
    Builtin(Builtin),
    Plain(Arc<PlainFn>),
    Contextual(Arc<ContextualFn>),
}

/// The rules seeded into a default registry, plus the natural fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Builtin {
    Boolean,
    Integer,
    Floating,
    PrimitiveArray,
    ObjectArray,
    Decimal,
    Path,
    String,
    List,
    Set,
    Map,
    Throwable,
    Natural,
}

impl RenderRule {
    /// Wraps a closure that renders a value on its own.
    ///
    /// ```
    /// use sovran_render::{RenderRule, Value};
    ///
    /// let rule = RenderRule::new(|value: &Value| format!("<{value}>"));
    /// assert_eq!(rule.apply(&Value::from(7)), "<7>");
    /// ```
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        RenderRule(Kind::Plain(Arc::new(f)))
    }

    /// Wraps a closure that renders nested values through the active
    /// [`Renderer`], so nested values use the same registry and cycle guards.
    pub fn contextual<F>(f: F) -> Self
    where
        F: Fn(&Value, &mut Renderer<'_>) -> String + Send + Sync + 'static,
    {
        RenderRule(Kind::Contextual(Arc::new(f)))
    }

    /// The rule used when nothing more specific applies: the value's natural
    /// text.
    pub fn natural() -> Self {
        RenderRule(Kind::Builtin(Builtin::Natural))
    }

    pub(crate) fn builtin(builtin: Builtin) -> Self {
        RenderRule(Kind::Builtin(builtin))
    }

    pub fn is_natural(&self) -> bool {
        matches!(self.0, Kind::Builtin(Builtin::Natural))
    }

    /// Renders `value` with this rule alone. Nested values fall back to their
    /// natural text.
    pub fn apply(&self, value: &Value) -> String {
        let rules = crate::resolve::Rules::default();
        self.apply_with(value, &mut Renderer::new(&rules))
    }

    /// Renders `value` with this rule inside an active render call.
    pub fn apply_with(&self, value: &Value, renderer: &mut Renderer<'_>) -> String {
        match &self.0 {
            Kind::Builtin(builtin) => renderer.builtin(*builtin, value),
            Kind::Plain(f) => f(value),
            Kind::Contextual(f) => f(value, renderer),
        }
    }

    fn address(&self) -> Option<*const ()> {
        match &self.0 {
            Kind::Builtin(_) => None,
            Kind::Plain(f) => Some(Arc::as_ptr(f).cast::<()>()),
            Kind::Contextual(f) => Some(Arc::as_ptr(f).cast::<()>()),
        }
    }
}

impl PartialEq for RenderRule {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Kind::Builtin(a), Kind::Builtin(b)) => a == b,
            _ => match (self.address(), other.address()) {
                (Some(a), Some(b)) => ptr::eq(a, b),
                _ => false,
            },
        }
    }
}

impl Eq for RenderRule {}

impl Hash for RenderRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Kind::Builtin(builtin) => builtin.hash(state),
            _ => ptr::hash(self.address().unwrap_or(ptr::null()), state),
        }
    }
}

impl fmt::Debug for RenderRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0 {
            Kind::Builtin(builtin) => write!(f, "{builtin:?}"),
            Kind::Plain(_) => write!(f, "Custom({:p})", self.address().unwrap_or(ptr::null())),
            Kind::Contextual(_) => {
                write!(f, "Contextual({:p})", self.address().unwrap_or(ptr::null()))
            }
        }
    }
}
