use crate::class::{self, Type, TypeKey};
use crate::mappers::{self, StringMappers};
use crate::render::Renderer;
use crate::resolve::{self, Rules};
use crate::rule::{Builtin, RenderRule};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// A registry of render rules under construction.
///
/// Mutation takes `&mut self`; configure a registry on one thread, then
/// freeze it with [`to_immutable`](Self::to_immutable) and share the frozen
/// [`StringMappers`].
///
/// # Examples
///
/// ```
/// use sovran_render::class;
/// use sovran_render::{MutableStringMappers, StringMappers, TypeKey, Value};
///
/// let mut mappers = MutableStringMappers::from(StringMappers::defaults());
/// mappers
///     .put(&class::BOOLEAN, |value: &Value| {
///         let yes = matches!(value, Value::Bool(true));
///         (if yes { "yes" } else { "no" }).to_string()
///     })
///     .put(TypeKey::Null, |_: &Value| "<none>".to_string());
///
/// let mappers = mappers.to_immutable();
/// assert_eq!(mappers.render(&Value::from(true)), "yes");
/// assert_eq!(mappers.render(&Value::Null), "<none>");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MutableStringMappers {
    rules: Rules,
}

impl MutableStringMappers {
    /// Creates a registry seeded with the default rules.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Creates a registry with no rules; everything renders as natural text.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Registers or replaces the rule for `key`.
    ///
    /// Arrays of non-primitive elements share the `Object[]` key unless their
    /// own array type is registered.
    pub fn put<F>(&mut self, key: impl Into<TypeKey>, f: F) -> &mut Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.put_rule(key, RenderRule::new(f))
    }

    /// Registers or replaces `rule` for `key`.
    pub fn put_rule(&mut self, key: impl Into<TypeKey>, rule: RenderRule) -> &mut Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Removes the rule for `key`, if any.
    pub fn remove(&mut self, key: impl Into<TypeKey>) -> &mut Self {
        self.rules.remove(&key.into());
        self
    }

    /// Returns a frozen copy. Later changes to `self` do not affect it.
    pub fn to_immutable(&self) -> StringMappers {
        debug!(rules = self.rules.len(), "freezing render rules");
        StringMappers::from_rules(self.rules.clone())
    }

    /// Renders `value` with the current rules.
    pub fn render(&self, value: &Value) -> String {
        Renderer::new(&self.rules).render(value)
    }

    /// The rule that `value` resolves to.
    pub fn resolve(&self, value: &Value) -> RenderRule {
        resolve::resolve(&self.rules, value)
    }

    pub fn contains_key(&self, key: impl Into<TypeKey>) -> bool {
        self.rules.contains_key(&key.into())
    }

    pub fn keys(&self) -> Vec<TypeKey> {
        self.rules.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for MutableStringMappers {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&StringMappers> for MutableStringMappers {
    /// Opens a mutable copy of a frozen registry.
    fn from(mappers: &StringMappers) -> Self {
        let rules = mappers.rules().clone();
        debug!(rules = rules.len(), "opening render rules for changes");
        Self { rules }
    }
}

impl From<StringMappers> for MutableStringMappers {
    fn from(mappers: StringMappers) -> Self {
        Self::from(&mappers)
    }
}

impl Hash for MutableStringMappers {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mappers::hash_rules(&self.rules, state);
    }
}

impl fmt::Debug for MutableStringMappers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        mappers::fmt_rules(&self.rules, f)
    }
}

impl fmt::Display for MutableStringMappers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        mappers::fmt_rules(&self.rules, f)
    }
}

fn default_rules() -> Rules {
    let mut rules = Rules::with_capacity(23);
    let mut put = |key: TypeKey, builtin: Builtin| {
        rules.insert(key, RenderRule::builtin(builtin));
    };

    put((&class::BOOLEAN).into(), Builtin::Boolean);
    for integer in [&class::BYTE, &class::SHORT, &class::INT, &class::LONG] {
        put(integer.into(), Builtin::Integer);
    }
    for floating in [&class::FLOAT, &class::DOUBLE] {
        put(floating.into(), Builtin::Floating);
    }
    for component in [
        &class::BOOLEAN,
        &class::BYTE,
        &class::CHAR,
        &class::SHORT,
        &class::INT,
        &class::LONG,
        &class::FLOAT,
        &class::DOUBLE,
    ] {
        put(Type::Array(component).into(), Builtin::PrimitiveArray);
    }
    put(Type::Array(&class::OBJECT).into(), Builtin::ObjectArray);
    put((&class::BIG_DECIMAL).into(), Builtin::Decimal);
    put((&class::PATH).into(), Builtin::Path);
    put((&class::STRING).into(), Builtin::String);
    put((&class::LIST).into(), Builtin::List);
    put((&class::SET).into(), Builtin::Set);
    put((&class::MAP).into(), Builtin::Map);
    put((&class::THROWABLE).into(), Builtin::Throwable);
    rules
}
