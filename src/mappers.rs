use crate::class::{Type, TypeKey};
use crate::error::MapperError;
use crate::mutable::MutableStringMappers;
use crate::render::Renderer;
use crate::resolve::{self, RuleMatch, Rules};
use crate::rule::RenderRule;
use crate::value::Value;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, LazyLock};

static DEFAULT: LazyLock<StringMappers> =
    LazyLock::new(|| MutableStringMappers::new().to_immutable());

/// A frozen registry of render rules.
///
/// Cloning is cheap and clones share the same table. Equality and hashing
/// are structural over the registered entries.
///
/// # Examples
///
/// ```
/// use sovran_render::{List, StringMappers, Value};
///
/// let nested: List = vec![2, 3].into_iter().collect();
/// let list = List::new();
/// list.push(1);
/// list.push(nested);
/// list.push("x");
///
/// assert_eq!(StringMappers::defaults().render(&list.into()), "[1, [2, 3], x]");
/// ```
#[derive(Clone)]
pub struct StringMappers {
    rules: Arc<Rules>,
}

impl StringMappers {
    /// The shared registry holding the default rules.
    pub fn defaults() -> &'static StringMappers {
        &DEFAULT
    }

    pub(crate) fn from_rules(rules: Rules) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub(crate) fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Renders `value` using the most specific registered rule.
    ///
    /// Never fails: unregistered types, null and cyclic graphs all produce
    /// text.
    pub fn render(&self, value: &Value) -> String {
        Renderer::new(&self.rules).render(value)
    }

    /// The rule that `value` resolves to.
    pub fn resolve(&self, value: &Value) -> RenderRule {
        resolve::resolve(&self.rules, value)
    }

    /// Searches the ancestors of `ty` for the closest registered rule,
    /// ignoring any rule registered for `ty` itself.
    pub fn ancestor_match(&self, ty: Type) -> Option<RuleMatch> {
        resolve::find_best_match(&self.rules, ty, 0)
    }

    /// Returns the rule registered under exactly `key`.
    ///
    /// # Errors
    ///
    /// Returns `MapperError::KeyNotFound` if no rule is registered for `key`.
    pub fn rule_for(&self, key: impl Into<TypeKey>) -> Result<RenderRule, MapperError> {
        let key = key.into();
        self.rules
            .get(&key)
            .cloned()
            .ok_or_else(|| MapperError::KeyNotFound(key.to_string()))
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

impl Default for StringMappers {
    fn default() -> Self {
        StringMappers::clone(&DEFAULT)
    }
}

impl PartialEq for StringMappers {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rules, &other.rules) || self.rules == other.rules
    }
}

impl Eq for StringMappers {}

impl Hash for StringMappers {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_rules(&self.rules, state);
    }
}

impl fmt::Debug for StringMappers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_rules(&self.rules, f)
    }
}

impl fmt::Display for StringMappers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_rules(&self.rules, f)
    }
}

/// Order-independent hash of the entry set.
pub(crate) fn hash_rules<H: Hasher>(rules: &Rules, state: &mut H) {
    let sum = rules.iter().fold(0u64, |sum, entry| {
        let mut hasher = DefaultHasher::new();
        entry.hash(&mut hasher);
        sum.wrapping_add(hasher.finish())
    });
    state.write_usize(rules.len());
    state.write_u64(sum);
}

/// `{String=String, int=Integer, ...}`, sorted by key for stable output.
pub(crate) fn fmt_rules(rules: &Rules, f: &mut fmt::Formatter) -> fmt::Result {
    let mut entries: Vec<(String, &RenderRule)> =
        rules.iter().map(|(k, v)| (k.to_string(), v)).collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    f.write_str("{")?;
    for (i, (key, rule)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key}={rule:?}")?;
    }
    f.write_str("}")
}
