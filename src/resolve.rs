//! Finds the rule for a value by walking its type hierarchy.
//!
//! Lookup order:
//!
//! 1. the null key, for the null value;
//! 2. the value's exact runtime type;
//! 3. the generic `Object[]` key, for arrays of non-primitive elements;
//! 4. the nearest ancestor with a rule ([`find_best_match`]);
//! 5. the natural text of the value.

use crate::class::{self, Type, TypeKey};
use crate::rule::RenderRule;
use crate::value::Value;
use std::collections::HashMap;
use tracing::trace;

pub(crate) type Rules = HashMap<TypeKey, RenderRule>;

/// A rule found during ancestor search, with the number of hierarchy edges
/// between the searched type and the type the rule is registered for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: RenderRule,
    pub depth: usize,
}

pub(crate) fn resolve(rules: &Rules, value: &Value) -> RenderRule {
    let Some(actual) = value.runtime_type() else {
        return match rules.get(&TypeKey::Null) {
            Some(rule) => rule.clone(),
            None => RenderRule::natural(),
        };
    };

    if let Some(rule) = rules.get(&TypeKey::Type(actual)) {
        trace!(ty = %actual, "exact render rule");
        return rule.clone();
    }

    let ty = if actual.is_object_array() {
        let generic = Type::Array(&class::OBJECT);
        if let Some(rule) = rules.get(&TypeKey::Type(generic)) {
            trace!(ty = %actual, "object array render rule");
            return rule.clone();
        }
        generic
    } else {
        actual
    };

    match find_best_match(rules, ty, 0) {
        Some(found) => {
            trace!(ty = %actual, depth = found.depth, "inherited render rule");
            found.rule
        }
        None => {
            trace!(ty = %actual, "no render rule, using natural text");
            RenderRule::natural()
        }
    }
}

/// Returns the rule of the closest ancestor of `ty`.
///
/// Direct supertypes are checked first: the superclass, then each interface
/// in declaration order. Only when none of them has a rule does the search
/// descend into each of them, keeping the shallowest result. Ties go to the
/// branch searched first.
pub(crate) fn find_best_match(rules: &Rules, ty: Type, depth: usize) -> Option<RuleMatch> {
    let superclass = ty.superclass();
    let direct = superclass.into_iter().chain(ty.interfaces());
    for parent in direct {
        if let Some(rule) = rules.get(&TypeKey::Type(parent)) {
            return Some(RuleMatch {
                rule: rule.clone(),
                depth: depth + 1,
            });
        }
    }

    let mut best = superclass.and_then(|parent| find_best_match(rules, parent, depth + 1));
    for parent in ty.interfaces() {
        let Some(candidate) = find_best_match(rules, parent, depth + 1) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| candidate.depth < b.depth) {
            best = Some(candidate);
        }
    }
    best
}
