use pretty_assertions::assert_eq;
use sovran_render::class::{self, Class, Type};
use sovran_render::{
    List, MapperError, MutableStringMappers, Object, RenderRule, StringMappers, TypeKey, Value,
};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::thread;

static SHAPE: Class = Class::new("Shape", Some(&class::OBJECT), &[]);
static CIRCLE: Class = Class::new("Circle", Some(&SHAPE), &[]);

#[derive(Debug)]
struct Circle {
    radius: u32,
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Circle({})", self.radius)
    }
}

impl Object for Circle {
    fn class(&self) -> &'static Class {
        &CIRCLE
    }
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_defaults_cover_builtin_types() {
    let mappers = StringMappers::defaults();

    assert_eq!(mappers.len(), 23);
    for key in [
        TypeKey::from(&class::BOOLEAN),
        TypeKey::from(&class::INT),
        TypeKey::from(&class::DOUBLE),
        TypeKey::from(Type::Array(&class::CHAR)),
        TypeKey::from(Type::Array(&class::OBJECT)),
        TypeKey::from(&class::BIG_DECIMAL),
        TypeKey::from(&class::PATH),
        TypeKey::from(&class::STRING),
        TypeKey::from(&class::LIST),
        TypeKey::from(&class::SET),
        TypeKey::from(&class::MAP),
        TypeKey::from(&class::THROWABLE),
    ] {
        assert!(mappers.contains_key(key), "missing default rule for {key}");
    }
    assert!(!mappers.contains_key(TypeKey::Null));
    assert!(!mappers.contains_key(&class::CHAR));
}

#[test]
fn test_empty_registry_renders_natural_text() {
    let mappers = MutableStringMappers::empty();
    assert!(mappers.is_empty());

    let list: List = vec![1000, 2000].into_iter().collect();
    assert_eq!(mappers.render(&list.into()), "[1000, 2000]");
    assert_eq!(mappers.render(&Value::from(1.5)), "1.5");
    assert_eq!(mappers.render(&Value::Null), "null");
}

#[test]
fn test_custom_rule_for_ancestor() {
    let mut mappers = MutableStringMappers::new();
    mappers.put(&SHAPE, |value: &Value| match value.downcast_object::<Circle>() {
        Ok(circle) => format!("circle r={}", circle.radius),
        Err(_) => "shape".to_string(),
    });
    let mappers = mappers.to_immutable();

    let circle = Value::object(Circle { radius: 3 });
    assert_eq!(mappers.render(&circle), "circle r=3");

    let found = mappers.ancestor_match(Type::Class(&CIRCLE)).unwrap();
    assert_eq!(found.depth, 1);
    assert_eq!(found.rule, mappers.rule_for(&SHAPE).unwrap());
}

#[test]
fn test_exact_rule_beats_ancestor_rule() {
    let mut mappers = MutableStringMappers::new();
    mappers
        .put(&SHAPE, |_: &Value| "shape".to_string())
        .put(&CIRCLE, |_: &Value| "circle".to_string());

    assert_eq!(mappers.render(&Value::object(Circle { radius: 1 })), "circle");
}

#[test]
fn test_null_rule() {
    let mut mappers = MutableStringMappers::new();
    assert_eq!(mappers.render(&Value::Null), "null");

    mappers.put(TypeKey::Null, |_: &Value| "<missing>".to_string());
    assert_eq!(mappers.render(&Value::Null), "<missing>");

    // Applies to null elements inside containers too
    let list = List::new();
    list.push(Value::Null);
    assert_eq!(mappers.render(&list.into()), "[<missing>]");
}

#[test]
fn test_rule_applies_inside_containers() {
    let mut mappers = MutableStringMappers::new();
    mappers.put(&class::STRING, |value: &Value| match value {
        Value::String(s) => sovran_render::quote_string(s),
        other => other.to_string(),
    });

    let list = List::new();
    list.push("a");
    list.push(1);
    assert_eq!(mappers.render(&list.into()), r#"["a", 1]"#);
}

#[test]
fn test_contextual_rule_renders_nested_values() {
    let mut mappers = MutableStringMappers::new();
    mappers.put_rule(
        &class::LIST,
        RenderRule::contextual(|value, renderer| match value {
            Value::List(list) => {
                let items: Vec<String> = list.values().iter().map(|v| renderer.render(v)).collect();
                format!("list of {}: {}", items.len(), items.join("; "))
            }
            other => renderer.natural(other),
        }),
    );

    let list: List = vec![1000, 2].into_iter().collect();
    assert_eq!(mappers.render(&list.into()), "list of 2: 1,000; 2");
}

#[test]
fn test_remove_restores_natural_text() {
    let mut mappers = MutableStringMappers::new();
    mappers.remove(&class::INT);

    assert!(!mappers.contains_key(&class::INT));
    assert_eq!(mappers.render(&Value::from(1_000_000)), "1000000");
}

#[test]
fn test_freeze_is_independent_of_builder() {
    let mut builder = MutableStringMappers::new();
    let frozen = builder.to_immutable();

    builder.put(&class::INT, |_: &Value| "changed".to_string());
    assert_eq!(builder.render(&Value::from(5)), "changed");
    assert_eq!(frozen.render(&Value::from(5)), "5");
    assert_ne!(builder.to_immutable(), frozen);
}

#[test]
fn test_reopen_is_independent_of_frozen() {
    let frozen = StringMappers::defaults().clone();
    let mut reopened = MutableStringMappers::from(&frozen);

    reopened.put(TypeKey::Null, |_: &Value| "nil".to_string());
    assert_eq!(reopened.render(&Value::Null), "nil");
    assert_eq!(frozen.render(&Value::Null), "null");
    assert_eq!(frozen.len(), 23);
    assert_eq!(reopened.len(), 24);
}

#[test]
fn test_registry_equality_and_hash() {
    let a = MutableStringMappers::new().to_immutable();
    let b = StringMappers::default();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    // Same closure registered in two registries
    let rule = RenderRule::new(|_: &Value| "x".to_string());
    let mut first = MutableStringMappers::new();
    let mut second = MutableStringMappers::from(&b);
    first.put_rule(&CIRCLE, rule.clone());
    second.put_rule(&CIRCLE, rule);
    assert_eq!(first, second);
    assert_eq!(hash_of(&first), hash_of(&second));

    // Distinct closures are distinct rules, even with identical bodies
    let mut third = MutableStringMappers::new();
    third.put(&CIRCLE, |_: &Value| "x".to_string());
    assert_ne!(first, third);
}

#[test]
fn test_rule_for_missing_key() {
    let mappers = MutableStringMappers::empty().to_immutable();

    let result = mappers.rule_for(&class::INT);
    assert_eq!(result, Err(MapperError::KeyNotFound("int".to_string())));
    assert_eq!(
        result.unwrap_err().to_string(),
        "no render rule registered for int"
    );
}

#[test]
fn test_downcast_mismatch() {
    let value = Value::from(5);
    let result = value.downcast_object::<Circle>();
    assert!(matches!(result, Err(MapperError::TypeMismatch { .. })));
}

#[test]
fn test_display_lists_rules_by_key() {
    let mut mappers = MutableStringMappers::empty();
    assert_eq!(mappers.to_string(), "{}");

    mappers.put_rule(&class::INT, RenderRule::natural());
    mappers.put_rule(&class::BOOLEAN, RenderRule::natural());
    assert_eq!(mappers.to_string(), "{boolean=Natural, int=Natural}");
    assert_eq!(format!("{:?}", mappers.to_immutable()), mappers.to_string());
}

#[test]
fn test_keys() {
    let mut mappers = MutableStringMappers::empty();
    mappers
        .put(TypeKey::Null, |_: &Value| String::new())
        .put(&CIRCLE, |_: &Value| String::new());

    let keys = mappers.keys();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&TypeKey::Null));
    assert!(keys.contains(&TypeKey::from(&CIRCLE)));
}

#[test]
fn test_shared_across_threads() {
    let mut builder = MutableStringMappers::new();
    builder.put(&SHAPE, |value: &Value| format!("shape {value}"));
    let mappers = Arc::new(builder.to_immutable());

    let shared = List::new();
    shared.push(1000);
    shared.push(shared.clone());

    let mut handles = vec![];
    for i in 0..8 {
        let mappers = Arc::clone(&mappers);
        let shared = shared.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                assert_eq!(
                    mappers.render(&Value::object(Circle { radius: i })),
                    format!("shape Circle({i})")
                );
                assert_eq!(
                    mappers.render(&shared.clone().into()),
                    "[1,000, (this Collection)]"
                );
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
