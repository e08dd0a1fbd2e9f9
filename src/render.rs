//! Structural renderers and the text of the built-in rules.
//!
//! A [`Renderer`] lives for one top-level render call. It carries the rules
//! being applied and the identity sets that stop cyclic graphs:
//!
//! - `path` holds the containers currently being rendered. A container that
//!   contains itself prints `(this Collection)` or `(this Map)`; a container
//!   reached again further down prints `...`.
//! - `seen_arrays` holds every nested array visited during the call. An
//!   array met a second time inside an object array prints `...`.

use crate::resolve::{self, Rules};
use crate::rule::Builtin;
use crate::value::{Array, List, Map, Set, Throwable, Value};
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{Debug, Display, LowerExp};
use tracing::trace;

const THIS_COLLECTION: &str = "(this Collection)";
const THIS_MAP: &str = "(this Map)";
const REPEATED: &str = "...";

/// Whether nested values go through the registry or print their natural text.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Rules,
    Natural,
}

/// State of one render call.
pub struct Renderer<'a> {
    rules: &'a Rules,
    path: Vec<usize>,
    seen_arrays: HashSet<usize>,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(rules: &'a Rules) -> Self {
        Self {
            rules,
            path: Vec::new(),
            seen_arrays: HashSet::new(),
        }
    }

    /// Renders `value` with the rule resolved for it.
    pub fn render(&mut self, value: &Value) -> String {
        let rule = resolve::resolve(self.rules, value);
        rule.apply_with(value, self)
    }

    /// Renders `value` as its natural text, ignoring the registry.
    pub fn natural(&mut self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Byte(n) => n.to_string(),
            Value::Short(n) => n.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Float(n) => natural_float(*n),
            Value::Double(n) => natural_float(*n),
            Value::Char(c) => c.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Path(p) => p.display().to_string(),
            Value::String(s) => s.clone(),
            Value::Array(array) => self.array(array, Mode::Natural),
            Value::List(list) => self.ordered(list.identity(), list.read().iter(), Mode::Natural),
            Value::Set(set) => self.ordered(set.identity(), set.read().iter(), Mode::Natural),
            Value::Map(map) => self.entries(map.identity(), map.read().iter(), Mode::Natural),
            Value::Throwable(throwable) => {
                format!("{}: {}", throwable.class().name, throwable.error())
            }
            Value::Object(object) => object.to_string(),
            primitive => primitive_array(primitive).unwrap_or_default(),
        }
    }

    pub(crate) fn builtin(&mut self, builtin: Builtin, value: &Value) -> String {
        let text = match (builtin, value) {
            (Builtin::Boolean, Value::Bool(b)) => Some(b.to_string()),
            (Builtin::Integer, Value::Byte(n)) => Some(n.to_formatted_string(&Locale::en)),
            (Builtin::Integer, Value::Short(n)) => Some(n.to_formatted_string(&Locale::en)),
            (Builtin::Integer, Value::Int(n)) => Some(n.to_formatted_string(&Locale::en)),
            (Builtin::Integer, Value::Long(n)) => Some(n.to_formatted_string(&Locale::en)),
            (Builtin::Floating, Value::Float(n)) => Some(fixed_float(*n)),
            (Builtin::Floating, Value::Double(n)) => Some(fixed_float(*n)),
            (Builtin::PrimitiveArray, value) => primitive_array(value),
            (Builtin::ObjectArray, Value::Array(array)) => Some(self.array(array, Mode::Rules)),
            (Builtin::Decimal, Value::Decimal(d)) => Some(d.to_string()),
            (Builtin::Path, Value::Path(path)) => Some(
                std::path::absolute(path)
                    .unwrap_or_else(|_| path.clone())
                    .display()
                    .to_string(),
            ),
            (Builtin::String, Value::String(s)) => Some(s.clone()),
            (Builtin::List, Value::List(list)) => Some(self.list(list)),
            (Builtin::Set, Value::Set(set)) => Some(self.set(set)),
            (Builtin::Map, Value::Map(map)) => Some(self.map(map)),
            (Builtin::Throwable, Value::Throwable(throwable)) => Some(stack_trace(throwable)),
            _ => None,
        };
        // A built-in rule reached through an unrelated class degrades to
        // natural text.
        text.unwrap_or_else(|| self.natural(value))
    }

    fn list(&mut self, list: &List) -> String {
        self.ordered(list.identity(), list.read().iter(), Mode::Rules)
    }

    fn set(&mut self, set: &Set) -> String {
        let items = set.read();
        if set.is_sorted() {
            return self.ordered(set.identity(), items.iter(), Mode::Rules);
        }
        match sort_naturally(items.iter().collect(), |item| *item) {
            Some(sorted) => self.ordered(set.identity(), sorted.into_iter(), Mode::Rules),
            None => {
                trace!("set elements are not mutually comparable");
                self.ordered(set.identity(), items.iter(), Mode::Natural)
            }
        }
    }

    fn map(&mut self, map: &Map) -> String {
        let entries = map.read();
        if map.is_sorted() {
            return self.entries(map.identity(), entries.iter(), Mode::Rules);
        }
        match sort_naturally(entries.iter().collect(), |entry| &entry.0) {
            Some(sorted) => self.entries(map.identity(), sorted.into_iter(), Mode::Rules),
            None => {
                trace!("map keys are not mutually comparable");
                self.entries(map.identity(), entries.iter(), Mode::Rules)
            }
        }
    }

    /// `[a, b, c]`, marking the collection itself wherever it appears.
    fn ordered<'v>(
        &mut self,
        owner: usize,
        items: impl Iterator<Item = &'v Value>,
        mode: Mode,
    ) -> String {
        self.path.push(owner);
        let parts: Vec<String> = items
            .map(|item| self.nested(owner, item, THIS_COLLECTION, mode))
            .collect();
        self.path.pop();
        format!("[{}]", parts.join(", "))
    }

    /// `{k=v, ...}`, marking the map itself wherever it appears.
    fn entries<'v>(
        &mut self,
        owner: usize,
        entries: impl Iterator<Item = &'v (Value, Value)>,
        mode: Mode,
    ) -> String {
        self.path.push(owner);
        let parts: Vec<String> = entries
            .map(|(key, value)| {
                let key = self.nested(owner, key, THIS_MAP, mode);
                let value = self.nested(owner, value, THIS_MAP, mode);
                format!("{key}={value}")
            })
            .collect();
        self.path.pop();
        format!("{{{}}}", parts.join(", "))
    }

    /// Renders an object array. Nested object arrays are rendered here
    /// directly; nested primitive arrays go through the registry.
    fn array(&mut self, array: &Array, mode: Mode) -> String {
        self.path.push(array.identity());
        let items = array.read();
        let mut parts = Vec::with_capacity(items.len());
        for item in items.iter() {
            let Some(id) = item.identity().filter(|_| item.is_array()) else {
                parts.push(self.nested(array.identity(), item, REPEATED, mode));
                continue;
            };
            if !self.seen_arrays.insert(id) {
                trace!("repeated array");
                parts.push(REPEATED.to_string());
                continue;
            }
            let text = match item {
                Value::Array(nested) => self.array(nested, mode),
                primitive => self.child(primitive, mode),
            };
            parts.push(text);
        }
        drop(items);
        self.path.pop();
        format!("[{}]", parts.join(", "))
    }

    fn nested(&mut self, owner: usize, item: &Value, marker: &str, mode: Mode) -> String {
        match item.identity() {
            Some(id) if id == owner => {
                trace!(marker, "self reference");
                marker.to_string()
            }
            Some(id) if self.path.contains(&id) => {
                trace!("cyclic reference");
                REPEATED.to_string()
            }
            _ => self.child(item, mode),
        }
    }

    fn child(&mut self, item: &Value, mode: Mode) -> String {
        match mode {
            Mode::Rules => self.render(item),
            Mode::Natural => self.natural(item),
        }
    }
}

/// The natural text of `value`, with cycle guards but without any registry.
pub(crate) fn natural_text(value: &Value) -> String {
    let rules = Rules::default();
    Renderer::new(&rules).natural(value)
}

/// Wraps `value` in double quotes, escaping embedded quotes.
///
/// ```
/// use sovran_render::quote_string;
///
/// assert_eq!(quote_string(r#"say "hi""#), r#""say \"hi\"""#);
/// ```
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 16);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' {
            quoted.push_str("\\\"");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('"');
    quoted
}

/// Sorts by natural order of `key`, or returns `None` as soon as two keys
/// are not comparable.
///
/// Every pair is compared once while inserting, so a partial `compare_to`
/// is detected instead of being handed to a sort that requires a total
/// order.
fn sort_naturally<T>(items: Vec<T>, key: impl Fn(&T) -> &Value) -> Option<Vec<T>> {
    let mut sorted: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let mut position = None;
        for (i, placed) in sorted.iter().enumerate() {
            let order = key(&item).natural_cmp(key(placed))?;
            if order == Ordering::Less && position.is_none() {
                position = Some(i);
            }
        }
        sorted.insert(position.unwrap_or(sorted.len()), item);
    }
    Some(sorted)
}

fn primitive_array(value: &Value) -> Option<String> {
    let text = match value {
        Value::BoolArray(a) => join(a.iter()),
        Value::ByteArray(a) => join(a.iter()),
        Value::CharArray(a) => join(a.iter()),
        Value::ShortArray(a) => join(a.iter()),
        Value::IntArray(a) => join(a.iter()),
        Value::LongArray(a) => join(a.iter()),
        Value::FloatArray(a) => join(a.iter().map(|n| natural_float(*n))),
        Value::DoubleArray(a) => join(a.iter().map(|n| natural_float(*n))),
        _ => return None,
    };
    Some(text)
}

fn join<T: Display>(items: impl Iterator<Item = T>) -> String {
    let parts: Vec<String> = items.map(|item| item.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn stack_trace(throwable: &Throwable) -> String {
    let mut text = format!("{}: {}", throwable.class().name, throwable.error());
    let mut source = throwable.error().source();
    while let Some(cause) = source {
        text.push_str("\nCaused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Float kinds that print in shortest round-trip form.
trait Floating: Copy + Display + Debug + LowerExp {
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn is_sign_negative(self) -> bool;
    /// The `f64` nearest to the shortest decimal text of `self`, so `f32`
    /// values keep the digits they print with (`1234567.9`, not
    /// `1234567.875`).
    fn widen(self) -> f64;
}

impl Floating for f32 {
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }
    fn is_sign_negative(self) -> bool {
        f32::is_sign_negative(self)
    }
    fn widen(self) -> f64 {
        self.to_string().parse().unwrap_or(f64::from(self))
    }
}

impl Floating for f64 {
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }
    fn is_sign_negative(self) -> bool {
        f64::is_sign_negative(self)
    }
    fn widen(self) -> f64 {
        self
    }
}

fn non_finite<F: Floating>(n: F) -> Option<&'static str> {
    if n.is_nan() {
        Some("NaN")
    } else if n.is_infinite() {
        Some(if n.is_sign_negative() {
            "-Infinity"
        } else {
            "Infinity"
        })
    } else {
        None
    }
}

/// `1.0`, `0.001`, `1.2345678E7`, `1.0E-7`
///
/// Plain notation in `[1e-3, 1e7)`, scientific with at least one fraction
/// digit outside it.
fn natural_float<F: Floating>(n: F) -> String {
    if let Some(text) = non_finite(n) {
        return text.to_string();
    }
    let magnitude = n.widen().abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{n:?}");
    }
    let scientific = format!("{n:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}

/// `1,234.500000`
fn fixed_float<F: Floating>(n: F) -> String {
    if let Some(text) = non_finite(n) {
        return text.to_string();
    }
    let fixed = format!("{:.6}", n.widen());
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    match unsigned.split_once('.') {
        Some((whole, fraction)) => format!("{sign}{}.{fraction}", group_whole(whole)),
        None => format!("{sign}{}", group_whole(unsigned)),
    }
}

/// Groups the integer digits of a fixed-notation float.
fn group_whole(digits: &str) -> String {
    match digits.parse::<u128>() {
        Ok(whole) => whole.to_formatted_string(&Locale::en),
        // Only f64 magnitudes above u128::MAX get here
        Err(_) => {
            let head = match digits.len() % 3 {
                0 => 3,
                n => n,
            };
            let mut groups = vec![&digits[..head]];
            groups.extend((head..digits.len()).step_by(3).map(|i| &digits[i..i + 3]));
            groups.join(Locale::en.separator())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("0", "0")]
    #[case("999", "999")]
    #[case("1000", "1,000")]
    #[case("123456", "123,456")]
    #[case("340282366920938463463374607431768211455", "340,282,366,920,938,463,463,374,607,431,768,211,455")]
    #[case("1000000000000000000000000000000000000000", "1,000,000,000,000,000,000,000,000,000,000,000,000,000")]
    #[case("12345678901234567890123456789012345678901", "12,345,678,901,234,567,890,123,456,789,012,345,678,901")]
    fn test_group_whole(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(group_whole(input), expected);
    }

    #[rstest]
    #[case(1234.5, "1,234.500000")]
    #[case(-0.25, "-0.250000")]
    #[case(f64::NAN, "NaN")]
    #[case(f64::NEG_INFINITY, "-Infinity")]
    #[case(-1234567.0, "-1,234,567.000000")]
    fn test_fixed_float(#[case] input: f64, #[case] expected: &str) {
        assert_eq!(fixed_float(input), expected);
    }

    #[test]
    fn test_fixed_float_keeps_printed_digits_of_f32() {
        assert_eq!(fixed_float(1234567.9f32), "1,234,567.900000");
        assert_eq!(fixed_float(0.1f32), "0.100000");
    }

    #[rstest]
    #[case(1.0, "1.0")]
    #[case(0.0, "0.0")]
    #[case(0.001, "0.001")]
    #[case(9999999.5, "9999999.5")]
    #[case(1e7, "1.0E7")]
    #[case(12345678.0, "1.2345678E7")]
    #[case(1e20, "1.0E20")]
    #[case(-1e20, "-1.0E20")]
    #[case(1e-7, "1.0E-7")]
    #[case(2.5e-4, "2.5E-4")]
    fn test_natural_float(#[case] input: f64, #[case] expected: &str) {
        assert_eq!(natural_float(input), expected);
    }

    #[test]
    fn test_natural_float_f32() {
        assert_eq!(natural_float(0.5f32), "0.5");
        assert_eq!(natural_float(1e10f32), "1.0E10");
        assert_eq!(natural_float(f32::INFINITY), "Infinity");
    }

    #[test]
    fn test_sort_naturally_rejects_any_incomparable_pair() {
        let mixed = vec![Value::from(2), Value::from(1), Value::from("x")];
        assert!(sort_naturally(mixed, |v| v).is_none());

        let ints = vec![Value::from(3), Value::from(1), Value::from(2), Value::from(1)];
        let sorted = sort_naturally(ints, |v| v).unwrap();
        assert_eq!(
            sorted,
            vec![Value::from(1), Value::from(1), Value::from(2), Value::from(3)]
        );
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("plain"), "\"plain\"");
        assert_eq!(quote_string(""), "\"\"");
        assert_eq!(quote_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_natural_text_of_self_referential_list() {
        let list = List::new();
        list.push(1);
        list.push(list.clone());
        assert_eq!(natural_text(&Value::from(list)), "[1, (this Collection)]");
    }
}
