//! # sovran-render
//!
//! Type-directed rendering of values for validation failure messages.
//!
//! `sovran-render` turns arbitrary runtime values into text by looking up the
//! most specific rule registered for the value's type. When the exact type has
//! no rule, the value's class hierarchy is searched for the closest ancestor
//! that does; when nothing matches, the value's natural text is used. Rendering
//! never fails, so a diagnostic can never mask the failure it describes.
//!
//! ## Key Features
//!
//! - **Most specific rule wins**: exact type first, then the shallowest
//!   ancestor through superclass and interface edges
//! - **Deterministic output**: sets and maps of comparable elements render
//!   sorted, so failure messages diff cleanly
//! - **Cycle safe**: self-referential lists, maps and arrays render markers
//!   instead of recursing forever
//! - **Build, then freeze**: configure a [`MutableStringMappers`], share the
//!   frozen [`StringMappers`] across threads
//!
//! ## Usage Examples
//!
//! ### Default Rules
//!
//! ```rust
//! use sovran_render::{List, Map, Set, StringMappers, Value};
//!
//! let mappers = StringMappers::defaults();
//!
//! assert_eq!(mappers.render(&Value::from(1_234_567)), "1,234,567");
//! assert_eq!(mappers.render(&Value::from(vec![1, 2])), "[1, 2]");
//! assert_eq!(mappers.render(&Value::Null), "null");
//!
//! // Sets and maps with comparable contents render in sorted order
//! let set: Set = ["pear", "apple"].into_iter().collect();
//! assert_eq!(mappers.render(&set.into()), "[apple, pear]");
//!
//! let map: Map = [("b", 2), ("a", 1)].into_iter().collect();
//! assert_eq!(mappers.render(&map.into()), "{a=1, b=2}");
//!
//! // A list that contains itself
//! let list = List::new();
//! list.push(list.clone());
//! assert_eq!(mappers.render(&list.into()), "[(this Collection)]");
//! ```
//!
//! ### Custom Rules for Your Own Types
//!
//! ```rust
//! use sovran_render::class::{self, Class};
//! use sovran_render::{MutableStringMappers, Object, Value};
//! use std::fmt;
//!
//! static ACCOUNT: Class = Class::new("Account", Some(&class::OBJECT), &[]);
//! static SAVINGS: Class = Class::new("Savings", Some(&ACCOUNT), &[]);
//!
//! #[derive(Debug)]
//! struct Savings {
//!     id: u32,
//! }
//!
//! impl fmt::Display for Savings {
//!     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
//!         write!(f, "Savings({})", self.id)
//!     }
//! }
//!
//! impl Object for Savings {
//!     fn class(&self) -> &'static Class {
//!         &SAVINGS
//!     }
//! }
//!
//! let mut mappers = MutableStringMappers::new();
//! mappers.put(&ACCOUNT, |value: &Value| match value.downcast_object::<Savings>() {
//!     Ok(savings) => format!("account #{}", savings.id),
//!     Err(_) => value.to_string(),
//! });
//! let mappers = mappers.to_immutable();
//!
//! // No rule for Savings itself, so the Account rule applies
//! assert_eq!(mappers.render(&Value::object(Savings { id: 7 })), "account #7");
//! ```
//!
//! ### Rules That Render Nested Values
//!
//! ```rust
//! use sovran_render::class;
//! use sovran_render::{List, MutableStringMappers, RenderRule, Value};
//!
//! let mut mappers = MutableStringMappers::new();
//! mappers.put_rule(
//!     &class::LIST,
//!     RenderRule::contextual(|value, renderer| match value {
//!         Value::List(list) => {
//!             let items: Vec<String> = list.values().iter().map(|v| renderer.render(v)).collect();
//!             format!("<{}>", items.join(" | "))
//!         }
//!         other => renderer.natural(other),
//!     }),
//! );
//!
//! let list: List = vec![1000, 2000].into_iter().collect();
//! assert_eq!(mappers.render(&list.into()), "<1,000 | 2,000>");
//! ```

mod any_value;
pub mod class;
mod error;
mod mappers;
mod mutable;
mod render;
mod resolve;
mod rule;
mod value;

pub use any_value::{AsAny, Object};
pub use class::{Class, Type, TypeKey};
pub use error::MapperError;
pub use mappers::StringMappers;
pub use mutable::MutableStringMappers;
pub use render::{quote_string, Renderer};
pub use resolve::RuleMatch;
pub use rule::RenderRule;
pub use value::{Array, List, Map, Set, Throwable, Value};
