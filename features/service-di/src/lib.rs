//! Minimal dependency injection container
//!
//! Services are registered by type together with a constructor and a [Lifecycle]:
//! - [Lifecycle::Transient] services are constructed on every resolve
//! - [Lifecycle::Singleton] services are constructed on first resolve and shared afterwards
//!
//! ```
//! use std::sync::Arc;
//! use service_di::{Container, Lifecycle};
//!
//! struct Greeter {
//!     greeting: String,
//! }
//!
//! let container = Container::new();
//! container.register(
//!     || Greeter {
//!         greeting: "hello".to_string(),
//!     },
//!     Lifecycle::Singleton,
//! );
//!
//! let first = container.resolve::<Greeter>().unwrap();
//! let second = container.must_resolve::<Greeter>();
//! assert_eq!(first.greeting, "hello");
//! assert!(Arc::ptr_eq(&first, &second));
//! ```
//!
//! Constructors may resolve other services from the same container.
//! A singleton must not resolve itself (directly or through other services)
//! while it is being constructed, this never returns.

pub mod builder;
pub mod container;
mod entry;
pub mod errors;
pub mod types;

pub use builder::ContainerBuilder;
pub use container::{Container, WeakContainer};
pub use errors::ResolveError;
pub use types::{Injectable, Lifecycle, TypeInfo};
