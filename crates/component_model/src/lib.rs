//! Component Model
//!
//! This crate defines the lifecycle contract a host rendering framework
//! expects from its components:
//! - [`Component`]: render plus the optional lifecycle hooks
//! - [`ComponentType`]: a named, constructible component type
//! - [`Mounted`]: a minimal driver that mounts, updates and unmounts an
//!   instance, invoking hooks in the fixed host order
//!
//! # Example
//!
//! ```rust
//! use component_model::{Class, Component, ComponentResult, Mounted};
//!
//! struct Greeting;
//!
//! impl Component for Greeting {
//!     type Props = String;
//!     type State = ();
//!     type Output = String;
//!
//!     fn initial_state(&self, _props: &String) {}
//!
//!     fn render(&self, props: &String, _state: &()) -> ComponentResult<String> {
//!         Ok(format!("<p>{}</p>", props))
//!     }
//! }
//!
//! let greeting = Class::<Greeting>::new("Greeting", |_: &String| Greeting);
//! let mut mounted = Mounted::mount(&greeting, "Hi".to_string()).unwrap();
//! assert_eq!(mounted.output(), "<p>Hi</p>");
//!
//! mounted.update("Bye".to_string()).unwrap();
//! assert_eq!(mounted.output(), "<p>Bye</p>");
//! ```

mod component;
mod error;
mod mounted;

pub use component::{Class, Component, ComponentType};
pub use error::{ComponentError, ComponentResult};
pub use mounted::Mounted;
