//! # Task value form behavior
//!
//! Keeps a derived `task_value_dollars` field in step with two editable
//! fields, `rate_per_hour` and `audio_length_minutes`:
//!
//! ```rust
//! use taskcalc_form::*;
//!
//! let doc = Document::new();
//! let form = doc.append_container(doc.root(), Some("task-form")).unwrap();
//! let rate = doc.append_input(form, Some("rate_per_hour"), "60").unwrap();
//! let minutes = doc.append_input(form, Some("audio_length_minutes"), "").unwrap();
//! doc.append_input(form, Some("task_value_dollars"), "").unwrap();
//!
//! let calc = TaskCalculator::for_document(doc.clone(), &CalculatorConfig::default());
//! let mounted = doc.mount_hook(form, calc).unwrap();
//!
//! doc.type_text(minutes, "30").unwrap();
//! assert_eq!(doc.input_by_id("task_value_dollars").unwrap().value(), "30.00");
//!
//! doc.set_input_value(rate, "abc").unwrap();
//! assert_eq!(doc.input_by_id("task_value_dollars").unwrap().value(), "0.00");
//! mounted.destroy();
//! ```
//!
//! - [`Document`] is the host page: elements, identifiers, bubbling `input`
//!   events.
//! - [`Hook`] is the lifecycle contract (`mounted`, `updated`, `destroyed`).
//! - [`TaskCalculator`] is the behavior; it gets its fields injected through
//!   a [`FieldSource`].
//! - On wasm32, `web::TaskCalculatorHook` drives the same calculator against
//!   the browser DOM.

pub mod calculator;
pub mod config;
pub mod document;
pub mod field;
pub mod hook;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use calculator::*;
pub use config::*;
pub use document::*;
pub use field::*;
pub use hook::*;
