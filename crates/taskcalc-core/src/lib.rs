//! # Signals, scopes and form numbers
//!
//! The pieces a form behavior needs without any UI toolkit attached:
//!
//! - `Signal<T>`: cloneable, observable value. Input fields keep their text
//!   in one so anything can watch a field change.
//! - `Scope` / `Dispose`: lifecycle of a mounted behavior. Listeners register
//!   a cleanup on the scope and go away when the host is torn down.
//! - `number`: lenient parsing of field text and fixed-point formatting.
//!
//! ```rust
//! use taskcalc_core::*;
//!
//! let text = signal(String::from("60"));
//! let seen = signal(0.0);
//! text.subscribe({
//!     let seen = seen.clone();
//!     move |t: &String| seen.set(number_or_zero(t))
//! });
//! text.set("45.5 per hour".into());
//! assert_eq!(seen.get(), 45.5);
//! assert_eq!(to_fixed(seen.get() / 60.0 * 30.0, 2), "22.75");
//! ```

pub mod effects;
pub mod error;
pub mod number;
pub mod scope;
pub mod signal;

pub use effects::*;
pub use error::*;
pub use number::{number_or_zero, parse_float_prefix, to_fixed};
pub use scope::*;
pub use signal::*;
