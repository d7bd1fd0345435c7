//! # navigator
//!
//! A registry of named routes with search and ranking queries, plus the
//! menu-driven console that drives it. Routes are stored in an
//! [`rbmap::RbMap`] keyed by route identifier.
//!
//! ## Example
//!
//! ```rust
//! use navigator::{Navigator, Route};
//!
//! let mut nav = Navigator::new();
//! nav.add_route(Route::new("r1", ["Oslo", "Bergen"], 463.0, 4, true)?)?;
//! nav.add_route(Route::new("r2", ["Oslo", "Lillehammer", "Bergen"], 520.0, 9, false)?)?;
//!
//! nav.choose_route("r1")?;
//! let found = nav.search_routes("Oslo", "Bergen");
//! assert_eq!(found[0].id(), "r1");
//! assert_eq!(nav.top_routes(1)[0].id(), "r2");
//! # Ok::<(), navigator::NavigatorError>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod console;
pub mod error;
pub mod registry;
pub mod route;

pub use config::Config;
pub use console::Console;
pub use error::{NavigatorError, Result};
pub use registry::Navigator;
pub use route::Route;
