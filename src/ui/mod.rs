//! User interface
//!
//! - `route`: hash routes for the four pages
//! - `view`: HTML rendering, free of DOM access
//! - `app`: page controller the browser front-end drives

pub mod app;
pub mod route;
pub mod view;

pub use app::{Action, App, Field, Outcome};
pub use route::Route;
