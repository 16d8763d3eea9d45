//! Tabletop Engine library.
//!
//! Server side of the virtual tabletop: tracks live sessions per room and
//! fans state changes out to exactly the sessions allowed to see them.
//!
//! ## Structure
//!
//! - `use_cases/` - Visibility rules, labels, joining and room administration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - Session registry, fanout, HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
