//! Session-aware navigation bar.
//!
//! # Data Flow
//! ```text
//! GET /nav?path=...
//!     → session.rs (session + role lookups with the caller's cookie)
//!     → bar.rs (pure: path, session view, admin flag → visible items)
//!     → render.rs (HTML fragment)
//! ```

pub mod bar;
pub mod render;
pub mod session;
pub mod state;

pub use bar::{is_auth_page, NavBar, NavItem};
pub use render::render_html;
pub use session::{LookupError, SessionClient};
pub use state::{AdminFlag, Session, SessionUser, SessionView};
