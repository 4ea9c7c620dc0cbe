//! ClauDent - application shell for dental clinic records
//!
//! Navigation chrome, a global incremental patient search, a responsive
//! sidebar and a logout confirmation flow, rendered in the terminal.
//!
//! # Features
//!
//! - **Incremental search**: case-insensitive substring match over names and CURP
//! - **Recent selections**: the last five patients opened from search
//! - **Responsive sidebar**: docked on wide terminals, overlay on narrow ones
//! - **Live index**: the patient list can be reloaded while the shell runs
//!
//! # Example
//!
//! ```
//! use claudent::{PatientRecord, SearchController, Dropdown, Route};
//!
//! let index = vec![
//!     PatientRecord::new("1", "Ana", "Lopez", Some("ALOP01")),
//!     PatientRecord::new("2", "Beto", "Cruz", None),
//! ];
//!
//! let mut search = SearchController::new();
//! search.focus();
//! search.set_query("lo");
//! assert_eq!(search.dropdown(&index), Dropdown::Matches(vec![index[0].clone()]));
//!
//! let route = search.select_highlighted(&index);
//! assert_eq!(route, Some(Route::PatientDetail("1".into())));
//! assert_eq!(search.query(), "");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod navigation;
pub mod patient;
pub mod recents;
pub mod search;
pub mod session;
pub mod sidebar;
pub mod tui;

// Re-export main types
pub use error::{ClaudentError, Result};
pub use matcher::{match_patients, MAX_MATCHES};
pub use navigation::{NavItem, Navigator, Route, Router, NAV_ITEMS};
pub use patient::{PatientIndex, PatientRecord};
pub use recents::{RecentSelections, MAX_RECENTS};
pub use search::{Dropdown, SearchController, SearchPhase};
pub use session::{AuthSession, CurrentUser, LocalSession, LogoutFlow};
pub use sidebar::{SidebarController, SidebarMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
