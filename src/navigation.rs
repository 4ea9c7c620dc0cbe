//! Routes, sidebar navigation items and the router that fulfils navigation
//! intents.

use std::fmt;

/// A destination inside the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Patients,
    Services,
    Quotes,
    /// Detail view keyed by patient identifier
    PatientDetail(String),
    Login,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/dashboard".to_string(),
            Route::Patients => "/pacientes".to_string(),
            Route::Services => "/servicios".to_string(),
            Route::Quotes => "/cotizaciones".to_string(),
            Route::PatientDetail(id) => format!("/pacientes/{}", id),
            Route::Login => "/login".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        match path {
            "/dashboard" => Some(Route::Dashboard),
            "/pacientes" => Some(Route::Patients),
            "/servicios" => Some(Route::Services),
            "/cotizaciones" => Some(Route::Quotes),
            "/login" => Some(Route::Login),
            _ => {
                let id = path.strip_prefix("/pacientes/")?;
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::PatientDetail(id.to_string()))
                }
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Principal",
            Route::Patients => "Pacientes",
            Route::Services => "Servicios",
            Route::Quotes => "Cotizaciones",
            Route::PatientDetail(_) => "Paciente",
            Route::Login => "Iniciar sesión",
        }
    }

    /// The sidebar entry this route lives under, if any
    pub fn section(&self) -> Option<&'static NavItem> {
        let section = match self {
            Route::PatientDetail(_) => &Route::Patients,
            other => other,
        };
        NAV_ITEMS.iter().find(|item| &item.route() == section)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// An entry in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub path: &'static str,
}

impl NavItem {
    pub fn route(&self) -> Route {
        // NAV_ITEMS only holds static, well-formed paths
        Route::parse(self.path).unwrap_or(Route::Dashboard)
    }
}

pub static NAV_ITEMS: [NavItem; 4] = [
    NavItem { label: "Principal", icon: "\u{2302}", path: "/dashboard" },
    NavItem { label: "Pacientes", icon: "\u{263A}", path: "/pacientes" },
    NavItem { label: "Servicios", icon: "\u{2695}", path: "/servicios" },
    NavItem { label: "Cotizaciones", icon: "\u{2630}", path: "/cotizaciones" },
];

/// Routes remembered for back navigation; older ones are dropped.
pub const MAX_HISTORY: usize = 50;

/// Anything that can fulfil a navigation request.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Keeps the current route and the trail that led there.
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Return to the previous route. Returns false at the start of the trail.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                tracing::debug!(from = %self.current, to = %previous, "navigate back");
                self.current = previous;
                true
            }
            None => false,
        }
    }
}

impl Navigator for Router {
    fn navigate(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        tracing::debug!(from = %self.current, to = %route, "navigate");
        let previous = std::mem::replace(&mut self.current, route);
        if self.history.len() == MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(previous);
    }
}
