//! Route table and admission rules.

use crate::frontend::services::context::SessionState;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Signup,
    Dashboard,
    Medications,
    Appointments,
    Forum,
    ForumPost { id: i64 },
    Profile,
}

/// Who a route is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Only while signed out.
    Public,
    /// Only while signed in.
    Private,
}

/// What to show for a route given the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The session is still resolving; show the neutral loading view.
    Placeholder,
    Render(Route),
    Redirect(Route),
}

/// Where anonymous users are sent.
pub const LOGIN_ROUTE: Route = Route::Login;

/// Where signed-in users land.
pub const DEFAULT_PRIVATE_ROUTE: Route = Route::Dashboard;

impl Route {
    pub const fn access(&self) -> Access {
        match self {
            Self::Landing | Self::Login | Self::Signup => Access::Public,
            _ => Access::Private,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Dashboard => "/app/dashboard".to_string(),
            Self::Medications => "/app/medications".to_string(),
            Self::Appointments => "/app/appointments".to_string(),
            Self::Forum => "/app/forum".to_string(),
            Self::ForumPost { id } => format!("/app/forum/{id}"),
            Self::Profile => "/app/profile".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRoute(pub String);

impl fmt::Display for UnknownRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No route matches {}", self.0)
    }
}

impl std::error::Error for UnknownRoute {}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Landing,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["dashboard"] | ["app"] | ["app", "dashboard"] => Self::Dashboard,
            ["app", "medications"] => Self::Medications,
            ["app", "appointments"] => Self::Appointments,
            ["app", "forum"] => Self::Forum,
            ["app", "forum", id] => Self::ForumPost {
                id: id.parse().map_err(|_| UnknownRoute(path.to_string()))?,
            },
            ["app", "profile"] => Self::Profile,
            _ => return Err(UnknownRoute(path.to_string())),
        };

        Ok(route)
    }
}

/// Admission rule: private routes need a user, public routes need none, and
/// nothing renders until the session has resolved.
pub fn admit(state: &SessionState, route: &Route) -> Admission {
    match (state, route.access()) {
        (SessionState::Resolving, _) => Admission::Placeholder,
        (SessionState::Authenticated(_), Access::Private)
        | (SessionState::Anonymous, Access::Public) => Admission::Render(route.clone()),
        (SessionState::Authenticated(_), Access::Public) => {
            Admission::Redirect(DEFAULT_PRIVATE_ROUTE)
        }
        (SessionState::Anonymous, Access::Private) => Admission::Redirect(LOGIN_ROUTE),
    }
}
