//! Route access policy.
//!
//! Every navigable destination is listed once in [`ROUTES`] together with its
//! guard. [`decide`] is the only place the guard is evaluated. It is pure:
//! no I/O, no logging, and the same inputs always give the same decision.

use crate::models::Role;
use crate::session::Session;

/// A navigable view of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Home,
    Login,
    Register,
    Hospitals,
    Users,
    Inventory,
    /// Admin review queue of submitted donations
    Donations,
    /// Admin review queue of submitted blood requests
    Requests,
    Donate,
    Request,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Home => "/",
            Destination::Login => "/login",
            Destination::Register => "/register",
            Destination::Hospitals => "/hospitals",
            Destination::Users => "/users",
            Destination::Inventory => "/inventory",
            Destination::Donations => "/donations",
            Destination::Requests => "/requests",
            Destination::Donate => "/donate",
            Destination::Request => "/request",
        }
    }

    /// Label shown in the navigation bar
    pub fn title(&self) -> &'static str {
        match self {
            Destination::Home => "Home",
            Destination::Login => "Login",
            Destination::Register => "Register",
            Destination::Hospitals => "Hospitals",
            Destination::Users => "Users",
            Destination::Inventory => "Blood Inventory",
            Destination::Donations => "Donation Review",
            Destination::Requests => "Request Review",
            Destination::Donate => "Donate Blood",
            Destination::Request => "Request Blood",
        }
    }

    /// Guard declared for this destination in [`ROUTES`]
    pub fn access(&self) -> Access {
        ROUTES
            .iter()
            .find(|route| route.destination == *self)
            .map(|route| route.access)
            .unwrap_or(Access::Protected(RouteGuardSpec::AUTHENTICATED))
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = format!("/{}", s.trim().trim_start_matches('/').to_lowercase());
        ROUTES
            .iter()
            .map(|route| route.destination)
            .find(|d| d.path() == path)
            .ok_or_else(|| format!("Unknown destination: {}", s))
    }
}

/// Roles permitted to enter a protected destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuardSpec {
    /// `None` admits any authenticated user
    pub required_roles: Option<&'static [Role]>,
}

impl RouteGuardSpec {
    /// Any authenticated user
    pub const AUTHENTICATED: RouteGuardSpec = RouteGuardSpec {
        required_roles: None,
    };

    /// Only users holding one of `roles`
    pub const fn only(roles: &'static [Role]) -> Self {
        Self {
            required_roles: Some(roles),
        }
    }
}

/// How a destination is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable without a session
    Public,
    /// Checked with [`decide`] on every entry
    Protected(RouteGuardSpec),
}

/// One row of the route table
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub destination: Destination,
    pub access: Access,
}

const ADMIN: &[Role] = &[Role::Admin];
const DONOR: &[Role] = &[Role::Donor];
const PATIENT: &[Role] = &[Role::Patient];

/// The complete authorization policy of the client
pub const ROUTES: &[Route] = &[
    Route { destination: Destination::Home, access: Access::Public },
    Route { destination: Destination::Login, access: Access::Public },
    Route { destination: Destination::Register, access: Access::Public },
    Route { destination: Destination::Hospitals, access: Access::Protected(RouteGuardSpec::only(ADMIN)) },
    Route { destination: Destination::Users, access: Access::Protected(RouteGuardSpec::only(ADMIN)) },
    Route { destination: Destination::Inventory, access: Access::Protected(RouteGuardSpec::only(ADMIN)) },
    Route { destination: Destination::Donations, access: Access::Protected(RouteGuardSpec::only(ADMIN)) },
    Route { destination: Destination::Requests, access: Access::Protected(RouteGuardSpec::only(ADMIN)) },
    Route { destination: Destination::Donate, access: Access::Protected(RouteGuardSpec::only(DONOR)) },
    Route { destination: Destination::Request, access: Access::Protected(RouteGuardSpec::only(PATIENT)) },
];

/// Outcome of entering a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// No session: send the user to the login page
    RedirectToLogin,
    /// Authenticated with the wrong role: silently go home, so the existence
    /// of the destination is not revealed
    RedirectToHome,
}

impl AccessDecision {
    /// Destination actually shown after applying the decision
    pub fn target(&self, requested: Destination) -> Destination {
        match self {
            AccessDecision::Allow => requested,
            AccessDecision::RedirectToLogin => Destination::Login,
            AccessDecision::RedirectToHome => Destination::Home,
        }
    }
}

/// Decide whether `session` may enter a destination guarded by `spec`.
pub fn decide(session: Option<&Session>, spec: &RouteGuardSpec) -> AccessDecision {
    let Some(session) = session else {
        return AccessDecision::RedirectToLogin;
    };

    match spec.required_roles {
        Some(roles) if !roles.contains(&session.role()) => AccessDecision::RedirectToHome,
        _ => AccessDecision::Allow,
    }
}

/// Decide for a destination of the route table.
pub fn check(session: Option<&Session>, destination: Destination) -> AccessDecision {
    match destination.access() {
        Access::Public => AccessDecision::Allow,
        Access::Protected(spec) => decide(session, &spec),
    }
}
