//! Navigation bar, derived from the route table and the current session.

use std::fmt;

use crate::guard::{self, Access, AccessDecision, Destination, ROUTES};
use crate::session::Session;

pub const BRAND: &str = "BloodSync";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Link(Destination),
    Logout,
}

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Link(destination) => destination.title(),
            NavItem::Logout => "Logout",
        }
    }
}

impl fmt::Display for NavItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavItem::Link(destination) => write!(f, "{} ({})", self.label(), destination.path()),
            NavItem::Logout => f.write_str(self.label()),
        }
    }
}

/// Links shown for the given session.
///
/// Without a session this is Login and Register. With one, every protected
/// destination the guard lets the user into, followed by Logout.
pub fn nav_items(session: Option<&Session>) -> Vec<NavItem> {
    let Some(current) = session else {
        return vec![
            NavItem::Link(Destination::Login),
            NavItem::Link(Destination::Register),
        ];
    };

    ROUTES
        .iter()
        .filter(|route| matches!(route.access, Access::Protected(_)))
        .filter(|route| guard::check(Some(current), route.destination) == AccessDecision::Allow)
        .map(|route| NavItem::Link(route.destination))
        .chain(std::iter::once(NavItem::Logout))
        .collect()
}

/// One-line rendering: brand, links, and who is signed in.
pub fn render(session: Option<&Session>) -> String {
    let items: Vec<String> = nav_items(session)
        .iter()
        .map(|item| item.label().to_string())
        .collect();
    let mut line = format!("{} | {}", BRAND, items.join(" | "));
    if let Some(session) = session {
        line.push_str(&format!(
            "    [{} ({})]",
            session.identity.username,
            session.role()
        ));
    }
    line
}
