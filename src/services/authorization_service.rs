//! Route authorization table
//!
//! Static mapping from (HTTP method, route pattern) to the roles allowed to
//! call it. Patterns are the axum route strings, so the middleware can look
//! up `MatchedPath` directly. Anything not listed is denied.

use axum::http::Method;
use serde::Serialize;

use crate::models::user::Role;
use crate::models::user::Role::{Admin, Cashier, Manager, Technician};

const EVERYONE: &[Role] = &[Admin, Manager, Cashier, Technician];
const ADMIN_ONLY: &[Role] = &[Admin];
const SUPERVISORS: &[Role] = &[Admin, Manager];
const FRONT_DESK: &[Role] = &[Admin, Manager, Cashier];
const WORKSHOP: &[Role] = &[Admin, Manager, Technician];
const LEAVE_APPLICANTS: &[Role] = &[Manager, Cashier, Technician];

/// (method, pattern, allowed roles)
pub const ROUTE_TABLE: &[(&str, &str, &[Role])] = &[
    ("GET", "/auth/me", EVERYONE),
    ("PATCH", "/auth/password", EVERYONE),
    ("GET", "/auth/roles", ADMIN_ONLY),
    ("GET", "/users", SUPERVISORS),
    ("POST", "/users", ADMIN_ONLY),
    ("GET", "/users/technicians", SUPERVISORS),
    ("GET", "/users/:id", SUPERVISORS),
    ("PATCH", "/users/:id", ADMIN_ONLY),
    ("PATCH", "/users/:id/role", ADMIN_ONLY),
    ("DELETE", "/users/:id", ADMIN_ONLY),
    ("GET", "/bookings", FRONT_DESK),
    ("POST", "/bookings", FRONT_DESK),
    ("GET", "/bookings/slots", FRONT_DESK),
    ("POST", "/bookings/validate", FRONT_DESK),
    ("GET", "/bookings/:id", FRONT_DESK),
    ("PATCH", "/bookings/:id", FRONT_DESK),
    ("PATCH", "/bookings/:id/status", SUPERVISORS),
    ("DELETE", "/bookings/:id", SUPERVISORS),
    ("GET", "/jobs", WORKSHOP),
    ("POST", "/jobs", SUPERVISORS),
    ("GET", "/jobs/:id", WORKSHOP),
    ("PATCH", "/jobs/:id/assign", SUPERVISORS),
    ("PATCH", "/jobs/:id/status", WORKSHOP),
    ("DELETE", "/jobs/:id", SUPERVISORS),
    ("GET", "/inventory", EVERYONE),
    ("POST", "/inventory", SUPERVISORS),
    ("GET", "/inventory/low-stock", SUPERVISORS),
    ("GET", "/inventory/:id", EVERYONE),
    ("PATCH", "/inventory/:id", SUPERVISORS),
    ("PATCH", "/inventory/:id/stock", SUPERVISORS),
    ("DELETE", "/inventory/:id", ADMIN_ONLY),
    ("GET", "/goods-requests", WORKSHOP),
    ("POST", "/goods-requests", WORKSHOP),
    ("GET", "/goods-requests/:id", WORKSHOP),
    ("PATCH", "/goods-requests/:id/status", SUPERVISORS),
    ("GET", "/invoices", FRONT_DESK),
    ("POST", "/invoices", FRONT_DESK),
    ("GET", "/invoices/:id", FRONT_DESK),
    ("PATCH", "/invoices/:id/status", FRONT_DESK),
    ("DELETE", "/invoices/:id", ADMIN_ONLY),
    ("GET", "/leave-requests", EVERYONE),
    ("POST", "/leave-requests", LEAVE_APPLICANTS),
    ("GET", "/leave-requests/:id", EVERYONE),
    ("PATCH", "/leave-requests/:id/status", SUPERVISORS),
    ("DELETE", "/leave-requests/:id", EVERYONE),
];

/// Roles allowed on a route, `None` when the route is not in the table
pub fn allowed_roles(method: &Method, pattern: &str) -> Option<&'static [Role]> {
    ROUTE_TABLE
        .iter()
        .find(|(m, p, _)| *m == method.as_str() && *p == pattern)
        .map(|(_, _, roles)| *roles)
}

pub fn is_allowed(method: &Method, pattern: &str, role: Role) -> bool {
    allowed_roles(method, pattern).map_or(false, |roles| roles.contains(&role))
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteGrant {
    pub method: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleSummary {
    pub role: Role,
    pub routes: Vec<RouteGrant>,
}

/// Every route a role can reach, in table order
pub fn routes_for(role: Role) -> Vec<RouteGrant> {
    ROUTE_TABLE
        .iter()
        .filter(|(_, _, roles)| roles.contains(&role))
        .map(|(method, path, _)| RouteGrant {
            method: *method,
            path: *path,
        })
        .collect()
}

pub fn role_summaries() -> Vec<RoleSummary> {
    Role::ALL
        .iter()
        .map(|role| RoleSummary {
            role: *role,
            routes: routes_for(*role),
        })
        .collect()
}
