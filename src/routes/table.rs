use crate::routes::guard::Guard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteCategory {
    Public,
    AuthOnly,
    Protected,
}

impl RouteCategory {
    pub fn guard(&self) -> Option<Guard> {
        match self {
            RouteCategory::Public => None,
            RouteCategory::AuthOnly => Some(Guard::AuthOnly),
            RouteCategory::Protected => Some(Guard::Protected),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    /// Segments match literally, `:name` matches one segment, a trailing `*` matches the rest.
    pub pattern: &'static str,
    pub category: RouteCategory,
    pub page: &'static str,
}

const fn route(pattern: &'static str, category: RouteCategory, page: &'static str) -> Route {
    Route {
        pattern,
        category,
        page,
    }
}

pub const ROUTES: &[Route] = &[
    route("/", RouteCategory::Public, "Landing"),
    route("/about", RouteCategory::Public, "About us"),
    route("/contact", RouteCategory::Public, "Contact"),
    route("/warehouses", RouteCategory::Public, "Warehouse catalogue"),
    route("/warehouses/:id", RouteCategory::Public, "Warehouse details"),
    route("/login", RouteCategory::AuthOnly, "Login"),
    route("/register", RouteCategory::AuthOnly, "Register"),
    route("/home", RouteCategory::Protected, "Home"),
    route("/profile", RouteCategory::Protected, "Profile"),
    route("/rentals", RouteCategory::Protected, "My rentals"),
    route("/rentals/:id", RouteCategory::Protected, "Rental details"),
    route("/appointments", RouteCategory::Protected, "My appointments"),
    route("/feedback", RouteCategory::Protected, "Feedback"),
    route("/payments", RouteCategory::Protected, "Payments"),
    route("/crm", RouteCategory::Protected, "CRM dashboard"),
    route("/crm/*", RouteCategory::Protected, "CRM"),
];

const NOT_FOUND: Route = route("*", RouteCategory::Public, "Not found");

/// First route whose pattern matches `path`; unknown paths are public.
pub fn classify(path: &str) -> Route {
    let path = normalize(path);

    ROUTES
        .iter()
        .find(|route| matches(route.pattern, path))
        .copied()
        .unwrap_or(NOT_FOUND)
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path[..end].trim_end_matches('/');

    if path.is_empty() { "/" } else { path }
}

fn matches(pattern: &str, path: &str) -> bool {
    let mut pattern = pattern.split('/').filter(|s| !s.is_empty());
    let mut path = path.split('/').filter(|s| !s.is_empty());

    loop {
        match (pattern.next(), path.next()) {
            (Some("*"), Some(_)) => return true,
            (Some(expected), Some(actual)) => {
                if !expected.starts_with(':') && expected != actual {
                    return false;
                }
            }
            (None, None) => return true,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_routes() {
        assert_eq!(classify("/").category, RouteCategory::Public);
        assert_eq!(classify("/login").category, RouteCategory::AuthOnly);
        assert_eq!(classify("/register/").category, RouteCategory::AuthOnly);
        assert_eq!(classify("/rentals").category, RouteCategory::Protected);
        assert_eq!(classify("/rentals/42?tab=invoices").page, "Rental details");
        assert_eq!(classify("/warehouses/7").category, RouteCategory::Public);
    }

    #[test]
    fn crm_prefix_is_protected() {
        assert_eq!(classify("/crm").page, "CRM dashboard");
        assert_eq!(classify("/crm/contracts/12").category, RouteCategory::Protected);
    }

    #[test]
    fn unknown_paths_are_public() {
        let route = classify("/nowhere/at/all");

        assert_eq!(route.category, RouteCategory::Public);
        assert_eq!(route.page, "Not found");
        assert_eq!(route.category.guard(), None);
    }

    #[test]
    fn parameters_match_one_segment() {
        assert!(matches("/warehouses/:id", "/warehouses/7"));
        assert!(!matches("/warehouses/:id", "/warehouses/7/lots"));
        assert!(!matches("/crm/*", "/crm"));
    }
}
