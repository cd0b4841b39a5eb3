use std::fmt;

use shared::domain::{DocumentId, Plan};

use crate::session::UserSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register { plan: Plan },
    Dashboard,
    Chat { document_id: DocumentId },
    Pricing,
}

impl Route {
    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Chat { .. })
    }

    /// Parses a path such as `/chat/<uuid>` or `/register?plan=pro`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["register"] => {
                let plan = query
                    .and_then(|query| {
                        query
                            .split('&')
                            .filter_map(|pair| pair.split_once('='))
                            .find(|(key, _)| *key == "plan")
                            .and_then(|(_, value)| value.parse::<Plan>().ok())
                    })
                    .unwrap_or_default();
                Some(Route::Register { plan })
            }
            ["dashboard"] => Some(Route::Dashboard),
            ["pricing"] => Some(Route::Pricing),
            ["chat", id] => id
                .parse::<DocumentId>()
                .ok()
                .map(|document_id| Route::Chat { document_id }),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Login => f.write_str("/login"),
            Route::Register { plan: Plan::Free } => f.write_str("/register"),
            Route::Register { plan } => write!(f, "/register?plan={plan}"),
            Route::Dashboard => f.write_str("/dashboard"),
            Route::Chat { document_id } => write!(f, "/chat/{document_id}"),
            Route::Pricing => f.write_str("/pricing"),
        }
    }
}

/// Redirects protected routes to the login page when nobody is signed in.
pub fn guard(route: Route, session: Option<&UserSession>) -> Route {
    if route.requires_session() && session.is_none() {
        Route::Login
    } else {
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn parses_and_renders_chat_route() {
        let id = DocumentId(Uuid::new_v4());
        let route = Route::Chat { document_id: id };
        assert_eq!(Route::parse(&route.to_string()), Some(route));
    }

    #[test]
    fn register_route_carries_plan_from_query() {
        assert_eq!(
            Route::parse("/register?plan=pro"),
            Some(Route::Register { plan: Plan::Pro })
        );
        assert_eq!(
            Route::parse("/register"),
            Some(Route::Register { plan: Plan::Free })
        );
        assert_eq!(
            Route::Register { plan: Plan::Pro }.to_string(),
            "/register?plan=pro"
        );
    }

    #[test]
    fn rejects_unknown_paths_and_bad_ids() {
        assert_eq!(Route::parse("/chat/not-a-uuid"), None);
        assert_eq!(Route::parse("/settings"), None);
        assert_eq!(Route::parse("/"), Some(Route::Home));
    }

    #[test]
    fn guard_sends_anonymous_users_to_login() {
        assert_eq!(guard(Route::Dashboard, None), Route::Login);
        assert_eq!(guard(Route::Pricing, None), Route::Pricing);

        let user = UserSession {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            token: "t".into(),
            plan: None,
        };
        assert_eq!(guard(Route::Dashboard, Some(&user)), Route::Dashboard);
    }
}
