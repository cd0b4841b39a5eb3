use crate::{error::ClientResult, router::Route, session::UserSession, AskPdfClient};

pub const BRAND: &str = "AskPDF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavbarState {
    LoggedOut,
    LoggedIn { name: String, email: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Home,
    Dashboard,
    Pricing,
    Login,
    Logout,
}

impl NavAction {
    pub fn label(self) -> &'static str {
        match self {
            NavAction::Home => BRAND,
            NavAction::Dashboard => "Dashboard",
            NavAction::Pricing => "Pricing",
            NavAction::Login => "Login",
            NavAction::Logout => "Logout",
        }
    }
}

impl NavbarState {
    pub fn from_session(session: Option<&UserSession>) -> Self {
        match session {
            Some(user) => NavbarState::LoggedIn {
                name: user.name.clone(),
                email: user.email.clone(),
            },
            None => NavbarState::LoggedOut,
        }
    }

    /// Entries shown on the right-hand side; the brand always links home.
    pub fn actions(&self) -> &'static [NavAction] {
        match self {
            NavbarState::LoggedIn { .. } => &[NavAction::Dashboard, NavAction::Logout],
            NavbarState::LoggedOut => &[NavAction::Pricing, NavAction::Login],
        }
    }
}

/// Performs a navbar action and returns where to go next.
pub async fn activate(action: NavAction, client: &AskPdfClient) -> ClientResult<Route> {
    match action {
        NavAction::Home => Ok(Route::Home),
        NavAction::Dashboard => Ok(Route::Dashboard),
        NavAction::Pricing => Ok(Route::Pricing),
        NavAction::Login => Ok(Route::Login),
        NavAction::Logout => {
            client.logout().await?;
            Ok(Route::Home)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pages::fake_api::{client_for, FakeApi};

    #[test]
    fn logged_out_navbar_offers_login() {
        let state = NavbarState::from_session(None);
        assert_eq!(state, NavbarState::LoggedOut);
        assert!(state.actions().contains(&NavAction::Login));
    }

    #[tokio::test]
    async fn logout_action_clears_session_and_notifies_server() {
        let api = Arc::new(FakeApi::default());
        let client = client_for(api.clone(), true);
        let mut rx = client.session().subscribe();
        let state = NavbarState::from_session(rx.borrow_and_update().as_ref());
        assert_eq!(state.actions(), &[NavAction::Dashboard, NavAction::Logout]);

        let route = activate(NavAction::Logout, &client).await.expect("logout");

        assert_eq!(route, Route::Home);
        assert!(rx.has_changed().expect("store alive"));
        assert_eq!(
            NavbarState::from_session(rx.borrow_and_update().as_ref()),
            NavbarState::LoggedOut
        );
        assert_eq!(api.state.lock().expect("state").logout_calls, 1);
    }
}
