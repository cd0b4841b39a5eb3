use shared::{
    domain::Plan,
    protocol::{LoginRequest, RegisterRequest},
};
use tracing::error;

use crate::{
    error::{ClientError, ClientResult},
    router::Route,
    session::UserSession,
    AskPdfClient,
};

fn validate_email(email: &str) -> ClientResult<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(ClientError::Validation(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

fn require(field: &str, value: &str) -> ClientResult<()> {
    if value.is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LoginPage {
    pub fn submit_label(&self) -> &'static str {
        if self.is_loading {
            "Logging in..."
        } else {
            "Log in"
        }
    }

    fn request(&self) -> ClientResult<LoginRequest> {
        let email = validate_email(&self.email)?;
        require("Password", &self.password)?;
        Ok(LoginRequest {
            email,
            password: self.password.clone(),
        })
    }

    pub fn begin(&mut self) -> ClientResult<LoginRequest> {
        if self.is_loading {
            return Err(ClientError::Validation("login already in progress".into()));
        }
        match self.request() {
            Ok(request) => {
                self.error = None;
                self.is_loading = true;
                Ok(request)
            }
            Err(err) => {
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Applies the outcome; `Some(route)` means navigate there.
    pub fn finish(&mut self, result: &ClientResult<UserSession>) -> Option<Route> {
        self.is_loading = false;
        match result {
            Ok(_) => {
                self.password.clear();
                self.error = None;
                Some(Route::Dashboard)
            }
            Err(err) => {
                error!("login failed: {err}");
                self.error = Some(err.user_message());
                None
            }
        }
    }

    pub async fn submit(&mut self, client: &AskPdfClient) -> ClientResult<Route> {
        let request = self.begin()?;
        let result = client.login(&request).await;
        let route = self.finish(&result);
        result.map(|_| route.unwrap_or(Route::Dashboard))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterPage {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub plan: Plan,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl RegisterPage {
    pub fn with_plan(plan: Plan) -> Self {
        Self {
            plan,
            ..Self::default()
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_loading {
            "Creating account..."
        } else {
            "Create account"
        }
    }

    fn request(&self) -> ClientResult<RegisterRequest> {
        let name = self.name.trim();
        require("Name", name)?;
        let email = validate_email(&self.email)?;
        require("Password", &self.password)?;
        if self.password != self.confirm_password {
            return Err(ClientError::Validation("Passwords do not match".into()));
        }
        Ok(RegisterRequest {
            name: name.to_string(),
            email,
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            plan: self.plan,
        })
    }

    pub fn begin(&mut self) -> ClientResult<RegisterRequest> {
        if self.is_loading {
            return Err(ClientError::Validation(
                "registration already in progress".into(),
            ));
        }
        match self.request() {
            Ok(request) => {
                self.error = None;
                self.is_loading = true;
                Ok(request)
            }
            Err(err) => {
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    pub fn finish(&mut self, result: &ClientResult<UserSession>) -> Option<Route> {
        self.is_loading = false;
        match result {
            Ok(_) => {
                self.password.clear();
                self.confirm_password.clear();
                self.error = None;
                Some(Route::Dashboard)
            }
            Err(err) => {
                error!("registration failed: {err}");
                self.error = Some(err.user_message());
                None
            }
        }
    }

    pub async fn submit(&mut self, client: &AskPdfClient) -> ClientResult<Route> {
        let request = self.begin()?;
        let result = client.register(&request).await;
        let route = self.finish(&result);
        result.map(|_| route.unwrap_or(Route::Dashboard))
    }
}

#[cfg(test)]
#[path = "../tests/auth_page_tests.rs"]
mod tests;
