//! # Account Commands
//!
//! Login, registration and logout. Registering signs the new account in.

use serde::Serialize;
use std::fmt::Write;
use storefront_core::account::{authenticate, register, RegistrationForm};
use storefront_core::store::Action;
use storefront_core::User;
use tracing::{debug, info};

use super::Render;
use crate::error::ApiError;
use crate::state::{ConfigState, Session};

/// The signed-in account, without its credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub is_admin: bool,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        AccountView {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Whoever is signed in, if anyone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<AccountView>,
}

pub async fn login(session: &mut Session, email: &str, password: &str) -> Result<SessionView, ApiError> {
    debug!(email = %email, "login command");

    let user = authenticate(&session.state().users, email, password)?.clone();
    info!(user_id = %user.id, admin = user.is_admin, "Signed in");

    let view = SessionView {
        user: Some(AccountView::from(&user)),
    };
    session.dispatch(Action::SetCurrentUser(Some(user)));
    session.save().await?;
    Ok(view)
}

pub async fn register_account(
    session: &mut Session,
    form: RegistrationForm,
) -> Result<SessionView, ApiError> {
    debug!(email = %form.email, "register command");

    let user = register(&session.state().users, &form, session.now())?;
    info!(user_id = %user.id, "Account created");

    let view = SessionView {
        user: Some(AccountView::from(&user)),
    };
    session.dispatch(Action::AddUser(user.clone()));
    session.dispatch(Action::SetCurrentUser(Some(user)));
    session.save().await?;
    Ok(view)
}

/// Signs out. The stored session becomes `null`, which also keeps demo
/// auto-login from signing the administrator back in.
pub async fn logout(session: &mut Session) -> Result<SessionView, ApiError> {
    debug!("logout command");
    session.dispatch(Action::SetCurrentUser(None));
    session.save().await?;
    Ok(SessionView { user: None })
}

pub fn whoami(session: &Session) -> SessionView {
    SessionView {
        user: session.state().current_user.as_ref().map(AccountView::from),
    }
}

impl Render for SessionView {
    fn render(&self, _config: &ConfigState) -> String {
        match &self.user {
            None => "Not signed in".to_string(),
            Some(user) => {
                let mut out = format!("Signed in as {} <{}>", user.name, user.email);
                if user.is_admin {
                    out.push_str(" (admin)");
                }
                if !user.phone.is_empty() {
                    let _ = write!(out, "\nPhone: {}", user.phone);
                }
                if !user.address.is_empty() {
                    let _ = write!(out, "\nAddress: {}", user.address);
                }
                out
            }
        }
    }
}
