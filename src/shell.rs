//! Admin shell: navigation, current route and the forced-logout path.
//! The shell owns the toast queue and the session; page-level API errors
//! funnel through `handle_api_error` so a 401 anywhere drops the session.

use anyhow::Result;

use crate::api::is_unauthorized;
use crate::auth::AuthSession;
use crate::notify::{NoticeKind, Notifier, ToastQueue};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
    /// Restricted entries only show for admin and manager roles.
    pub admin_only: bool,
}

pub const NAV: [NavEntry; 6] = [
    NavEntry { label: "Dashboard", path: "/", admin_only: false },
    NavEntry { label: "Agents", path: "/agents", admin_only: false },
    NavEntry { label: "Jobs", path: "/jobs", admin_only: false },
    NavEntry { label: "Approvals", path: "/approvals", admin_only: false },
    NavEntry { label: "Users", path: "/users", admin_only: true },
    NavEntry { label: "Settings", path: "/settings", admin_only: false },
];

pub struct AdminShell {
    session: AuthSession,
    toasts: Arc<ToastQueue>,
    route: String,
}

impl AdminShell {
    pub fn new(session: AuthSession, toasts: Arc<ToastQueue>) -> Self {
        Self {
            session,
            toasts,
            route: "/".to_string(),
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AuthSession {
        &mut self.session
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Navigate, bouncing unauthenticated visitors to the login route.
    pub fn navigate(&mut self, path: &str) {
        if !self.session.is_authenticated() && path != "/login" {
            self.route = "/login".to_string();
            return;
        }
        self.route = path.to_string();
    }

    /// The nav entries visible to the current user. Restricted entries
    /// show for admins and managers only.
    pub fn visible_nav(&self) -> Vec<NavEntry> {
        NAV.iter()
            .filter(|entry| {
                !entry.admin_only
                    || self.session.has_role("admin")
                    || self.session.has_role("manager")
            })
            .copied()
            .collect()
    }

    /// Central API-error handler: a 401 forces a logout and a redirect to
    /// the login route; anything else becomes a toast.
    pub fn handle_api_error(&mut self, err: &anyhow::Error) -> Result<()> {
        if is_unauthorized(err) {
            self.session.logout()?;
            self.route = "/login".to_string();
            self.toasts
                .notify(NoticeKind::Warning, "Session expired, please sign in again");
        } else {
            self.toasts.notify(NoticeKind::Error, &err.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Unauthorized;
    use crate::auth::User;
    use crate::store::{LocalStore, KEY_TOKEN, KEY_USER};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::Utc;

    fn live_token() -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\"}");
        let payload = URL_SAFE_NO_PAD.encode(format!(
            "{{\"sub\":\"1\",\"exp\":{}}}",
            Utc::now().timestamp() + 3600
        ));
        format!("{}.{}.sig", header, payload)
    }

    fn shell_with_role(role: &str) -> AdminShell {
        let store = LocalStore::open_in_memory().unwrap();
        let mut session = AuthSession::new(store);
        session.store_mut().set(KEY_TOKEN, &live_token()).unwrap();
        session
            .store_mut()
            .set_json(
                KEY_USER,
                &User {
                    id: 1,
                    email: "u@example.com".to_string(),
                    full_name: String::new(),
                    role: role.to_string(),
                    is_active: true,
                },
            )
            .unwrap();
        AdminShell::new(session, Arc::new(ToastQueue::new()))
    }

    #[test]
    fn viewer_nav_hides_users() {
        let shell = shell_with_role("viewer");
        let nav = shell.visible_nav();
        assert!(nav.iter().all(|e| e.path != "/users"));
        assert_eq!(nav.len(), 5);
    }

    #[test]
    fn manager_and_admin_see_users() {
        assert_eq!(shell_with_role("manager").visible_nav().len(), 6);
        assert_eq!(shell_with_role("admin").visible_nav().len(), 6);
    }

    #[test]
    fn unauthenticated_navigation_redirects_to_login() {
        let store = LocalStore::open_in_memory().unwrap();
        let mut shell = AdminShell::new(AuthSession::new(store), Arc::new(ToastQueue::new()));
        shell.navigate("/jobs");
        assert_eq!(shell.route(), "/login");
    }

    #[test]
    fn unauthorized_error_forces_logout() {
        let mut shell = shell_with_role("admin");
        shell.navigate("/jobs");
        assert_eq!(shell.route(), "/jobs");
        shell
            .handle_api_error(&anyhow::Error::new(Unauthorized))
            .unwrap();
        assert_eq!(shell.route(), "/login");
        assert!(!shell.session().is_authenticated());
    }

    #[test]
    fn other_errors_become_toasts() {
        let mut shell = shell_with_role("admin");
        shell.handle_api_error(&anyhow::anyhow!("timeout")).unwrap();
        assert!(shell.session().is_authenticated());
    }
}
