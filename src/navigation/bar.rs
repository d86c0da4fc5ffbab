//! Which controls the navigation bar shows.

use serde::Serialize;

use super::state::{AdminFlag, SessionView};

/// A control in the bar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavItem {
    Home,
    Admin,
    ThemeToggle,
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavBar {
    pub items: Vec<NavItem>,
}

impl NavBar {
    /// Decide the visible controls.
    ///
    /// `path` is `None` when the current route is not known, which never
    /// counts as an auth page.
    pub fn build(
        path: Option<&str>,
        view: &SessionView,
        admin: AdminFlag,
        auth_path_prefixes: &[String],
    ) -> Self {
        let signed_in = view.session.is_some();
        let mut items = vec![NavItem::Home];

        if signed_in && admin.is_confirmed() {
            items.push(NavItem::Admin);
        }
        items.push(NavItem::ThemeToggle);
        if !is_auth_page(path, auth_path_prefixes) && !view.is_pending && !signed_in {
            items.push(NavItem::Login);
        }

        Self { items }
    }

    pub fn shows(&self, item: NavItem) -> bool {
        self.items.contains(&item)
    }
}

/// Login, signup and similar pages, where a login link would point at itself.
pub fn is_auth_page(path: Option<&str>, auth_path_prefixes: &[String]) -> bool {
    path.is_some_and(|p| auth_path_prefixes.iter().any(|prefix| p.starts_with(prefix.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::state::{Session, SessionUser};

    fn prefixes() -> Vec<String> {
        vec!["/login".to_string(), "/signup".to_string()]
    }

    fn session() -> Session {
        Session {
            user: SessionUser {
                id: "u1".into(),
                email: None,
                name: Some("Ada".into()),
            },
        }
    }

    fn build_at(path: &str, view: &SessionView, admin: AdminFlag) -> NavBar {
        NavBar::build(Some(path), view, admin, &prefixes())
    }

    #[test]
    fn test_anonymous_sees_login() {
        let bar = build_at("/dashboard", &SessionView::anonymous(), AdminFlag::Unknown);
        assert!(bar.shows(NavItem::Login));
        assert!(!bar.shows(NavItem::Admin));
        assert_eq!(bar.items, vec![NavItem::Home, NavItem::ThemeToggle, NavItem::Login]);
    }

    #[test]
    fn test_confirmed_admin_sees_admin_link() {
        let bar = build_at("/dashboard", &SessionView::signed_in(session()), AdminFlag::Yes);
        assert_eq!(bar.items, vec![NavItem::Home, NavItem::Admin, NavItem::ThemeToggle]);
    }

    #[test]
    fn test_unknown_admin_flag_hides_admin_link() {
        let bar = build_at("/dashboard", &SessionView::signed_in(session()), AdminFlag::Unknown);
        assert!(!bar.shows(NavItem::Admin));
        assert!(!bar.shows(NavItem::Login));
    }

    #[test]
    fn test_admin_flag_without_session_hides_admin_link() {
        let bar = build_at("/dashboard", &SessionView::anonymous(), AdminFlag::Yes);
        assert!(!bar.shows(NavItem::Admin));
    }

    #[test]
    fn test_pending_session_hides_login() {
        let bar = build_at("/dashboard", &SessionView::pending(), AdminFlag::Unknown);
        assert_eq!(bar.items, vec![NavItem::Home, NavItem::ThemeToggle]);
    }

    #[test]
    fn test_auth_pages_hide_login() {
        for path in ["/login", "/login/verify", "/signup", "/signup?ref=x"] {
            let bar = build_at(path, &SessionView::anonymous(), AdminFlag::No);
            assert!(!bar.shows(NavItem::Login), "login shown on {path}");
        }
    }

    #[test]
    fn test_prefix_match_is_literal() {
        assert!(is_auth_page(Some("/loginhelp"), &prefixes()));
        assert!(!is_auth_page(Some("/account/login"), &prefixes()));
        assert!(!is_auth_page(None, &prefixes()));
    }

    #[test]
    fn test_unknown_path_still_offers_login() {
        let bar = NavBar::build(None, &SessionView::anonymous(), AdminFlag::No, &prefixes());
        assert!(bar.shows(NavItem::Login));
    }

    #[test]
    fn test_home_and_toggle_always_present() {
        let views = [
            SessionView::anonymous(),
            SessionView::pending(),
            SessionView::signed_in(session()),
        ];
        for view in &views {
            for admin in [AdminFlag::Yes, AdminFlag::No, AdminFlag::Unknown] {
                let bar = NavBar::build(Some("/login"), view, admin, &prefixes());
                assert!(bar.shows(NavItem::Home));
                assert!(bar.shows(NavItem::ThemeToggle));
            }
        }
    }
}
