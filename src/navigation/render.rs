//! HTML fragment for the navigation bar.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::bar::{NavBar, NavItem};
use crate::config::NavigationConfig;

const THEME_TOGGLE: &str = concat!(
    "<button type=\"button\" class=\"mode-toggle\" data-theme-toggle",
    " aria-label=\"Toggle theme\"></button>",
);

/// Render the bar as a `<nav>` fragment.
pub fn render_html(bar: &NavBar, config: &NavigationConfig) -> String {
    let mut html = String::from("<nav class=\"site-nav\">");
    let mut actions = String::new();

    for item in &bar.items {
        match item {
            NavItem::Home => html.push_str(&format!(
                "<a class=\"brand\" href=\"{}\">{}</a>",
                encode_double_quoted_attribute(&config.home_href),
                encode_text(&config.brand)
            )),
            NavItem::Admin => actions.push_str(&format!(
                "<a class=\"button button-outline button-sm\" href=\"{}\">\u{1f527} Admin</a>",
                encode_double_quoted_attribute(&config.admin_href)
            )),
            NavItem::ThemeToggle => actions.push_str(THEME_TOGGLE),
            NavItem::Login => actions.push_str(&format!(
                "<a class=\"button\" href=\"{}\">Login</a>",
                encode_double_quoted_attribute(&config.login_href)
            )),
        }
    }

    html.push_str("<div class=\"nav-actions\">");
    html.push_str(&actions);
    html.push_str("</div></nav>");
    html
}
