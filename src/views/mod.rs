use crate::common::flash::Flash;
use crate::models::sessions::Identity;
use chrono::{DateTime, Utc};

pub mod auth;
pub mod messages;
pub mod pages;

#[macro_export]
macro_rules! include_res {
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// Escapes text for HTML bodies and attributes. Braces are escaped too so
/// user text can never be mistaken for a template placeholder.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Wraps a page body with navigation and the pending flash notices.
pub fn layout(title: &str, identity: Option<&Identity>, flashes: &[Flash], body: &str) -> String {
    let nav = match identity {
        Some(identity) => include_res!(str, "/pages/nav_user.html")
            .replace("{full_name}", &escape(&identity.full_name))
            .replace("{role}", identity.role.display_name()),
        None => include_res!(str, "/pages/nav_guest.html").to_owned(),
    };
    let flashes: String = flashes
        .iter()
        .map(|flash| {
            include_res!(str, "/pages/flash.html")
                .replace("{category}", flash.category.as_str())
                .replace("{message}", &escape(&flash.message))
        })
        .collect();

    include_res!(str, "/pages/layout.html")
        .replace("{title}", &escape(title))
        .replace("{nav}", &nav)
        .replace("{flashes}", &flashes)
        .replace("{body}", body)
}
