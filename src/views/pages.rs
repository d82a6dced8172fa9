use crate::common::flash::Flash;
use crate::include_res;
use crate::models::sessions::Identity;
use crate::models::users::Role;
use crate::views::{escape, layout};

pub fn index(identity: Option<&Identity>, flashes: &[Flash], unread_count: i64) -> String {
    let greeting = match identity {
        Some(identity) => format!(
            r#"<p>Hello {}, you have <a href="/messages/">{unread_count} unread messages</a>.</p>"#,
            escape(&identity.full_name)
        ),
        None => r#"<p><a href="/auth/login">Login</a> or <a href="/auth/register">create an account</a>.</p>"#.to_owned(),
    };
    let body = include_res!(str, "/pages/index.html").replace("{greeting}", &greeting);
    layout("Home", identity, flashes, &body)
}

pub fn dashboard(identity: &Identity, flashes: &[Flash], unread_count: i64) -> String {
    let heading = match identity.role {
        Role::Student => "Student dashboard",
        Role::Instructor => "Instructor dashboard",
        Role::Admin => "Administrator dashboard",
    };
    let body = include_res!(str, "/pages/dashboard.html")
        .replace("{heading}", heading)
        .replace("{full_name}", &escape(&identity.full_name))
        .replace("{unread_count}", &unread_count.to_string());
    layout("Dashboard", Some(identity), flashes, &body)
}
