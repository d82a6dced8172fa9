use crate::common::flash::Flash;
use crate::include_res;
use crate::views::layout;

pub fn login(flashes: &[Flash]) -> String {
    layout("Login", None, flashes, include_res!(str, "/pages/auth/login.html"))
}

pub fn register(flashes: &[Flash]) -> String {
    layout("Register", None, flashes, include_res!(str, "/pages/auth/register.html"))
}

pub fn forgot_password(flashes: &[Flash]) -> String {
    layout(
        "Reset password",
        None,
        flashes,
        include_res!(str, "/pages/auth/forgot_password.html"),
    )
}
