use axum_extra::extract::cookie::{Cookie, PrivateCookieJar};

pub const FLASH_COOKIE: &str = "travellist_flash";

/// Queue a one-shot notice for the next rendered page.
pub fn set_flash(jar: PrivateCookieJar, message: impl Into<String>) -> PrivateCookieJar {
    let mut cookie = Cookie::new(FLASH_COOKIE, message.into());
    cookie.set_path("/");
    jar.add(cookie)
}

/// Consume the pending notice, if any.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_string();
            let mut removal = Cookie::from(FLASH_COOKIE);
            removal.set_path("/");
            (jar.remove(removal), Some(message))
        }
        None => (jar, None),
    }
}
