use axum::http::{header, HeaderMap};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "session";

/// Attributes shared by every session cookie this service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub max_age_secs: i64,
    pub secure: bool,
}

impl CookiePolicy {
    /// `Set-Cookie` value establishing a session.
    pub fn session(&self, token: &str) -> String {
        self.build(token, self.max_age_secs)
    }

    /// `Set-Cookie` value that makes the browser drop the session.
    pub fn cleared(&self) -> String {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age: i64) -> String {
        let same_site = if self.secure { "None; Secure" } else { "Lax" };
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite={}",
            SESSION_COOKIE, value, max_age, same_site
        )
    }
}

/// Find a cookie by name across every `Cookie` header of a request.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=abc.def; lang=en"));
        assert_eq!(cookie_value(&headers, "session"), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(cookie_value(&headers, "session"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let lax = CookiePolicy { max_age_secs: 86_400, secure: false };
        assert_eq!(
            lax.session("tok"),
            "session=tok; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax"
        );

        let secure = CookiePolicy { max_age_secs: 60, secure: true };
        assert!(secure.cleared().starts_with("session=; Path=/; Max-Age=0;"));
        assert!(secure.cleared().ends_with("SameSite=None; Secure"));
    }
}
