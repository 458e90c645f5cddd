// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie helpers for session authentication

use url::form_urlencoded;

/// Extract the `name=value` pair from a `Set-Cookie` header value
///
/// Attributes such as `Path`, `Expires` or `HttpOnly` are dropped; only the
/// segment before the first `;` is kept, which is what gets replayed in the
/// `Cookie` header of later requests.
pub fn session_cookie_value(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    if pair.is_empty() {
        return None;
    }
    Some(pair.to_string())
}

/// Build the form body for `POST /_session`
pub fn form_credentials(username: &str, password: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("name", username)
        .append_pair("password", password)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_attributes_stripped() {
        let header = "AuthSession=YWRtaW46NUE; Version=1; Expires=Wed, 01 Jan 2031 00:00:00 GMT; Max-Age=600; Path=/; HttpOnly";
        assert_eq!(
            session_cookie_value(header).as_deref(),
            Some("AuthSession=YWRtaW46NUE")
        );
    }

    #[test]
    fn test_cookie_without_attributes() {
        assert_eq!(
            session_cookie_value("AuthSession=abc").as_deref(),
            Some("AuthSession=abc")
        );
    }

    #[test]
    fn test_empty_cookie_header() {
        assert_eq!(session_cookie_value(""), None);
        assert_eq!(session_cookie_value("  ; Path=/"), None);
    }

    #[test]
    fn test_credentials_are_encoded() {
        assert_eq!(
            form_credentials("admin", "p@ss w&rd"),
            "name=admin&password=p%40ss+w%26rd"
        );
    }
}
