//! One-shot status messages carried across a redirect in a cookie.
//!
//! The cookie value is a url-form-encoded list of `level=message` pairs. It is
//! written by the POST handler, read once by the next GET, then cleared.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use url::form_urlencoded;

pub const FLASH_COOKIE: &str = "edupredict_flash";

/// Messages longer than this are cut so the cookie stays well under 4 KiB.
const MAX_MESSAGE_CHARS: usize = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        let message: String = message.into();
        let message = if message.chars().count() > MAX_MESSAGE_CHARS {
            let mut cut: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
            cut.push_str("...");
            cut
        } else {
            message
        };
        Self { level, message }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }
}

pub fn encode(flashes: &[Flash]) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for flash in flashes {
        ser.append_pair(flash.level.as_str(), &flash.message);
    }
    ser.finish()
}

/// Unknown levels are dropped.
pub fn decode(value: &str) -> Vec<Flash> {
    form_urlencoded::parse(value.as_bytes())
        .filter_map(|(level, message)| {
            Level::parse(&level).map(|level| Flash {
                level,
                message: message.into_owned(),
            })
        })
        .collect()
}

/// `Set-Cookie` value holding the given messages.
pub fn set_cookie(flashes: &[Flash]) -> String {
    format!(
        "{FLASH_COOKIE}={}; Path=/; Max-Age=60; HttpOnly; SameSite=Lax",
        encode(flashes)
    )
}

/// `Set-Cookie` value that expires the flash cookie.
pub fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Pending messages from the request's `Cookie` headers.
pub fn from_headers(headers: &HeaderMap) -> Vec<Flash> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == FLASH_COOKIE)
        .flat_map(|(_, value)| decode(value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn encode_then_decode_keeps_order_and_text() {
        let flashes = vec![
            Flash::error("An error occurred during prediction. Please try again."),
            Flash::error("Error message: Found unknown categories ['x']; column=0"),
            Flash::info("Use the exact dropdown options & retry"),
        ];
        let encoded = encode(&flashes);
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains(';'));
        assert_eq!(decode(&encoded), flashes);
    }

    #[test]
    fn decode_drops_unknown_levels() {
        let decoded = decode("warning=hmm&success=ok");
        assert_eq!(decoded, vec![Flash::success("ok")]);
    }

    #[test]
    fn long_messages_are_truncated() {
        let flash = Flash::error("x".repeat(5000));
        assert_eq!(flash.message.chars().count(), MAX_MESSAGE_CHARS + 3);
        assert!(flash.message.ends_with("..."));
    }

    #[test]
    fn reads_flash_among_other_cookies() {
        let mut headers = HeaderMap::new();
        let cookie = format!(
            "theme=dark; {FLASH_COOKIE}={}; other=1",
            encode(&[Flash::error("Please enter valid scores")])
        );
        headers.insert(COOKIE, HeaderValue::from_str(&cookie).unwrap());
        assert_eq!(
            from_headers(&headers),
            vec![Flash::error("Please enter valid scores")]
        );
    }

    #[test]
    fn no_cookie_no_flashes() {
        assert!(from_headers(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn cookie_attributes() {
        assert!(set_cookie(&[Flash::info("hi")]).starts_with("edupredict_flash=info=hi; Path=/"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
