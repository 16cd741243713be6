use axum::{
    extract::{FromRequestParts, Request},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const VISITOR_COOKIE: &str = "cv_visitor";

// One year
const VISITOR_COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// Identifies one browser. Each visitor gets its own controller and storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitorId(String);

impl VisitorId {
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        VisitorId(hex::encode(bytes))
    }

    /// Accepts only ids this server could have issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == 64
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| VisitorId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix for log lines.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

fn visitor_from_headers(headers: &HeaderMap) -> Option<VisitorId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == VISITOR_COOKIE)
        .and_then(|(_, value)| VisitorId::parse(value))
}

/// Attaches a [`VisitorId`] to every request, issuing a cookie for new
/// visitors.
pub async fn assign_visitor(mut request: Request, next: Next) -> Response {
    let (visitor, fresh) = match visitor_from_headers(request.headers()) {
        Some(visitor) => (visitor, false),
        None => (VisitorId::generate(), true),
    };
    request.extensions_mut().insert(visitor.clone());

    let mut response = next.run(request).await;

    if fresh {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            VISITOR_COOKIE,
            visitor.as_str(),
            VISITOR_COOKIE_MAX_AGE
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
                tracing::debug!("Issued visitor cookie {}", visitor.short());
            }
            Err(e) => tracing::error!("Invalid visitor cookie header: {}", e),
        }
    }
    response
}

// Axum extractor for the visitor attached by `assign_visitor`
impl<S: Send + Sync> FromRequestParts<S> for VisitorId {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<VisitorId>().cloned().ok_or_else(|| {
            (StatusCode::INTERNAL_SERVER_ERROR, "Missing visitor").into_response()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_parse() {
        let visitor = VisitorId::generate();
        assert_eq!(VisitorId::parse(visitor.as_str()), Some(visitor.clone()));
        assert_eq!(visitor.short().len(), 8);
    }

    #[test]
    fn test_parse_rejects_foreign_values() {
        assert!(VisitorId::parse("").is_none());
        assert!(VisitorId::parse("../../etc/passwd").is_none());
        assert!(VisitorId::parse(&"A".repeat(64)).is_none());
        assert!(VisitorId::parse(&"a".repeat(63)).is_none());
    }

    #[test]
    fn test_visitor_from_cookie_header() {
        let visitor = VisitorId::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", VISITOR_COOKIE, visitor.as_str()))
                .unwrap(),
        );
        assert_eq!(visitor_from_headers(&headers), Some(visitor));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("cv_visitor=forged"));
        assert!(visitor_from_headers(&headers).is_none());
    }
}
