// web-server/src/middleware/mod.rs
use actix_web::HttpRequest;

pub mod cors;
pub mod rate_limiter;

pub use cors::cors;
pub use rate_limiter::RateLimiter;

/// Address of the caller. Forwarding headers are client-controlled, so they
/// are only consulted when the deployment says a proxy sets them.
pub fn client_addr(req: &HttpRequest, trust_forwarded: bool) -> Option<String> {
    if trust_forwarded {
        req.connection_info().realip_remote_addr().map(str::to_string)
    } else {
        req.peer_addr().map(|addr| addr.ip().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn forwarded_request() -> HttpRequest {
        TestRequest::default()
            .peer_addr("10.0.0.7:40000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "1.2.3.4"))
            .to_http_request()
    }

    #[test]
    fn test_forwarded_header_ignored_by_default() {
        assert_eq!(client_addr(&forwarded_request(), false).as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn test_forwarded_header_used_when_trusted() {
        assert_eq!(client_addr(&forwarded_request(), true).as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn test_no_peer_no_address() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(client_addr(&req, false), None);
    }
}
