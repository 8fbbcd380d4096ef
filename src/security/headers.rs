//! Security headers for HTTP responses

use warp::Reply;

/// Strict Content Security Policy for a JSON-only API
const API_CSP: &str = "default-src 'none'; connect-src 'self'; frame-ancestors 'none';";

/// Wrap a reply with security headers appropriate for the API
pub fn with_api_security_headers<T: Reply>(reply: T) -> impl Reply {
    let reply = warp::reply::with_header(reply, "X-Frame-Options", "DENY");
    let reply = warp::reply::with_header(reply, "X-Content-Type-Options", "nosniff");
    let reply = warp::reply::with_header(reply, "Referrer-Policy", "no-referrer");
    let reply = warp::reply::with_header(reply, "Content-Security-Policy", API_CSP);
    // Token responses must never be cached
    warp::reply::with_header(reply, "Cache-Control", "no-cache, no-store, must-revalidate")
}
