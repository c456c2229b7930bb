use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};

/// Extension key for storing extracted IP address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Middleware to extract client IP address from request
///
/// Without a trusted proxy the socket address is the only source; headers are
/// client-controlled. With `trust_proxy`:
/// 1. Last X-Forwarded-For hop (appended by the proxy itself)
/// 2. X-Real-IP header (for Nginx)
/// 3. ConnectInfo socket address
pub async fn extract_client_ip(trust_proxy: bool, mut request: Request, next: Next) -> Response {
    let socket = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let ip = if trust_proxy {
        proxied_client_ip(request.headers()).or(socket)
    } else {
        socket
    };

    if let Some(ip) = ip {
        request.extensions_mut().insert(ClientIp(ip));
    }

    next.run(request).await
}

fn proxied_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        // Entries left of the proxy's own are whatever the client sent
        forwarded
            .to_str()
            .ok()
            .and_then(|s| s.rsplit(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    } else if let Some(real_ip) = headers.get("x-real-ip") {
        real_ip.to_str().ok().and_then(|s| s.trim().parse().ok())
    } else {
        None
    }
}
