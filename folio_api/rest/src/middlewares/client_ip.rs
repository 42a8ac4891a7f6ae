use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    Router,
};
use tracing::{debug, error, warn};

use crate::RestServerRealIpConfig;

pub fn add<S: Clone + Send + Sync + 'static>(
    real_ip_config: Option<Arc<RestServerRealIpConfig>>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |mut request: Request, next: Next| {
            let client_ip = ClientIp::from_request(&request, real_ip_config.as_deref());
            request.extensions_mut().insert(client_ip);
            next.run(request)
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    fn from_request(request: &Request, real_ip_config: Option<&RestServerRealIpConfig>) -> Self {
        let Some(client_ip) = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
        else {
            warn!("peer address not available");
            return Self(Ipv4Addr::UNSPECIFIED.into());
        };

        let Some(RestServerRealIpConfig { header, set_from }) = real_ip_config else {
            return Self(client_ip);
        };

        let header_value = request.headers().get(header);

        if *set_from != client_ip {
            if let Some(header_value) = header_value {
                debug!(%client_ip, ?header_value, "ignoring real ip header from untrusted peer");
            }
            return Self(client_ip);
        }

        let Some(header_value) = header_value else {
            warn!(%client_ip, "real ip header not found");
            return Self(client_ip);
        };

        match header_value.to_str().ok().and_then(|x| x.parse().ok()) {
            Some(real_ip) => Self(real_ip),
            None => {
                error!(%client_ip, ?header_value, "failed to parse real ip header");
                Self(client_ip)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request(peer: &str, real_ip: Option<&str>) -> Request {
        let mut request = axum::http::Request::builder();
        if let Some(real_ip) = real_ip {
            request = request.header("X-Real-Ip", real_ip);
        }
        let mut request = request.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        request
    }

    fn config() -> RestServerRealIpConfig {
        RestServerRealIpConfig {
            header: "X-Real-Ip".into(),
            set_from: "10.0.0.1".parse().unwrap(),
        }
    }

    #[test]
    fn peer_address_without_config() {
        let request = request("192.0.2.7:4711", Some("198.51.100.1"));
        let result = ClientIp::from_request(&request, None);
        assert_eq!(result, ClientIp("192.0.2.7".parse().unwrap()));
    }

    #[test]
    fn header_from_trusted_proxy() {
        let request = request("10.0.0.1:4711", Some("198.51.100.1"));
        let result = ClientIp::from_request(&request, Some(&config()));
        assert_eq!(result, ClientIp("198.51.100.1".parse().unwrap()));
    }

    #[test]
    fn header_from_untrusted_peer() {
        let request = request("192.0.2.7:4711", Some("198.51.100.1"));
        let result = ClientIp::from_request(&request, Some(&config()));
        assert_eq!(result, ClientIp("192.0.2.7".parse().unwrap()));
    }

    #[test]
    fn invalid_header() {
        let request = request("10.0.0.1:4711", Some("not an ip"));
        let result = ClientIp::from_request(&request, Some(&config()));
        assert_eq!(result, ClientIp("10.0.0.1".parse().unwrap()));
    }
}
