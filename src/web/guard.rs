//! Access policy for proxy targets: public http(s) hosts only.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use super::error::WebError;

/// Validate the raw `u` parameter into a fetchable URL.
pub fn check_target(raw: Option<&str>) -> Result<Url, WebError> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(WebError::BadRequest("missing u"))?;
    let url = Url::parse(raw).map_err(|_| WebError::BadRequest("invalid url"))?;
    if !is_allowed(&url) {
        let host = url.host_str().unwrap_or_default().to_string();
        tracing::info!(host = %host, scheme = url.scheme(), "Refusing proxy target");
        return Err(WebError::Blocked(host));
    }
    Ok(url)
}

pub fn is_allowed(url: &Url) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain != "localhost" && !domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => is_public_v4(ip),
        Some(Host::Ipv6(ip)) => is_public_v6(ip),
        None => false,
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast())
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_v4(v4);
    }
    let first = ip.segments()[0];
    let unique_local = first & 0xfe00 == 0xfc00;
    let link_local = first & 0xffc0 == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
}
