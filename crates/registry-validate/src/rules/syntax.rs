//! Syntax checks shared by the e-mail, URL and base-URL rules.

use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

// Pre-compiled regex patterns
static LOCAL_LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
static DOMAIN_LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
static ABSOLUTE_URL_REGEX: OnceLock<Regex> = OnceLock::new();

const MAX_DOMAIN_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

fn local_label_regex() -> &'static Regex {
    LOCAL_LABEL_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+$").expect("local-part pattern compiles")
    })
}

fn domain_label_regex() -> &'static Regex {
    DOMAIN_LABEL_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?$")
            .expect("domain label pattern compiles")
    })
}

fn absolute_url_regex() -> &'static Regex {
    ABSOLUTE_URL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://\S+$").expect("absolute URL pattern compiles")
    })
}

/// E-mail address check in three layers: a single `@` splitting two
/// non-empty parts, every dot-separated local-part label drawn from the
/// extended character class, and a fully-qualified domain.
pub(crate) fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    local.split('.').all(|label| local_label_regex().is_match(label)) && is_valid_fqdn(domain)
}

/// Fully-qualified domain name: at least two labels, each 1-63 letters,
/// digits or inner hyphens, at most 253 characters, and a top-level label
/// that is not purely numeric.
pub(crate) fn is_valid_fqdn(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.chars().count() > MAX_DOMAIN_LENGTH {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        label.chars().count() <= MAX_LABEL_LENGTH && domain_label_regex().is_match(label)
    });

    let tld_ok = labels
        .last()
        .map(|tld| !tld.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);

    labels_ok && tld_ok
}

/// Absolute URL check.
///
/// After the base form (`scheme://` followed by non-whitespace) the
/// fragment, query and scheme are stripped and the authority is examined.
/// Bracketed IPv6 literals are accepted as they are. Otherwise an optional
/// `user@` prefix and `:port` suffix are split off (the port must be
/// all digits) and the host must be a dotted-quad IPv4 address,
/// `localhost`, or a fully-qualified domain name.
pub(crate) fn is_valid_url(value: &str) -> bool {
    if !absolute_url_regex().is_match(value) {
        return false;
    }

    let Some(authority) = authority(value) else {
        return false;
    };

    if let Some(literal) = authority.strip_prefix('[') {
        return literal.contains(']');
    }

    let host_port = match authority.rsplit_once('@') {
        Some((_, host_port)) => host_port,
        None => authority,
    };

    let host = match host_port.split_once(':') {
        Some((host, port)) => {
            if !port.bytes().all(|b| b.is_ascii_digit()) || port.parse::<u16>().is_err() {
                return false;
            }
            host
        }
        None => host_port,
    };

    host.parse::<Ipv4Addr>().is_ok() || host.eq_ignore_ascii_case("localhost") || is_valid_fqdn(host)
}

/// Lower-cased `scheme://host` of an absolute URL, without user info or port.
pub(crate) fn base_url(value: &str) -> Option<String> {
    let (scheme, _) = value.split_once("://")?;
    let authority = authority(value)?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let host = if host_port.starts_with('[') {
        host_port.split_inclusive(']').next().unwrap_or(host_port)
    } else {
        host_port.split(':').next().unwrap_or(host_port)
    };
    if scheme.is_empty() || host.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, host).to_lowercase())
}

/// The authority part of `value`: fragment, query, scheme and path removed.
fn authority(value: &str) -> Option<&str> {
    let without_fragment = value.split('#').next().unwrap_or(value);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    let (_, rest) = without_query.split_once("://")?;
    Some(rest.split('/').next().unwrap_or(rest))
}
