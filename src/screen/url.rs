use url::Url;

// ============================================================================
// URL utilities
// ============================================================================

/// Path segments that mark a login / auth route.
const AUTH_SEGMENTS: [&str; 14] = [
    "login",
    "log-in",
    "logon",
    "signin",
    "sign-in",
    "sign_in",
    "auth",
    "authenticate",
    "session",
    "sessions",
    "sso",
    "connexion",
    "anmelden",
    "acceso",
];

/// Check if two URLs share the same origin (scheme, host, port).
pub fn is_same_origin(base: &str, candidate: &str) -> bool {
    match (Url::parse(base), Url::parse(candidate)) {
        (Ok(a), Ok(b)) => a.origin().is_tuple() && a.origin() == b.origin(),
        _ => false,
    }
}

/// Path component of a URL, without query or fragment. `/` when empty.
pub fn url_path(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}

/// Resolve an `href` attribute against the page it was found on.
///
/// Returns `None` for hrefs that do not navigate anywhere (`javascript:`,
/// empty, bare `#`) and for hrefs that cannot be resolved.
pub fn resolve_href(page_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href == "#" || href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }

    let resolved = match Url::parse(page_url) {
        Ok(base) => base.join(href),
        Err(_) => Url::parse(href),
    };
    resolved.ok().map(String::from)
}

/// Canonical form of an href for identity: lowercase scheme/host, dot
/// segments removed, no fragment, no trailing slash.
pub fn normalize_href(href: &str) -> String {
    let normalized = match Url::parse(href.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            String::from(parsed)
        }
        Err(_) => href
            .trim()
            .split('#')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    normalized.trim_end_matches('/').to_string()
}

/// Heuristic: does this URL look like a login / auth route?
///
/// Matches whole path segments (`/login`, `/users/sign_in`, `/login.php`)
/// and hash routes (`/#/login`), not substrings like `/authors`.
pub fn looks_like_auth_route(url: &str) -> bool {
    let (path, fragment) = match Url::parse(url) {
        Ok(parsed) => (
            parsed.path().to_string(),
            parsed.fragment().unwrap_or_default().to_string(),
        ),
        Err(_) => (
            url.split(['?', '#']).next().unwrap_or_default().to_string(),
            String::new(),
        ),
    };

    path.split('/')
        .chain(fragment.split(['/', '?']))
        .map(|segment| {
            segment
                .split('.')
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase()
        })
        .any(|segment| AUTH_SEGMENTS.contains(&segment.as_str()))
}
