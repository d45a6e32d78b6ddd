use url::Url;

/// Resolve the post-sign-in destination.
///
/// `from` comes from the query string or form. Relative paths are joined to
/// the site root; anything that lands on a different origin is replaced by
/// the site root itself.
pub fn resolve_callback_url(site_url: &Url, from: Option<&str>, default_callback: &str) -> String {
    let target = from
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_callback);

    match site_url.join(target) {
        Ok(url) if url.origin() == site_url.origin() => url.to_string(),
        Ok(url) => {
            tracing::warn!("Ignoring cross-origin callback target {}", url);
            site_root(site_url)
        }
        Err(_) => site_root(site_url),
    }
}

fn site_root(site_url: &Url) -> String {
    let mut root = site_url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root.to_string()
}
