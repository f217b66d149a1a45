//! Product image reference resolution.

use url::Url;

/// Inline SVG shown when a product has no image.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='400' height='400'%3E%3Crect width='400' height='400' fill='%23f3f4f6'/%3E%3Ctext x='50%25' y='50%25' font-family='Arial' font-size='18' fill='%239ca3af' text-anchor='middle' dominant-baseline='middle'%3ENo Image%3C/text%3E%3C/svg%3E";

/// Origin media files are served from: the API base without its `/api` segment.
pub fn media_base(api_base: &Url) -> String {
    let mut base = api_base.clone();
    base.set_query(None);
    base.set_fragment(None);
    let path = base.path().trim_end_matches('/');
    let path = path.strip_suffix("/api").unwrap_or(path).to_string();
    base.set_path(&path);
    base.as_str().trim_end_matches('/').to_string()
}

/// Turn an image reference from the API into something displayable.
///
/// Absolute and data URLs pass through, root-relative paths are served from
/// [`media_base`], missing references become [`PLACEHOLDER_IMAGE`].
pub fn resolve_image_url(api_base: &Url, reference: Option<&str>) -> String {
    let reference = reference.map(str::trim).unwrap_or_default();
    if reference.is_empty() {
        return PLACEHOLDER_IMAGE.to_string();
    }
    if is_absolute(reference) {
        return reference.to_string();
    }
    if reference.starts_with('/') {
        return format!("{}{}", media_base(api_base), reference);
    }
    reference.to_string()
}

/// Check if a reference can be used as an image source as-is.
pub fn is_absolute(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
}
