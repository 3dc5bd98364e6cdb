//! Relative path resolution and pattern combination.

use crate::segment::{segmentize, strip_slashes};

fn add_query(pathname: String, query: Option<&str>) -> String {
	match query {
		Some(query) if !query.is_empty() => format!("{pathname}?{query}"),
		_ => pathname,
	}
}

/// Resolves `to` against `base`.
///
/// - An absolute `to` (leading `/`) is returned unchanged.
/// - A query-only `to` (`?a=b`) is appended to the base pathname.
/// - A `to` whose first segment does not start with `.` is appended to the
///   base segments.
/// - Otherwise `.` and `..` segments are folded over the concatenated base
///   and target segments.
///
/// A query string on `to` is reattached to the resolved pathname; a query on
/// `base` is dropped.
///
/// ```
/// use sentier_urls::resolve;
///
/// assert_eq!(resolve("/about", "/blog"), "/about");
/// assert_eq!(resolve("posts", "/blog"), "/blog/posts");
/// assert_eq!(resolve("../about?tab=1", "/blog/posts"), "/blog/about?tab=1");
/// ```
pub fn resolve(to: &str, base: &str) -> String {
	if to.starts_with('/') {
		return to.to_string();
	}

	let (to_pathname, to_query) = match to.split_once('?') {
		Some((pathname, query)) => (pathname, Some(query)),
		None => (to, None),
	};
	let base_pathname = base.split('?').next().unwrap_or_default();

	let to_segments = segmentize(to_pathname);
	let base_segments = segmentize(base_pathname);

	let first = to_segments.first().copied().unwrap_or_default();
	if first.is_empty() {
		return add_query(base_pathname.to_string(), to_query);
	}

	if !first.starts_with('.') {
		let joined = base_segments
			.iter()
			.chain(to_segments.iter())
			.copied()
			.collect::<Vec<_>>()
			.join("/");
		let prefix = if base_pathname == "/" { "" } else { "/" };
		return add_query(format!("{prefix}{joined}"), to_query);
	}

	let mut segments: Vec<&str> = Vec::new();
	for segment in base_segments.into_iter().chain(to_segments) {
		match segment {
			".." => {
				segments.pop();
			}
			"." => {}
			other => segments.push(other),
		}
	}
	add_query(format!("/{}", segments.join("/")), to_query)
}

/// Combines a base pattern with a route fragment.
///
/// The result has no leading slash and exactly one trailing slash. A
/// fragment of `/` yields the base itself.
///
/// ```
/// use sentier_urls::combine_paths;
///
/// assert_eq!(combine_paths("/", "blog/*"), "blog/*/");
/// assert_eq!(combine_paths("/blog/", "/:slug"), "blog/:slug/");
/// assert_eq!(combine_paths("/blog", "/"), "blog/");
/// ```
pub fn combine_paths(base: &str, path: &str) -> String {
	let combined = if path == "/" {
		base.to_string()
	} else {
		format!("{}/{}", strip_slashes(base), strip_slashes(path))
	};
	format!("{}/", strip_slashes(&combined))
}

/// Returns `true` if `path` begins with `prefix`.
pub fn starts_with(path: &str, prefix: &str) -> bool {
	path.starts_with(prefix)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/absolute", "/a/b", "/absolute")]
	#[case("?q=1", "/a/b", "/a/b?q=1")]
	#[case("?q=1", "/a/b?old=1", "/a/b?q=1")]
	#[case("", "/a/b", "/a/b")]
	#[case("foo", "/a/b", "/a/b/foo")]
	#[case("foo", "/", "/foo")]
	#[case("foo?x=y", "/a", "/a/foo?x=y")]
	#[case("..", "/a/b", "/a")]
	#[case("../c", "/a/b", "/a/c")]
	#[case("./c", "/a/b", "/a/b/c")]
	#[case("../../..", "/a/b", "/")]
	#[case("intro", "/", "/intro")]
	fn test_resolve(#[case] to: &str, #[case] base: &str, #[case] expected: &str) {
		assert_eq!(resolve(to, base), expected);
	}

	#[rstest]
	fn test_resolve_parent_of_appended_is_base() {
		let child = resolve("foo", "/a/b");
		assert_eq!(resolve("..", &child), "/a/b");
	}

	#[rstest]
	#[case("/", "/", "/")]
	#[case("/", "", "/")]
	#[case("/", "intro", "intro/")]
	#[case("blog/", "*", "blog/*/")]
	#[case("/blog", ":slug/", "blog/:slug/")]
	#[case("/app/", "/", "app/")]
	fn test_combine_paths(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
		assert_eq!(combine_paths(base, path), expected);
	}
}
