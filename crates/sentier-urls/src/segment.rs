//! Path segmentation and segment classification.

/// Base score every segment contributes.
pub const SEGMENT_POINTS: i32 = 4;
/// Bonus for a literal segment.
pub const STATIC_POINTS: i32 = 3;
/// Bonus for a `:name` segment.
pub const DYNAMIC_POINTS: i32 = 2;
/// Extra penalty applied to a `*` segment on top of cancelling its base score.
pub const SPLAT_PENALTY: i32 = 1;
/// Bonus for the empty root segment.
pub const ROOT_POINTS: i32 = 1;

/// Removes every leading and trailing `/`.
///
/// ```
/// use sentier_urls::strip_slashes;
///
/// assert_eq!(strip_slashes("//blog/posts/"), "blog/posts");
/// assert_eq!(strip_slashes("/"), "");
/// ```
pub fn strip_slashes(path: &str) -> &str {
	path.trim_matches('/')
}

/// Splits a path into its `/`-delimited segments after stripping the outer
/// slashes. The root path yields a single empty segment.
pub fn segmentize(path: &str) -> Vec<&str> {
	strip_slashes(path).split('/').collect()
}

/// A classified pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
	/// The empty segment of the root path.
	Root,
	/// `:name`, captures one pathname segment.
	Dynamic(&'a str),
	/// `*` or `*name`, captures all remaining segments. An unnamed splat
	/// carries the name `*`.
	Splat(&'a str),
	/// Any other literal segment.
	Static(&'a str),
}

impl<'a> Segment<'a> {
	/// Classifies a single segment.
	///
	/// Classification is evaluated in priority order root, dynamic, splat,
	/// static. A dynamic segment needs at least one character after the `:`.
	pub fn classify(segment: &'a str) -> Self {
		if segment.is_empty() {
			return Self::Root;
		}
		match segment.strip_prefix(':') {
			Some(name) if !name.is_empty() => return Self::Dynamic(name),
			_ => {}
		}
		if let Some(name) = segment.strip_prefix('*') {
			return Self::Splat(if name.is_empty() { "*" } else { name });
		}
		Self::Static(segment)
	}

	/// Score this segment contributes to a route's specificity.
	pub fn points(&self) -> i32 {
		match self {
			Self::Root => SEGMENT_POINTS + ROOT_POINTS,
			Self::Dynamic(_) => SEGMENT_POINTS + DYNAMIC_POINTS,
			Self::Splat(_) => SEGMENT_POINTS - (SEGMENT_POINTS + SPLAT_PENALTY),
			Self::Static(_) => SEGMENT_POINTS + STATIC_POINTS,
		}
	}

	pub fn is_splat(&self) -> bool {
		matches!(self, Self::Splat(_))
	}
}
