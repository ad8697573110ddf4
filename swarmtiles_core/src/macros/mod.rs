//! Assertion macros for tests.

/// Asserts that the string representation of an expression matches a wildcard pattern.
///
/// Useful when an expression's output should conform to a pattern rather than
/// an exact string.
///
/// # Example
/// ```
/// use swarmtiles_core::assert_wildcard;
/// let value = "hello_world";
/// assert_wildcard!(value, "hello_*");
/// ```
#[macro_export]
macro_rules! assert_wildcard {
	($expression:expr, $wildcard:expr) => {
		let expression = format!("{}", $expression);
		if !wildmatch::WildMatch::new($wildcard).matches(&expression) {
			panic!(
				"assertion failed: expression \"{expression:?}\" does not match wildcard \"{}\"",
				$wildcard
			)
		}
	};
}
