use thiserror::Error;

/// Typed failures of the archive layer.
///
/// A missing tile inside the declared range is not an error; readers return
/// `Ok(None)` for it. Only coordinates outside the declared range produce
/// [`ArchiveError::OutOfRange`].
#[derive(Debug, Error, PartialEq)]
pub enum ArchiveError {
	#[error("tile {x}/{y} at zoom {z} is outside the archive range (zoom {min_zoom} to {max_zoom})")]
	OutOfRange {
		z: u8,
		x: u32,
		y: u32,
		min_zoom: u8,
		max_zoom: u8,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::anyhow;

	#[test]
	fn message() {
		let error = ArchiveError::OutOfRange {
			z: 15,
			x: 99,
			y: 7,
			min_zoom: 0,
			max_zoom: 14,
		};
		assert_eq!(
			error.to_string(),
			"tile 99/7 at zoom 15 is outside the archive range (zoom 0 to 14)"
		);
	}

	#[test]
	fn downcast_through_anyhow() {
		let error = anyhow!(ArchiveError::OutOfRange {
			z: 2,
			x: 4,
			y: 0,
			min_zoom: 0,
			max_zoom: 1,
		});
		assert!(matches!(
			error.downcast_ref::<ArchiveError>(),
			Some(ArchiveError::OutOfRange { z: 2, .. })
		));
	}
}
