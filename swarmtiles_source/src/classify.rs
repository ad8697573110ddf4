/// The source kind an identifier string selects.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceKind {
	File,
	Http,
	Torrent,
}

impl SourceKind {
	/// Classifies a source identifier.
	///
	/// Magnet URIs select [`SourceKind::Torrent`], HTTP(S) URLs select
	/// [`SourceKind::Http`], and anything else is treated as a local
	/// filesystem path. Classification is pure string inspection; nothing
	/// is opened or resolved here.
	pub fn classify(identifier: &str) -> SourceKind {
		if is_magnet_uri(identifier) {
			SourceKind::Torrent
		} else if identifier.starts_with("http://") || identifier.starts_with("https://") {
			SourceKind::Http
		} else {
			SourceKind::File
		}
	}
}

/// Checks an identifier against the magnet grammar
/// `magnet:?xt=urn:btih:<hash>(&<key>=<value>)*` where the hash and keys are
/// alphanumeric and values additionally allow `% . : / _ -`.
pub fn is_magnet_uri(identifier: &str) -> bool {
	let rest = match identifier.strip_prefix("magnet:?xt=urn:btih:") {
		Some(rest) => rest,
		None => return false,
	};
	let mut parts = rest.split('&');
	let hash = parts.next().unwrap_or("");
	if hash.is_empty() || !hash.bytes().all(|b| b.is_ascii_alphanumeric()) {
		return false;
	}
	parts.all(is_magnet_parameter)
}

fn is_magnet_parameter(parameter: &str) -> bool {
	match parameter.split_once('=') {
		Some((key, value)) => {
			!key.is_empty()
				&& key.bytes().all(|b| b.is_ascii_alphanumeric())
				&& !value.is_empty()
				&& value.bytes().all(is_magnet_value_byte)
		}
		None => false,
	}
}

fn is_magnet_value_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || matches!(byte, b'%' | b'.' | b':' | b'/' | b'_' | b'-')
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("magnet:?xt=urn:btih:a94a8fe5ccb19ba61c4c0873d391e987982fbbd3", SourceKind::Torrent)]
	#[case("magnet:?xt=urn:btih:ABC123&dn=scenery.pmtiles&tr=http://tracker.example.org:6969/announce", SourceKind::Torrent)]
	#[case("https://tiles.example.org/planet.pmtiles", SourceKind::Http)]
	#[case("http://localhost:8080/tiles", SourceKind::Http)]
	#[case("/var/tiles/planet.pmtiles", SourceKind::File)]
	#[case("tiles/relative.pmtiles", SourceKind::File)]
	#[case("C:\\tiles\\planet.pmtiles", SourceKind::File)]
	fn classification(#[case] identifier: &str, #[case] expected: SourceKind) {
		assert_eq!(SourceKind::classify(identifier), expected);
	}

	#[rstest]
	// missing hash
	#[case("magnet:?xt=urn:btih:")]
	// hash with invalid characters
	#[case("magnet:?xt=urn:btih:abc-def")]
	// trailing ampersand
	#[case("magnet:?xt=urn:btih:abc123&")]
	// parameter without value
	#[case("magnet:?xt=urn:btih:abc123&dn")]
	// parameter with empty value
	#[case("magnet:?xt=urn:btih:abc123&dn=")]
	// value with forbidden character
	#[case("magnet:?xt=urn:btih:abc123&tr=http://x?y=z")]
	// different urn type
	#[case("magnet:?xt=urn:sha1:abc123")]
	// scheme is case sensitive
	#[case("MAGNET:?xt=urn:btih:abc123")]
	fn rejected_magnets_fall_back_to_file(#[case] identifier: &str) {
		assert!(!is_magnet_uri(identifier));
		assert_eq!(SourceKind::classify(identifier), SourceKind::File);
	}

	#[test]
	fn classification_is_pure() {
		// same input, same answer, call after call
		for _ in 0..3 {
			assert_eq!(
				SourceKind::classify("magnet:?xt=urn:btih:deadbeef"),
				SourceKind::Torrent
			);
		}
	}
}
