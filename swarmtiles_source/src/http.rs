use crate::SourceError;
use anyhow::{Result, anyhow, bail};
use futures::lock::Mutex;
use regex::{Regex, RegexBuilder};
use reqwest::{Client, Method, Request, StatusCode, Url};
use std::fmt::Debug;
use std::sync::LazyLock;
use std::time::Duration;
use swarmtiles_core::{Blob, ByteRange};
use tokio::time::sleep;

const MAX_RETRIES: u32 = 3;

fn is_retryable_error(err: &reqwest::Error) -> bool {
	err.is_connect() || err.is_timeout() || err.is_body()
}

/// A byte-range source over an HTTP(S) endpoint with `Range` support.
///
/// Requests carry a `Range: bytes=<start>-<end>` header and demand a
/// `206 Partial Content` response whose `Content-Range` matches the request
/// exactly. Connect, timeout and body errors are retried with exponential
/// backoff.
pub struct HttpRangeSource {
	client: Mutex<Option<Client>>,
	name: String,
	url: Url,
}

impl HttpRangeSource {
	/// Builds a source for `identifier`, which must be an `http` or `https`
	/// URL.
	pub fn new(identifier: &str) -> Result<HttpRangeSource> {
		let url = Url::parse(identifier)
			.map_err(|err| SourceError::SourceUnavailable(format!("invalid URL '{identifier}': {err}")))?;
		match url.scheme() {
			"http" | "https" => (),
			other => bail!("unsupported URL scheme '{other}' in '{url}', expected 'http' or 'https'"),
		}

		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.connection_verbose(true)
			.use_rustls_tls()
			.build()
			.map_err(|err| SourceError::SourceUnavailable(format!("cannot build HTTP client: {err}")))?;

		Ok(HttpRangeSource {
			client: Mutex::new(Some(client)),
			name: identifier.to_string(),
			url,
		})
	}

	pub async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let client = {
			let guard = self.client.lock().await;
			match guard.as_ref() {
				Some(client) => client.clone(),
				None => return Err(SourceError::SourceClosed(self.name.clone()).into()),
			}
		};

		let request_range: String = format!("bytes={}-{}", range.offset, range.offset + range.length - 1);

		for attempt in 0..=MAX_RETRIES {
			if attempt > 0 {
				let backoff = Duration::from_secs(1 << (attempt - 1));
				log::warn!(
					"retry attempt {attempt}/{MAX_RETRIES} reading range {range} from '{}', waiting {backoff:?}",
					self.url
				);
				sleep(backoff).await;
			}

			let mut request = Request::new(Method::GET, self.url.clone());
			request.headers_mut().append("range", request_range.parse()?);

			let response = match client.execute(request).await {
				Ok(r) => r,
				Err(e) if is_retryable_error(&e) && attempt < MAX_RETRIES => {
					log::warn!("retryable error: {e}");
					continue;
				}
				Err(e) => return Err(e.into()),
			};

			if response.status() != StatusCode::PARTIAL_CONTENT {
				bail!(
					"expected HTTP 206 (Partial Content) for {range} from '{}', got {}",
					self.url,
					response.status()
				);
			}

			let content_range = response
				.headers()
				.get("content-range")
				.ok_or_else(|| anyhow!("response from '{}' is missing Content-Range header", self.url))?
				.to_str()?;

			static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
				RegexBuilder::new(r"^bytes (\d+)-(\d+)/\d+$")
					.case_insensitive(true)
					.build()
					.unwrap()
			});

			let caps = RE_RANGE.captures(content_range).ok_or_else(|| {
				anyhow!("unexpected Content-Range format: '{content_range}', expected 'bytes <start>-<end>/<total>'")
			})?;
			let content_range_start: u64 = caps[1].parse()?;
			let content_range_end: u64 = caps[2].parse()?;

			if content_range_start != range.offset {
				bail!(
					"Content-Range start mismatch: expected {}, got {content_range_start}",
					range.offset
				);
			}

			let expected_end = range.offset + range.length - 1;
			if content_range_end != expected_end {
				bail!("Content-Range end mismatch: expected {expected_end}, got {content_range_end}");
			}

			let bytes = match response.bytes().await {
				Ok(b) => b,
				Err(e) if is_retryable_error(&e) && attempt < MAX_RETRIES => {
					log::warn!("retryable error reading response body: {e}");
					continue;
				}
				Err(e) => return Err(e.into()),
			};

			if bytes.len() as u64 != range.length {
				bail!(
					"response body length mismatch for {range} from '{}': got {} bytes",
					self.url,
					bytes.len()
				);
			}

			return Ok(Blob::from(&*bytes));
		}

		bail!("request for {range} from '{}' failed after {MAX_RETRIES} retries", self.url)
	}

	pub fn key(&self) -> &str {
		&self.name
	}

	/// Drops the HTTP client. Later reads fail with
	/// [`SourceError::SourceClosed`].
	pub async fn close(&self) {
		self.client.lock().await.take();
	}
}

impl Debug for HttpRangeSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpRangeSource")
			.field("name", &self.name)
			.finish()
	}
}
