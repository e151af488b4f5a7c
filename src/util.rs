use reqwest::Url;

use crate::error::{Result, StudioError};

/// Header the ngrok tunnels in front of the sync server and the bridge look at
/// before deciding to serve their interstitial page instead of the request.
pub const NGROK_SKIP_HEADER: &str = "ngrok-skip-browser-warning";

/// Builds `<base>/<seg>/<seg>...`, percent-encoding each segment on its own.
///
/// A segment containing `/` (a VFS path such as `components/Header.tsx`) is
/// encoded as a single segment, so the server receives it as `%2F`.
pub fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base.trim_end_matches('/'))
        .map_err(|e| StudioError::Custom(format!("Invalid server URL {base:?}: {e}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| StudioError::Custom(format!("Server URL cannot be a base: {base}")))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// Milliseconds since the Unix epoch, used as the preview cache-buster.
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
