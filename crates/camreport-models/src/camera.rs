//! Camera identifiers.

use serde::{Deserialize, Serialize};

/// Stable VMS identifier for a camera's video source.
///
/// The camera-list endpoint reports access points as
/// `hosts/SERVER/DeviceIpint.N/SourceEndpoint.video:0:0` while the media
/// endpoints expect the same path without the `hosts/` prefix. The prefix
/// is stripped on construction so the id is always in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoSourceId(String);

impl VideoSourceId {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.strip_prefix("hosts/") {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoSourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A camera as presented to the user: video source id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRef {
    /// Video source id used in media URLs.
    pub id: VideoSourceId,
    /// Human-readable display name.
    pub name: String,
}

impl CameraRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: VideoSourceId::new(id),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosts_prefix_is_stripped() {
        let id = VideoSourceId::new("hosts/SERVER1/DeviceIpint.3/SourceEndpoint.video:0:0");
        assert_eq!(id.as_str(), "SERVER1/DeviceIpint.3/SourceEndpoint.video:0:0");
    }

    #[test]
    fn test_bare_id_unchanged() {
        let id = VideoSourceId::new("SERVER1/DeviceIpint.3/SourceEndpoint.video:0:0");
        assert_eq!(id.as_str(), "SERVER1/DeviceIpint.3/SourceEndpoint.video:0:0");
    }
}
