//! Constants shared across the crate.

/// Label carrying the owning release tool.
pub const OWNER_LABEL: &str = "OWNER";
/// Value of [`OWNER_LABEL`] on records written by Tiller.
pub const OWNER_TILLER: &str = "TILLER";
/// Label carrying the release status.
pub const STATUS_LABEL: &str = "STATUS";
/// Value of [`STATUS_LABEL`] on the live revision of a release.
pub const STATUS_DEPLOYED: &str = "DEPLOYED";
/// Label carrying the release revision number.
pub const VERSION_LABEL: &str = "VERSION";
/// Data key holding the encoded release payload.
pub const RELEASE_DATA_KEY: &str = "release";

/// Label selector matching deployed Tiller releases.
pub const DEPLOYED_SELECTOR: &str = "OWNER=TILLER,STATUS=DEPLOYED";

/// YAML document-boundary marker.
pub const DOCUMENT_MARKER: &str = "---";
