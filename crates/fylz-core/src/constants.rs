//! Shared constants for key layout, signed URL lifetimes and response tagging.

/// Separator between the identifier prefix and the filename in a storage key.
pub const KEY_SEPARATOR: char = '/';

/// Filenames beginning with this marker are metadata sidecars, never payloads.
pub const METADATA_MARKER: &str = ".meta.";

/// Shortest lifetime a signed URL may be issued with.
pub const MIN_URL_TTL_MINUTES: i64 = 1;

/// Longest lifetime a signed URL may be issued with.
pub const MAX_URL_TTL_MINUTES: i64 = 30;

/// Lifetime used when the caller asks for none or sends garbage.
pub const DEFAULT_URL_TTL_MINUTES: i64 = 5;

/// Response header identifying which function produced a JSON reply.
pub const REPLY_TAG_HEADER: &str = "x-flyz-fn-reply";

/// Reply tag for ingestion and signed URL responses.
pub const REPLY_TAG_UPLOAD: &str = "upload-handler";

/// Reply tag for listing responses.
pub const REPLY_TAG_LIST: &str = "upload-list";
