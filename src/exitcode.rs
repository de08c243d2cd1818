//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination (per-record failures included)
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (unparsable credentials file)
pub const DATAERR: i32 = 65;

/// Cannot open input (credentials file not found)
pub const NOINPUT: i32 = 66;

/// Service unavailable (remote listing failed)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error (incomplete credentials, bad settings)
pub const CONFIG: i32 = 78;
