//! Grid encoding and camera constants

/// Symbols used by grid codes, index = digit value
pub const CODE_ALPHABET: &[u8; 20] = b"23456789CFGHJMPQRVWX";

/// Radix of the grid encoding
pub const ENCODING_BASE: u32 = 20;

/// Separator placed after the eighth digit position
pub const SEPARATOR: char = '+';

/// Digit position of the separator
pub const SEPARATOR_POSITION: usize = 8;

/// Padding symbol for codes shorter than the separator position
pub const PADDING_CHARACTER: char = '0';

/// Longest code produced by pair encoding (five lat/lon pairs)
pub const MAX_CODE_LENGTH: usize = 10;

/// Code length used for the on-screen overlay
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Maximum latitude magnitude (degrees)
pub const LATITUDE_MAX: f64 = 90.0;

/// Maximum longitude magnitude (degrees)
pub const LONGITUDE_MAX: f64 = 180.0;

/// Number of finest-resolution cells per degree at full pair precision (20^5 / 400)
pub const PAIR_PRECISION: i64 = 8000;

/// Camera eye distance (meters)
pub const CAMERA_DISTANCE_M: f64 = 3000.0;

/// Camera pitch (degrees)
pub const CAMERA_PITCH_DEG: f64 = 60.0;

/// Heading held while the camera flies in (degrees)
pub const APPROACH_HEADING_DEG: f64 = 120.0;

/// Heading the camera levels out to (degrees)
pub const SETTLE_HEADING_DEG: f64 = 0.0;

/// Approach animation duration (milliseconds)
pub const APPROACH_DURATION_MS: u64 = 1800;

/// Settle animation duration (milliseconds)
pub const SETTLE_DURATION_MS: u64 = 800;
