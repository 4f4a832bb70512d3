/// Sexagesimal text layout
pub const SEXAGESIMAL_FRACTION_DIGITS: usize = 5;
pub const SEXAGESIMAL_FRACTION_SCALE: u64 = 100_000;
pub const DECODE_DECIMAL_SCALE: f64 = 100_000_000.0;

/// Conversion service endpoints, relative to the configured base URL
pub const SUBMIT_PATH: &str = "convert_csv";
pub const TRIGGER_PATH: &str = "convert_csv.exec";
pub const DOWNLOAD_PATH: &str = "download";

/// Conversion service file names
pub const DEFAULT_INPUT_FILENAME: &str = "latlons.in";
pub const OUTPUT_EXTENSION: &str = "out";

/// Conversion service selector defaults (Tokyo datum to JGD2000, lat/lon in and out)
pub const DEFAULT_DIRECTION: &str = "1";
pub const DEFAULT_MODE: &str = "latlon";
pub const DEFAULT_ZONE: &str = "0";
pub const DEFAULT_ECHO_INPUT: &str = "off";
pub const DEFAULT_RESPONSE_ENCODING: &str = "shift_jis";
pub const DEFAULT_STEP_TIMEOUT_SECS: u64 = 30;

/// Result payload comment marker
pub const COMMENT_MARKER: char = '#';

/// Tokyo datum (Bessel 1841) to JGD2000 (GRS80) three-parameter shift
pub const DEFAULT_LOCAL_PIPELINE: &str =
    "cart ellps=bessel | helmert x=-146.414 y=507.337 z=680.507 | cart inv ellps=GRS80";

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "TRACK_DATUM";

/// GPX creator attribute
pub const GPX_CREATOR: &str = "track-datum";
