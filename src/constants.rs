/// Defaults for the Houston neighborhood alias job. Everything here can be
/// overridden through `Config`.
pub const DEFAULT_BOUNDARY_URL: &str = "https://api.everyblock.com/gis/houston/neighborhoods/";
pub const DEFAULT_CACHE_PATH: &str = "./neighborhoods/boundaries.geojson";
pub const DEFAULT_OUTPUT_PATH: &str = "./neighborhoods/boundaries-with-aliases.geojson";
pub const DEFAULT_CONFIG_FILE: &str = "aliases.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";

// 311 extracts, scanned in this order
pub const SOURCE_DATA_PATH: &str = "./311-Public-Data-Extract-2015-tab.txt";
pub const SOURCE_DATA_SWM_PATH: &str = "./311-Public-Data-Extract-2015-swm-tab.txt";

/// Env var holding the boundary API token.
pub const TOKEN_ENV_VAR: &str = "EVERYBLOCK_TOKEN";

/// Key the boundary endpoint nests its feature collection under.
pub const RESPONSE_DATA_KEY: &str = "data";

/// Column in the 311 extracts carrying the free-text neighborhood label.
pub const NEIGHBORHOOD_COLUMN: &str = "NEIGHBORHOOD";

/// Read size for source files; once every neighborhood has an alias, rows
/// past the chunk in hand are not looked at.
pub const SOURCE_CHUNK_SIZE: u64 = 64 * 1024;

/// Source value meaning "not recorded".
pub const NOT_AVAILABLE: &str = "NA";

pub fn default_source_paths() -> Vec<String> {
    vec![SOURCE_DATA_PATH.to_string(), SOURCE_DATA_SWM_PATH.to_string()]
}
