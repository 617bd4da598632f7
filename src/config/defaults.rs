//! Default configuration values

/// Default Arduino installation root
pub const DEFAULT_ARDUINO_ROOT: &str = "/usr/share/arduino";

/// Board variant used when no board is given
pub const DEFAULT_VARIANT: &str = "standard";

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = ".xuino.toml";

/// Build tool used for library and project builds
pub const BUILD_TOOL: &str = "make";

/// Project makefile name
pub const PROJECT_MAKEFILE: &str = "Makefile";
