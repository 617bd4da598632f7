//! Board definition handling
//!
//! Parses the Arduino `boards.txt` file that describes hardware targets.
//!
//! Each line has the form `board.property=value`, e.g.
//! `uno.build.mcu=atmega328p`. The first dotted component is the board's
//! short name and the rest is the property name.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Arduino versions from this one onwards keep AVR hardware under `avr/`
pub const AVR_SUBDIR_VERSION: u32 = 150;

/// Property holding the display name
pub const PROP_NAME: &str = "name";
/// Property holding the pin layout variant
pub const PROP_VARIANT: &str = "build.variant";
/// Property holding the MCU name
pub const PROP_MCU: &str = "build.mcu";
/// Property holding the CPU frequency
pub const PROP_F_CPU: &str = "build.f_cpu";

/// Hardware directory for an Arduino installation
pub fn hardware_dir(arduino_root: &Path, arduino_ver: u32) -> PathBuf {
    let hardware = arduino_root.join("hardware").join("arduino");
    if arduino_ver < AVR_SUBDIR_VERSION {
        hardware
    } else {
        hardware.join("avr")
    }
}

/// Location of `boards.txt` for an Arduino installation
pub fn boards_path(arduino_root: &Path, arduino_ver: u32) -> PathBuf {
    hardware_dir(arduino_root, arduino_ver).join("boards.txt")
}

/// One board from `boards.txt`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardInfo {
    /// Short name, e.g. `uno`
    pub id: String,
    /// All properties, keyed without the board prefix
    pub properties: HashMap<String, String>,
}

impl BoardInfo {
    /// Create an empty board
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            properties: HashMap::new(),
        }
    }

    /// Set a property
    #[must_use]
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a property
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Look up a property the build cannot do without
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.property(key).ok_or_else(|| ConfigError::MissingProperty {
            board: self.id.clone(),
            property: key.to_string(),
        })
    }

    /// Display name, falling back to the short name
    pub fn name(&self) -> &str {
        self.property(PROP_NAME).unwrap_or(&self.id)
    }

    /// Pin layout variant (e.g. `standard`)
    pub fn variant(&self) -> Result<&str, ConfigError> {
        self.require(PROP_VARIANT)
    }

    /// C compiler flags for this board
    ///
    /// `-mmcu=<mcu> -DF_CPU=<cpu freq> -DARDUINO=<version>`
    pub fn cflags(&self, arduino_ver: u32) -> Result<String, ConfigError> {
        let mcu = self.require(PROP_MCU)?;
        let f_cpu = self.require(PROP_F_CPU)?;
        Ok(format!("-mmcu={mcu} -DF_CPU={f_cpu} -DARDUINO={arduino_ver}"))
    }
}

/// All boards from a `boards.txt`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boards {
    boards: BTreeMap<String, BoardInfo>,
}

impl Boards {
    /// Parse the contents of `boards.txt`
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut boards: BTreeMap<String, BoardInfo> = BTreeMap::new();

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let malformed = || ConfigError::MalformedBoardLine {
                line: index + 1,
                content: line.to_string(),
            };

            let (key, value) = trimmed.split_once('=').ok_or_else(malformed)?;
            let (board, property) = key.split_once('.').ok_or_else(malformed)?;

            boards
                .entry(board.to_string())
                .or_insert_with(|| BoardInfo::new(board))
                .properties
                .insert(property.to_string(), value.to_string());
        }

        Ok(Self { boards })
    }

    /// Read and parse a `boards.txt` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::BoardsUnreadable {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        Self::parse(&content)
    }

    /// Look up a board by short name
    pub fn get(&self, id: &str) -> Result<&BoardInfo, ConfigError> {
        self.boards.get(id).ok_or_else(|| ConfigError::BoardNotFound {
            name: id.to_string(),
        })
    }

    /// Whether a board exists
    pub fn contains(&self, id: &str) -> bool {
        self.boards.contains_key(id)
    }

    /// Look up a dotted `board.property` key
    pub fn property(&self, dotted: &str) -> Result<&str, ConfigError> {
        let (board, property) =
            dotted
                .split_once('.')
                .ok_or_else(|| ConfigError::MissingProperty {
                    board: dotted.to_string(),
                    property: String::new(),
                })?;
        self.get(board)?.require(property)
    }

    /// Boards sorted case-insensitively by short name
    pub fn sorted(&self) -> Vec<&BoardInfo> {
        let mut boards: Vec<&BoardInfo> = self.boards.values().collect();
        boards.sort_by_key(|b| b.id.to_lowercase());
        boards
    }

    /// Number of boards
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Whether no boards were found
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_BOARDS: &str = "\
# See: http://arduino.cc/en/Main/ArduinoBoards

uno.name=Arduino Uno
uno.upload.protocol=arduino
uno.build.mcu=atmega328p
uno.build.f_cpu=16000000L
uno.build.core=arduino
uno.build.variant=standard

##############################################################

mega.name=Arduino Mega (ATmega1280)
mega.build.mcu=atmega1280
mega.build.f_cpu=16000000L
mega.build.variant=mega

Leonardo.name=Arduino Leonardo
Leonardo.build.mcu=atmega32u4
";

    // ============================================
    // Unit Tests - boards.txt parsing
    // ============================================

    #[test]
    fn test_boards_parse_correctly() {
        let boards = Boards::parse(SAMPLE_BOARDS).expect("Failed to parse boards");

        assert_eq!(boards.len(), 3);
        let uno = boards.get("uno").unwrap();
        assert_eq!(uno.name(), "Arduino Uno");
        assert_eq!(uno.variant().unwrap(), "standard");
        assert_eq!(uno.property("upload.protocol"), Some("arduino"));
    }

    #[test]
    fn test_cflags_format() {
        let boards = Boards::parse(SAMPLE_BOARDS).unwrap();
        let flags = boards.get("uno").unwrap().cflags(105).unwrap();

        assert_eq!(flags, "-mmcu=atmega328p -DF_CPU=16000000L -DARDUINO=105");
    }

    #[test]
    fn test_cflags_missing_property() {
        let boards = Boards::parse(SAMPLE_BOARDS).unwrap();
        let result = boards.get("Leonardo").unwrap().cflags(105);

        assert!(matches!(
            result,
            Err(ConfigError::MissingProperty { ref property, .. }) if property == "build.f_cpu"
        ));
    }

    #[test]
    fn test_unknown_board() {
        let boards = Boards::parse(SAMPLE_BOARDS).unwrap();
        assert!(matches!(
            boards.get("due"),
            Err(ConfigError::BoardNotFound { .. })
        ));
    }

    #[test]
    fn test_dotted_property_lookup() {
        let boards = Boards::parse(SAMPLE_BOARDS).unwrap();
        assert_eq!(boards.property("mega.build.variant").unwrap(), "mega");
        assert!(boards.property("mega").is_err());
    }

    #[test]
    fn test_sorted_ignores_case() {
        let boards = Boards::parse(SAMPLE_BOARDS).unwrap();
        let ids: Vec<&str> = boards.sorted().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["Leonardo", "mega", "uno"]);
    }

    #[test]
    fn test_malformed_line_is_rejected() {
        let result = Boards::parse("uno.name=Arduino Uno\nthis line is broken\n");
        assert!(matches!(
            result,
            Err(ConfigError::MalformedBoardLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_boards_path_depends_on_version() {
        let root = Path::new("/usr/share/arduino");
        assert_eq!(
            boards_path(root, 105),
            PathBuf::from("/usr/share/arduino/hardware/arduino/boards.txt")
        );
        assert_eq!(
            boards_path(root, 160),
            PathBuf::from("/usr/share/arduino/hardware/arduino/avr/boards.txt")
        );
    }

    // ============================================
    // Property-Based Tests
    // ============================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every well-formed line ends up as a property of its board
        #[test]
        fn prop_property_lines_are_preserved(
            board in "[a-zA-Z][a-zA-Z0-9]{0,10}",
            property in "[a-z]{1,8}(\\.[a-z_]{1,8}){0,2}",
            value in "[a-zA-Z0-9()_-]{0,20}",
        ) {
            let content = format!("{board}.{property}={value}\n");
            let boards = Boards::parse(&content).unwrap();

            prop_assert_eq!(boards.get(&board).unwrap().property(&property), Some(value.as_str()));
        }
    }
}
