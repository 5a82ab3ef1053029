/// What the plugin scanner reports about one installed plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPlugin {
    /// File name, as found in the data directory
    pub name: String,
    /// Whether the plugin's header carries the master flag
    pub is_master: bool,
    /// Plugins declared as masters in the header, in header order
    pub masters: Vec<String>,
    /// Version string read from the plugin description, if any
    pub version: Option<String>,
    /// CRC32 of the file, if the scanner computed it
    pub crc: Option<u32>,
}

impl InstalledPlugin {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_master: false,
            masters: Vec::new(),
            version: None,
            crc: None,
        }
    }

    /// Create a plugin carrying the master flag
    pub fn master(name: &str) -> Self {
        Self {
            is_master: true,
            ..Self::new(name)
        }
    }

    pub fn with_masters(mut self, masters: &[&str]) -> Self {
        self.masters = masters.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn with_crc(mut self, crc: u32) -> Self {
        self.crc = Some(crc);
        self
    }
}
