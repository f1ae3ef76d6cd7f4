use serde::Serialize;

/// A place to look for (or put) a native library.
///
/// Declaration order is the default search priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Path recorded in the per-user cache file
    Cache,
    /// `~/.ncbi/lib64` or `~/.ncbi/lib32`
    FilesystemHome,
    /// The platform's own library search path (loaded by bare name)
    LibrarySearchPath,
    /// Directory holding the installed binding artifact
    InstallDir,
    /// Entries of `CLASSPATH`
    Classpath,
    /// Working directory
    Cwd,
    /// Temporary directory
    Temp,
    /// Fetched from the remote library service
    Download,
}

impl Location {
    /// Every location, in default priority order
    pub const ALL: [Location; 8] = [
        Location::Cache,
        Location::FilesystemHome,
        Location::LibrarySearchPath,
        Location::InstallDir,
        Location::Classpath,
        Location::Cwd,
        Location::Temp,
        Location::Download,
    ];

    /// Map a one-letter configuration code to a location.
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(Self::Cache),
            'N' => Some(Self::FilesystemHome),
            'L' => Some(Self::LibrarySearchPath),
            'J' => Some(Self::InstallDir),
            'P' => Some(Self::Classpath),
            'W' => Some(Self::Cwd),
            'T' => Some(Self::Temp),
            'D' => Some(Self::Download),
            _ => None,
        }
    }

    /// Parse a location order string such as `"CNLD"`. Unknown characters are
    /// skipped; returns `None` when nothing valid remains.
    #[must_use]
    pub fn parse_order(codes: &str) -> Option<Vec<Self>> {
        let locations: Vec<Self> = codes.chars().filter_map(Self::from_code).collect();
        if locations.is_empty() {
            None
        } else {
            Some(locations)
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "CACHE"),
            Self::FilesystemHome => write!(f, "NCBI_HOME"),
            Self::LibrarySearchPath => write!(f, "LIBPATH"),
            Self::InstallDir => write!(f, "INSTALL_DIR"),
            Self::Classpath => write!(f, "CLASSPATH"),
            Self::Cwd => write!(f, "CWD"),
            Self::Temp => write!(f, "TMP"),
            Self::Download => write!(f, "DOWNLOAD"),
        }
    }
}

/// Word size of the running process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataModel {
    Bits32,
    Bits64,
}

impl DataModel {
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    /// `"32"` or `"64"`
    #[must_use]
    pub fn bits(self) -> &'static str {
        match self {
            Self::Bits32 => "32",
            Self::Bits64 => "64",
        }
    }
}

impl std::fmt::Display for DataModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priority_order() {
        let mut sorted = Location::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Location::ALL.to_vec());
        assert_eq!(Location::ALL[0], Location::Cache);
        assert_eq!(Location::ALL[7], Location::Download);
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(
            Location::parse_order("DxLc C"),
            Some(vec![
                Location::Download,
                Location::LibrarySearchPath,
                Location::Cache
            ])
        );
        assert_eq!(Location::parse_order("xyz"), None);
        assert_eq!(Location::parse_order(""), None);
    }

    #[test]
    fn test_all_codes_round_trip() {
        let order = Location::parse_order("CNLJPWTD").unwrap();
        assert_eq!(order, Location::ALL.to_vec());
    }

    #[test]
    fn test_data_model_bits() {
        assert_eq!(DataModel::Bits32.bits(), "32");
        assert_eq!(DataModel::Bits64.bits(), "64");
        assert_eq!(
            DataModel::detect().bits(),
            if cfg!(target_pointer_width = "64") { "64" } else { "32" }
        );
    }
}
