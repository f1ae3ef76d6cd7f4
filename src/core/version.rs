use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// Pre-release tier of a version. Ordered `Alpha < Beta < Rc < Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Stage {
    Alpha,
    Beta,
    Rc,
    #[default]
    Final,
}

impl Stage {
    fn from_marker(c: char) -> Option<Self> {
        match c {
            'a' => Some(Self::Alpha),
            'b' => Some(Self::Beta),
            'r' => Some(Self::Rc),
            _ => None,
        }
    }
}

/// A library version such as `2.9.1` or `2.10.0-rc1`.
///
/// Field order matters: the derived ordering is lexicographic over
/// `(major, minor, release, stage, revision)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub release: u32,
    pub stage: Stage,
    pub revision: u32,
}

impl Version {
    #[must_use]
    pub const fn new(major: u32, minor: u32, release: u32) -> Self {
        Self {
            major,
            minor,
            release,
            stage: Stage::Final,
            revision: 0,
        }
    }

    /// Parse a version string. Never fails: malformed input degrades to a
    /// partially-zero version.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngs_loader::core::version::{Stage, Version};
    ///
    /// let v = Version::parse("2.3.4-rc1");
    /// assert_eq!((v.major, v.minor, v.release), (2, 3, 4));
    /// assert_eq!(v.stage, Stage::Rc);
    /// assert_eq!(v.revision, 1);
    /// assert_eq!(Version::parse(".5.0"), Version::parse("0.5"));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut components = [0u32; 3];
        let mut current = 0usize;
        let mut acc: u32 = 0;
        let mut stage: Option<Stage> = None;

        for c in text.trim().chars() {
            if let Some(d) = c.to_digit(10) {
                acc = acc.saturating_mul(10).saturating_add(d);
                continue;
            }
            if stage.is_some() {
                // first stage marker wins; everything but digits is ignored after it
                continue;
            }
            if c == '.' || c == '-' {
                if current < components.len() {
                    components[current] = acc;
                }
                current += 1;
                acc = 0;
            } else if let Some(s) = Stage::from_marker(c) {
                if current < components.len() {
                    components[current] = acc;
                }
                current = components.len();
                stage = Some(s);
                acc = 0;
            }
        }

        let mut revision = 0;
        if stage.is_some() {
            revision = acc;
        } else if current < components.len() {
            components[current] = acc;
        }

        Self {
            major: components[0],
            minor: components[1],
            release: components[2],
            stage: stage.unwrap_or_default(),
            revision,
        }
    }

    /// Parse an optional version string; `None` behaves like `""`.
    #[must_use]
    pub fn parse_opt(text: Option<&str>) -> Self {
        Self::parse(text.unwrap_or(""))
    }

    /// Compare against a version that may be unknown. Any version is
    /// greater than an unknown one.
    #[must_use]
    pub fn cmp_opt(&self, other: Option<&Version>) -> Ordering {
        other.map_or(Ordering::Greater, |o| self.cmp(o))
    }

    /// Same major version line
    #[must_use]
    pub fn is_compatible(&self, other: &Version) -> bool {
        self.major == other.major
    }

    /// Compatible with `required` and not older than it
    #[must_use]
    pub fn fits(&self, required: &Version) -> bool {
        self.is_compatible(required) && self >= required
    }

    /// `major.minor.release`, the form persisted in the cache and sent to the server
    #[must_use]
    pub fn to_simple_version(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.release)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.release)?;
        match self.stage {
            Stage::Alpha => write!(f, "-alpha{}", self.revision),
            Stage::Beta => write!(f, "-beta{}", self.revision),
            Stage::Rc => write!(f, "-rc{}", self.revision),
            Stage::Final => Ok(()),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s)
    }

    #[test]
    fn test_parse_plain() {
        let version = v("2.3.4");
        assert_eq!(version, Version::new(2, 3, 4));
        assert_eq!(version.stage, Stage::Final);
    }

    #[test]
    fn test_parse_stages() {
        assert_eq!(v("2.3.4a2").stage, Stage::Alpha);
        assert_eq!(v("2.3.4a2").revision, 2);
        assert_eq!(v("2.3.4-b1").stage, Stage::Beta);
        assert_eq!(v("2.3.4-b1").release, 4);
        assert_eq!(v("2.3.4-rc1").stage, Stage::Rc);
        assert_eq!(v("2.3.4-rc1").revision, 1);
        assert_eq!(v("1.0.0-alpha3").stage, Stage::Alpha);
        assert_eq!(v("1.0.0-beta7").revision, 7);
    }

    #[test]
    fn test_first_stage_wins() {
        let version = v("1.2a3b4");
        assert_eq!(version.stage, Stage::Alpha);
        assert_eq!(version.revision, 34);
    }

    #[test]
    fn test_documented_orderings() {
        assert!(v("1.2.9") < v("1.3"));
        assert!(v("2.3.4a2") < v("2.3.4-b1"));
        assert!(v("2.3.4-rc1") < v("2.3.4"));
        assert_eq!(v("080"), v("80"));
        assert_eq!(v("0.5"), v(".5.0"));
        assert_eq!(Version::parse_opt(None), v(""));
        assert_eq!(v(""), Version::new(0, 0, 0));
    }

    #[test]
    fn test_ordering_is_antisymmetric() {
        let samples = [
            "", "0", "1", "1.0", "1.2.9", "1.3", "2.3.4a2", "2.3.4-b1", "2.3.4-rc1", "2.3.4",
            "2.10", "080", "garbage", "3.0.0-rc",
        ];
        for a in samples {
            for b in samples {
                let ab = v(a).cmp(&v(b));
                let ba = v(b).cmp(&v(a));
                assert_eq!(ab, ba.reverse(), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_malformed_input_degrades() {
        assert_eq!(v("xyz"), Version::new(0, 0, 0));
        // 'a' in "garbage" reads as an alpha marker
        assert_eq!(v("garbage").stage, Stage::Alpha);
        assert_eq!(v("1.2.3.4.5"), Version::new(1, 2, 3));
        assert_eq!(v("  2.9.1\n"), Version::new(2, 9, 1));
    }

    #[test]
    fn test_compatibility_is_major_only() {
        assert!(v("2.3.4").is_compatible(&v("2.9.9")));
        assert!(!v("1.9.9").is_compatible(&v("2.0.0")));
    }

    #[test]
    fn test_fits() {
        let required = v("1.1.0");
        assert!(v("1.1.0").fits(&required));
        assert!(v("1.4").fits(&required));
        assert!(!v("1.0.9").fits(&required));
        assert!(!v("2.0.0").fits(&required));
    }

    #[test]
    fn test_cmp_opt_unknown_is_lower() {
        assert_eq!(v("0").cmp_opt(None), Ordering::Greater);
        assert_eq!(v("1.0").cmp_opt(Some(&v("1.0"))), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        assert_eq!(v("2.3.4").to_string(), "2.3.4");
        assert_eq!(v("2.3.4-rc1").to_string(), "2.3.4-rc1");
        assert_eq!(v("2.3.4-rc1").to_simple_version(), "2.3.4");
        assert_eq!(v(&v("1.0b2").to_string()), v("1.0b2"));
    }
}
