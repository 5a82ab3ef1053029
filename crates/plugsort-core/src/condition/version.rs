use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a `version(...)` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl Comparator {
    /// Applies the comparator to `actual` (the installed version) and `given`.
    ///
    /// A missing installed version satisfies only `!=`, `<` and `<=`.
    pub fn evaluate(self, actual: Option<&Version>, given: &Version) -> bool {
        let Some(actual) = actual else {
            return matches!(
                self,
                Comparator::NotEqual | Comparator::LessThan | Comparator::LessThanOrEqual
            );
        };

        let ordering = actual.compare(given);
        match self {
            Comparator::Equal => ordering == Ordering::Equal,
            Comparator::NotEqual => ordering != Ordering::Equal,
            Comparator::LessThan => ordering == Ordering::Less,
            Comparator::GreaterThan => ordering == Ordering::Greater,
            Comparator::LessThanOrEqual => ordering != Ordering::Greater,
            Comparator::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Comparator::Equal),
            "!=" => Ok(Comparator::NotEqual),
            "<" => Ok(Comparator::LessThan),
            ">" => Ok(Comparator::GreaterThan),
            "<=" => Ok(Comparator::LessThanOrEqual),
            ">=" => Ok(Comparator::GreaterThanOrEqual),
            other => Err(format!("unknown comparator '{}'", other)),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::GreaterThan => ">",
            Comparator::LessThanOrEqual => "<=",
            Comparator::GreaterThanOrEqual => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// One dot- or dash-separated piece of a non-semver version string.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    Number(u64),
    Text(String),
}

impl Component {
    fn compare(&self, other: &Component) -> Ordering {
        match (self, other) {
            (Component::Number(a), Component::Number(b)) => a.cmp(b),
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            (Component::Number(_), Component::Text(_)) => Ordering::Less,
            (Component::Text(_), Component::Number(_)) => Ordering::Greater,
        }
    }
}

/// A version string as found in plugin descriptions and conditions.
///
/// Versions that are valid semantic versions (after padding `1` or `1.2` to
/// three components) compare with `semver` rules. Anything else, such as
/// `1.2.3.4` or `1.0a`, compares component by component, numeric parts
/// numerically and missing trailing parts as zero.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    semver: Option<semver::Version>,
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let stripped = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        Self {
            raw: trimmed.to_string(),
            semver: parse_padded_semver(stripped),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn compare(&self, other: &Version) -> Ordering {
        if let (Some(a), Some(b)) = (&self.semver, &other.semver) {
            return a.cmp(b);
        }

        let a = components(&self.raw);
        let b = components(&other.raw);
        let zero = Component::Number(0);
        for i in 0..a.len().max(b.len()) {
            let left = a.get(i).unwrap_or(&zero);
            let right = b.get(i).unwrap_or(&zero);
            match left.compare(right) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn parse_padded_semver(version: &str) -> Option<semver::Version> {
    // Only pad the numeric core; pre-release and build suffixes stay attached.
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);
    let padded = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => version.to_string(),
    };
    semver::Version::parse(&padded).ok()
}

fn components(version: &str) -> Vec<Component> {
    let stripped = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);
    stripped
        .split(['.', '-', '+', ',', ' '])
        .filter(|part| !part.is_empty())
        .flat_map(split_alphanumeric)
        .collect()
}

/// Splits `10a` into `10` and `a`, so `1.0a` sorts after `1.0` and before `1.1`.
fn split_alphanumeric(part: &str) -> Vec<Component> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = None;

    for ch in part.chars() {
        let is_digit = ch.is_ascii_digit();
        if current_is_digit.is_some_and(|d| d != is_digit) {
            pieces.push(make_component(&current));
            current.clear();
        }
        current_is_digit = Some(is_digit);
        current.push(ch);
    }
    if !current.is_empty() {
        pieces.push(make_component(&current));
    }
    pieces
}

fn make_component(piece: &str) -> Component {
    piece
        .parse::<u64>()
        .map(Component::Number)
        .unwrap_or_else(|_| Component::Text(piece.to_lowercase()))
}
