//! Maven version ordering and version requirements.
//!
//! Ordering follows Maven's `ComparableVersion`: a version is split into
//! numeric and qualifier items at `.`, `-` and digit/letter transitions;
//! `-` (and a transition) opens a nested list. Known qualifiers order as
//! `alpha < beta < milestone < rc < snapshot < "" < sp`, unknown ones sort
//! after `sp` lexically.

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone)]
enum Item {
    /// Decimal digits without leading zeros; `"0"` for zero.
    Int(String),
    /// Normalized qualifier (aliases applied).
    Str(String),
    List(Vec<Item>),
}

const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];
const RELEASE_INDEX: usize = 5;

impl Item {
    fn int(digits: &str) -> Item {
        let trimmed = digits.trim_start_matches('0');
        Item::Int(if trimmed.is_empty() { "0".to_owned() } else { trimmed.to_owned() })
    }

    fn string(text: &str, followed_by_digit: bool) -> Item {
        let text = if followed_by_digit && text.len() == 1 {
            match text {
                "a" => "alpha",
                "b" => "beta",
                "m" => "milestone",
                other => other,
            }
        } else {
            text
        };
        let text = match text {
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(text.to_owned())
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(digits) => digits == "0",
            Item::Str(text) => text.is_empty(),
            Item::List(items) => items.is_empty(),
        }
    }

    /// Compare against an absent item.
    fn cmp_null(&self) -> Ordering {
        match self {
            Item::Int(digits) => {
                if digits == "0" {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            Item::Str(text) => qualifier_rank(text).cmp(&RELEASE_INDEX.to_string()),
            Item::List(items) => items.first().map_or(Ordering::Equal, Item::cmp_null),
        }
    }

    fn cmp_item(&self, other: &Item) -> Ordering {
        match (self, other) {
            (Item::Int(a), Item::Int(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Item::Int(_), _) => Ordering::Greater,
            (Item::Str(_), Item::Int(_)) => Ordering::Less,
            (Item::Str(a), Item::Str(b)) => qualifier_rank(a).cmp(&qualifier_rank(b)),
            (Item::Str(_), Item::List(_)) => Ordering::Less,
            (Item::List(_), Item::Int(_)) => Ordering::Less,
            (Item::List(_), Item::Str(_)) => Ordering::Greater,
            (Item::List(a), Item::List(b)) => cmp_lists(a, b),
        }
    }
}

fn qualifier_rank(text: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == text) {
        Some(index) => index.to_string(),
        None => format!("{}-{text}", QUALIFIERS.len()),
    }
}

fn cmp_lists(a: &[Item], b: &[Item]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let ordering = match (a.get(i), b.get(i)) {
            (Some(a), Some(b)) => a.cmp_item(b),
            (Some(a), None) => a.cmp_null(),
            (None, Some(b)) => b.cmp_null().reverse(),
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Drops trailing null items, looking through nested lists.
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// A version with Maven ordering. Equality is ordering equality, so
/// `1.0 == 1.0.0 == 1-ga`.
#[derive(Debug, Clone)]
pub struct ComparableVersion {
    original: String,
    items: Vec<Item>,
}

impl ComparableVersion {
    pub fn parse(version: &str) -> Self {
        let lower = version.to_ascii_lowercase();
        let chars: Vec<char> = lower.chars().collect();
        let text = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
        let item = |digit: bool, buf: &str| {
            if digit {
                Item::int(buf)
            } else {
                Item::string(buf, false)
            }
        };

        // Every list ends with the next one, so the nesting is a chain:
        // `outer` holds the enclosing lists, `current` the innermost.
        let mut outer: Vec<Vec<Item>> = Vec::new();
        let mut current: Vec<Item> = Vec::new();
        let mut is_digit = false;
        let mut start = 0usize;

        for (i, &c) in chars.iter().enumerate() {
            if c == '.' || c == '-' {
                if i == start {
                    current.push(Item::int("0"));
                } else {
                    current.push(item(is_digit, &text(start, i)));
                }
                start = i + 1;
                if c == '-' {
                    outer.push(std::mem::take(&mut current));
                }
            } else if c.is_ascii_digit() {
                if !is_digit && i > start {
                    if !current.is_empty() {
                        outer.push(std::mem::take(&mut current));
                    }
                    current.push(Item::string(&text(start, i), true));
                    start = i;
                    outer.push(std::mem::take(&mut current));
                }
                is_digit = true;
            } else {
                if is_digit && i > start {
                    current.push(Item::int(&text(start, i)));
                    start = i;
                    outer.push(std::mem::take(&mut current));
                }
                is_digit = false;
            }
        }

        if chars.len() > start {
            if !is_digit && !current.is_empty() {
                outer.push(std::mem::take(&mut current));
            }
            current.push(item(is_digit, &text(start, chars.len())));
        }

        normalize(&mut current);
        let mut items = current;
        while let Some(mut parent) = outer.pop() {
            parent.push(Item::List(items));
            normalize(&mut parent);
            items = parent;
        }

        Self {
            original: version.to_owned(),
            items,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn is_snapshot(&self) -> bool {
        self.original.ends_with("-SNAPSHOT")
    }
}

impl fmt::Display for ComparableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for ComparableVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ComparableVersion {}

impl PartialOrd for ComparableVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComparableVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_lists(&self.items, &other.items)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub lower: Option<ComparableVersion>,
    pub lower_closed: bool,
    pub upper: Option<ComparableVersion>,
    pub upper_closed: bool,
}

impl VersionRange {
    pub fn contains(&self, version: &ComparableVersion) -> bool {
        let lower = self.lower.as_ref().map_or(true, |lower| match lower.cmp(version) {
            Ordering::Equal => self.lower_closed,
            ordering => ordering == Ordering::Less,
        });
        let upper = self.upper.as_ref().map_or(true, |upper| match upper.cmp(version) {
            Ordering::Equal => self.upper_closed,
            ordering => ordering == Ordering::Greater,
        });
        lower && upper
    }
}

/// Any version text that may appear in a POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequirement {
    /// A plain version, e.g. `1.2.3`.
    Soft(String),
    /// One or more ranges; a version matches if any range contains it.
    Ranges(Vec<VersionRange>),
    Latest,
    Release,
}

impl VersionRequirement {
    pub fn parse(requested: &str) -> Self {
        let requested = requested.trim();
        match requested {
            "LATEST" => return VersionRequirement::Latest,
            "RELEASE" => return VersionRequirement::Release,
            _ => {}
        }
        if !(requested.contains('[') || requested.contains('(')) {
            return VersionRequirement::Soft(requested.to_owned());
        }

        // Maven accepts an unclosed range, e.g. `[1.8` in profile activations.
        let mut text = requested.to_owned();
        if !(text.contains(']') || text.contains(')')) {
            text.push(']');
        }
        match parse_ranges(&text) {
            Some(ranges) => VersionRequirement::Ranges(ranges),
            None => {
                tracing::warn!(
                    target: "remold.maven",
                    version = requested,
                    "invalid version range; treating as a plain version"
                );
                VersionRequirement::Soft(requested.to_owned())
            }
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, VersionRequirement::Ranges(_))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, VersionRequirement::Latest | VersionRequirement::Release)
    }

    /// Needs repository metadata to pick a version.
    pub fn needs_metadata(&self) -> bool {
        self.is_range() || self.is_dynamic()
    }

    pub fn soft_version(&self) -> Option<&str> {
        match self {
            VersionRequirement::Soft(version) => Some(version),
            _ => None,
        }
    }

    pub fn matches(&self, version: &ComparableVersion) -> bool {
        match self {
            VersionRequirement::Soft(soft) => ComparableVersion::parse(soft) == *version,
            VersionRequirement::Ranges(ranges) => ranges.iter().any(|r| r.contains(version)),
            VersionRequirement::Latest => true,
            VersionRequirement::Release => !version.is_snapshot(),
        }
    }

    /// The highest of `available` that satisfies the requirement. A soft
    /// requirement selects itself.
    pub fn select<'a>(&self, available: impl IntoIterator<Item = &'a str>) -> Option<String> {
        if let VersionRequirement::Soft(version) = self {
            return Some(version.clone());
        }
        available
            .into_iter()
            .map(ComparableVersion::parse)
            .filter(|version| self.matches(version))
            .max()
            .map(|version| version.original)
    }
}

fn parse_ranges(text: &str) -> Option<Vec<VersionRange>> {
    let mut ranges = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let lower_closed = match rest.as_bytes()[0] {
            b'[' => true,
            b'(' => false,
            _ => return None,
        };
        let close = rest.find([']', ')'])?;
        let upper_closed = rest.as_bytes()[close] == b']';
        let body = &rest[1..close];
        let range = match body.split_once(',') {
            None => {
                let exact = body.trim();
                if exact.is_empty() || !(lower_closed && upper_closed) {
                    return None;
                }
                let version = ComparableVersion::parse(exact);
                VersionRange {
                    lower: Some(version.clone()),
                    lower_closed: true,
                    upper: Some(version),
                    upper_closed: true,
                }
            }
            Some((lower, upper)) => {
                let bound = |text: &str| {
                    let text = text.trim();
                    (!text.is_empty()).then(|| ComparableVersion::parse(text))
                };
                VersionRange {
                    lower: bound(lower),
                    lower_closed,
                    upper: bound(upper),
                    upper_closed,
                }
            }
        };
        ranges.push(range);
        rest = rest[close + 1..].trim_start();
        if let Some(next) = rest.strip_prefix(',') {
            rest = next.trim_start();
        }
    }
    (!ranges.is_empty()).then_some(ranges)
}
