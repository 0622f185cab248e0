//! Search, age-bucket and sort pipeline over the record list.
//!
//! # Invariants
//! - Stages run in a fixed order: text search, age bucket, sort.
//! - Sorting is stable; ties keep their input order.
//! - The pipeline is pure: same inputs, same output.
//! - `name-asc` uses Unicode collation at root locale, so accents and case
//!   variants sort beside their base letters.

use crate::model::record::Record;
use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fixed age ranges offered by the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    #[default]
    #[serde(rename = "all")]
    All,
    /// `age < 20`
    #[serde(rename = "under20")]
    Under20,
    /// `20 <= age <= 40`
    #[serde(rename = "20to40")]
    From20To40,
    /// `age > 40`
    #[serde(rename = "over40")]
    Over40,
}

impl AgeBucket {
    /// The three disjoint buckets, excluding `All`.
    pub const RANGES: [AgeBucket; 3] = [Self::Under20, Self::From20To40, Self::Over40];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Under20 => "under20",
            Self::From20To40 => "20to40",
            Self::Over40 => "over40",
        }
    }

    pub fn contains(self, age: u32) -> bool {
        match self {
            Self::All => true,
            Self::Under20 => age < 20,
            Self::From20To40 => (20..=40).contains(&age),
            Self::Over40 => age > 40,
        }
    }
}

impl FromStr for AgeBucket {
    type Err = ViewParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(Self::All),
            "under20" => Ok(Self::Under20),
            "20to40" => Ok(Self::From20To40),
            "over40" => Ok(Self::Over40),
            other => Err(ViewParseError::UnknownBucket(other.to_string())),
        }
    }
}

impl Display for AgeBucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "age-asc")]
    AgeAsc,
    #[serde(rename = "age-desc")]
    AgeDesc,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::AgeAsc => "age-asc",
            Self::AgeDesc => "age-desc",
        }
    }

    fn compare(self, collator: &mut Collator, left: &Record, right: &Record) -> Ordering {
        match self {
            Self::NameAsc => compare_names(collator, &left.name, &right.name),
            Self::AgeAsc => left.age.cmp(&right.age),
            Self::AgeDesc => right.age.cmp(&left.age),
        }
    }
}

impl FromStr for SortKey {
    type Err = ViewParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "name-asc" => Ok(Self::NameAsc),
            "age-asc" => Ok(Self::AgeAsc),
            "age-desc" => Ok(Self::AgeDesc),
            other => Err(ViewParseError::UnknownSortKey(other.to_string())),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown bucket or sort token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewParseError {
    UnknownBucket(String),
    UnknownSortKey(String),
}

impl Display for ViewParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBucket(value) => write!(
                f,
                "unknown age bucket `{value}`; expected all|under20|20to40|over40"
            ),
            Self::UnknownSortKey(value) => write!(
                f,
                "unknown sort key `{value}`; expected name-asc|age-asc|age-desc"
            ),
        }
    }
}

impl Error for ViewParseError {}

/// Serializable search, bucket and sort selection.
///
/// The current page is owned by the pager, not by this state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search: String,
    pub bucket: AgeBucket,
    pub sort: SortKey,
}

impl ViewState {
    /// Runs the pipeline with this state's search, bucket and sort.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        apply_view(records, &self.search, self.bucket, self.sort)
    }
}

/// Filters and orders `records` for display.
///
/// `search` is matched as typed, without trimming: only the empty string
/// matches everything.
pub fn apply_view<'a>(
    records: &'a [Record],
    search: &str,
    bucket: AgeBucket,
    sort: SortKey,
) -> Vec<&'a Record> {
    let needle = search.to_lowercase();
    let mut visible = records
        .iter()
        .filter(|record| matches_search(record, &needle))
        .filter(|record| bucket.contains(record.age))
        .collect::<Vec<_>>();
    let mut collator = Collator::default();
    visible.sort_by(|left, right| sort.compare(&mut collator, left, right));
    visible
}

/// Case-insensitive substring match on name, email and address.
///
/// `needle` must already be lowercased; empty matches all.
fn matches_search(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystacks = [
        Some(record.name.as_str()),
        record.email.as_deref(),
        Some(record.address.as_str()),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(needle))
}

// Raw text only decides names the collator treats as identical.
fn compare_names(collator: &mut Collator, left: &str, right: &str) -> Ordering {
    collator
        .collate(left, right)
        .then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::{apply_view, AgeBucket, SortKey, ViewParseError, ViewState};
    use crate::model::record::Record;

    fn record(id: &str, name: &str, age: u32, email: Option<&str>) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            age,
            address: format!("{name} street"),
            email: email.map(str::to_string),
            phone: None,
            created_at: "t".to_string(),
            updated_at: "t".to_string(),
        }
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|record| record.id.clone()).collect()
    }

    #[test]
    fn bucket_edges_are_inclusive_for_middle_range() {
        assert!(AgeBucket::Under20.contains(19));
        assert!(!AgeBucket::Under20.contains(20));
        assert!(AgeBucket::From20To40.contains(20));
        assert!(AgeBucket::From20To40.contains(40));
        assert!(!AgeBucket::Over40.contains(40));
        assert!(AgeBucket::Over40.contains(41));
    }

    #[test]
    fn search_matches_email_case_insensitively() {
        let records = vec![
            record("1", "Ann", 30, Some("ann@Example.com")),
            record("2", "Bob", 30, None),
        ];
        let visible = apply_view(&records, "EXAMPLE", AgeBucket::All, SortKey::NameAsc);
        assert_eq!(ids(&visible), vec!["1"]);
    }

    #[test]
    fn blank_search_is_a_literal_term() {
        let records = vec![
            record("1", "Ann", 30, None),
            Record {
                address: "Elm".to_string(),
                ..record("2", "Bob", 30, None)
            },
        ];
        assert_eq!(ids(&apply_view(&records, "", AgeBucket::All, SortKey::NameAsc)).len(), 2);
        let spaced = apply_view(&records, " ", AgeBucket::All, SortKey::NameAsc);
        assert_eq!(ids(&spaced), vec!["1"]);
    }

    #[test]
    fn search_and_bucket_must_both_pass() {
        let records = vec![
            record("1", "Ann", 15, None),
            record("2", "Anna", 35, None),
            record("3", "Bob", 35, None),
        ];
        let visible = apply_view(&records, "ann", AgeBucket::From20To40, SortKey::NameAsc);
        assert_eq!(ids(&visible), vec!["2"]);
    }

    #[test]
    fn age_sorts_are_stable_for_ties() {
        let records = vec![
            record("a", "Zed", 30, None),
            record("b", "Amy", 20, None),
            record("c", "Kim", 30, None),
        ];
        let asc = apply_view(&records, "", AgeBucket::All, SortKey::AgeAsc);
        assert_eq!(ids(&asc), vec!["b", "a", "c"]);
        let desc = apply_view(&records, "", AgeBucket::All, SortKey::AgeDesc);
        assert_eq!(ids(&desc), vec!["a", "c", "b"]);
    }

    #[test]
    fn name_sort_follows_unicode_collation() {
        let records = vec![
            record("zed", "Zed", 30, None),
            record("elodie", "\u{c9}lodie", 30, None),
            record("adam", "Adam", 30, None),
            record("bob-upper", "Bob", 30, None),
            record("bob-lower", "bob", 30, None),
        ];
        let visible = apply_view(&records, "", AgeBucket::All, SortKey::NameAsc);
        assert_eq!(
            ids(&visible),
            vec!["adam", "bob-lower", "bob-upper", "elodie", "zed"]
        );
    }

    #[test]
    fn tokens_round_trip_and_reject_unknown_values() {
        for bucket in [AgeBucket::All, AgeBucket::Under20, AgeBucket::From20To40, AgeBucket::Over40] {
            assert_eq!(bucket.as_str().parse::<AgeBucket>().unwrap(), bucket);
        }
        assert_eq!(
            "oldest".parse::<SortKey>().unwrap_err(),
            ViewParseError::UnknownSortKey("oldest".to_string())
        );
    }

    #[test]
    fn view_state_serializes_with_wire_tokens() {
        let state = ViewState {
            search: "ann".to_string(),
            bucket: AgeBucket::From20To40,
            sort: SortKey::AgeDesc,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["bucket"], "20to40");
        assert_eq!(json["sort"], "age-desc");
        let decoded: ViewState = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, state);
    }
}
