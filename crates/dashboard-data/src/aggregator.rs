//! Count-based views over a filtered record set: top skills, postings per
//! time bucket and top locations.

use std::collections::{BTreeMap, HashMap};

use dashboard_core::models::{
    FilterMode, JobRecord, LocationCount, SkillCount, TimeBucket, TimeBucketKey,
};
use dashboard_core::skills::parse_skills_field;

/// Length of the skills ranking.
pub const TOP_SKILLS_LIMIT: usize = 20;

/// Length of the location ranking.
pub const TOP_LOCATIONS_LIMIT: usize = 15;

// ── RankedCounter ─────────────────────────────────────────────────────────────

/// Occurrence counter that remembers first-seen order.
///
/// Ranking sorts by descending count with a stable sort, so equal counts keep
/// the order in which their keys were first encountered.
#[derive(Debug, Default)]
struct RankedCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, u64)>,
}

impl RankedCounter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    fn top(mut self, limit: usize) -> Vec<(String, u64)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(limit);
        self.counts
    }
}

// ── JobAggregator ─────────────────────────────────────────────────────────────

/// Stateless helper computing the count views.
pub struct JobAggregator;

impl JobAggregator {
    /// The 20 most frequent skills.
    ///
    /// Every token of every record counts once per occurrence, including
    /// repeats within one record.
    pub fn top_skills<'a>(records: impl IntoIterator<Item = &'a JobRecord>) -> Vec<SkillCount> {
        let mut counter = RankedCounter::default();
        for record in records {
            for skill in parse_skills_field(record.skills.as_deref()) {
                counter.add(&skill);
            }
        }
        counter
            .top(TOP_SKILLS_LIMIT)
            .into_iter()
            .map(|(skill, count)| SkillCount { skill, count })
            .collect()
    }

    /// Postings per day (range mode) or per hour of day (single-day mode).
    ///
    /// Only buckets with at least one posting appear, in chronological order.
    pub fn jobs_over_time<'a>(
        records: impl IntoIterator<Item = &'a JobRecord>,
        mode: FilterMode,
    ) -> Vec<TimeBucket> {
        let key_fn: fn(&JobRecord) -> TimeBucketKey = match mode {
            FilterMode::Range => |r: &JobRecord| TimeBucketKey::Day(r.created_date()),
            FilterMode::Single => |r: &JobRecord| TimeBucketKey::Hour(r.created_hour()),
        };

        let mut map: BTreeMap<TimeBucketKey, u64> = BTreeMap::new();
        for record in records {
            *map.entry(key_fn(record)).or_insert(0) += 1;
        }

        map.into_iter()
            .map(|(key, count)| TimeBucket { key, count })
            .collect()
    }

    /// The 15 locations with the most postings. Null locations are skipped;
    /// names are compared exactly.
    pub fn top_locations<'a>(
        records: impl IntoIterator<Item = &'a JobRecord>,
    ) -> Vec<LocationCount> {
        let mut counter = RankedCounter::default();
        for location in records.into_iter().filter_map(|r| r.location.as_deref()) {
            counter.add(location);
        }
        counter
            .top(TOP_LOCATIONS_LIMIT)
            .into_iter()
            .map(|(location, count)| LocationCount { location, count })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
