//! Merges raw meeting rows into one display record per
//! (group, subject, year level, block) partition.
//!
//! Every choice made here (days, time ranges, primary room, primary
//! instructor) depends only on the partition's contents, never on the order
//! the rows were fetched in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveTime;
use thiserror::Error;
use tracing::warn;

use super::day_order::{combine_days, sort_days_in_weekly_order};
use crate::models::calendar::{TIME_FORMAT, parse_time};
use crate::models::{Block, ConsolidatedRecord, EntryDetail, MeetingDetail, Room, YearLevel};

pub const NOT_AVAILABLE: &str = "N/A";
pub const ROOM_TBA: &str = "TBA";

const RANGE_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot render time {0:?}")]
pub struct RenderError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PartitionKey<'a> {
    group_id: &'a str,
    subject_code: &'a str,
    year_level: YearLevel,
    block: Block,
}

impl<'a> PartitionKey<'a> {
    fn of(entry: &'a EntryDetail) -> Self {
        Self {
            group_id: &entry.entry.group_id,
            subject_code: &entry.entry.subject_code,
            year_level: entry.entry.year_level,
            block: entry.entry.block,
        }
    }
}

/// Consolidates entries into records ordered by partition key.
pub fn consolidate(entries: &[EntryDetail]) -> Vec<ConsolidatedRecord> {
    let mut partitions: BTreeMap<PartitionKey<'_>, Vec<&EntryDetail>> = BTreeMap::new();
    for entry in entries {
        partitions.entry(PartitionKey::of(entry)).or_default().push(entry);
    }

    partitions
        .into_values()
        .map(|members| consolidate_partition(&members))
        .collect()
}

fn consolidate_partition(members: &[&EntryDetail]) -> ConsolidatedRecord {
    // Entry-level fields come from the lowest entry id.
    let Some(lead) = members.iter().min_by(|a, b| a.entry.id.cmp(&b.entry.id)) else {
        unreachable!("partitions are created non-empty");
    };
    let meetings: Vec<&MeetingDetail> = members.iter().flat_map(|e| e.meetings.iter()).collect();

    let days = combine_days(&sort_days_in_weekly_order(
        meetings.iter().map(|m| m.meeting.day),
    ));

    let (start_time, end_time) = match interval_bounds(&meetings) {
        Some((start, end)) => (
            start.format(TIME_FORMAT).to_string(),
            end.format(TIME_FORMAT).to_string(),
        ),
        None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    };

    let room = primary_room(&meetings);

    ConsolidatedRecord {
        subject_code: lead.entry.subject_code.clone(),
        subject_description: lead.entry.subject_description.clone(),
        instructor_name: primary_instructor(members, &meetings),
        year_level: lead.entry.year_level,
        block: lead.entry.block,
        days,
        start_time,
        end_time,
        time_range: time_range(&meetings),
        room_name: room.map_or_else(|| ROOM_TBA.to_string(), |r| r.room_name.clone()),
        is_lab: room.is_some_and(|r| r.is_lab),
        units: lead.entry.units,
        department: lead.entry.department.clone(),
    }
}

/// Earliest start and latest end. `None` when there are no meetings or any
/// stored time is not a clock time.
fn interval_bounds(meetings: &[&MeetingDetail]) -> Option<(NaiveTime, NaiveTime)> {
    let times = meetings
        .iter()
        .map(|m| Some((parse_time(&m.meeting.start_time)?, parse_time(&m.meeting.end_time)?)))
        .collect::<Option<Vec<_>>>()?;

    let start = times.iter().map(|(start, _)| *start).min()?;
    let end = times.iter().map(|(_, end)| *end).max()?;
    Some((start, end))
}

/// Renders each distinct (start, end) pair, in chronological order of the
/// pairs, joined with `" / "`.
fn time_range(meetings: &[&MeetingDetail]) -> String {
    let pairs: BTreeSet<(&str, &str)> = meetings
        .iter()
        .map(|m| (m.meeting.start_time.as_str(), m.meeting.end_time.as_str()))
        .collect();

    if pairs.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    pairs
        .into_iter()
        .map(|(start, end)| {
            format_range(start, end).unwrap_or_else(|err| {
                warn!("{}; rendering as {}", err, NOT_AVAILABLE);
                NOT_AVAILABLE.to_string()
            })
        })
        .collect::<Vec<_>>()
        .join(RANGE_SEPARATOR)
}

/// `"08:00:00", "09:30:00"` becomes `"8:00 AM–9:30 AM"`.
pub fn format_range(start: &str, end: &str) -> Result<String, RenderError> {
    Ok(format!("{}–{}", format_clock(start)?, format_clock(end)?))
}

fn format_clock(raw: &str) -> Result<String, RenderError> {
    parse_time(raw)
        .map(|t| t.format("%-I:%M %p").to_string())
        .ok_or_else(|| RenderError(raw.to_string()))
}

/// Room with the most meetings; ties go to the smallest room id.
fn primary_room<'a>(meetings: &[&'a MeetingDetail]) -> Option<&'a Room> {
    let rooms: BTreeMap<&'a str, &'a Room> = meetings
        .iter()
        .copied()
        .filter_map(|m| m.room.as_ref())
        .map(|room| (room.id.as_str(), room))
        .collect();

    let id = most_frequent(
        meetings
            .iter()
            .copied()
            .filter_map(|m| m.room.as_ref())
            .map(|r| r.id.as_str()),
    )?;
    rooms.get(id).copied()
}

fn primary_instructor(members: &[&EntryDetail], meetings: &[&MeetingDetail]) -> String {
    let from_meetings = most_frequent(
        meetings
            .iter()
            .filter_map(|m| m.instructor.as_ref())
            .map(|i| i.name.as_str()),
    );

    from_meetings
        .or_else(|| {
            most_frequent(
                members
                    .iter()
                    .filter_map(|e| e.legacy_instructor.as_ref())
                    .map(|i| i.name.as_str()),
            )
        })
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Most frequent item; among equally frequent items the smallest wins.
fn most_frequent<K, I>(items: I) -> Option<K>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }

    let mut best: Option<(K, usize)> = None;
    for (key, count) in counts {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}
