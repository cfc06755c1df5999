use std::fmt;

use crate::models::{GroupedTimetable, ScheduleGroup};

/// Plain-text view of a grouped timetable, one section per group label.
pub struct TimetableText<'a> {
    pub group: &'a ScheduleGroup,
    pub timetable: &'a GroupedTimetable,
}

impl fmt::Display for TimetableText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = self.group;
        writeln!(
            f,
            "{} {} | {} | {} {}",
            group.school_year,
            group.semester,
            group.department,
            group.education_level,
            group.year_level
        )?;

        if self.timetable.is_empty() {
            return writeln!(f, "\n(no scheduled subjects)");
        }

        for (label, records) in self.timetable {
            writeln!(f, "\n== {} ==", label)?;
            for r in records {
                writeln!(
                    f,
                    "{:<10} {:<32} {:<12} {:<36} {:<14} {:<24} {}{}",
                    r.subject_code,
                    r.subject_description,
                    r.days,
                    r.time_range,
                    r.room_name,
                    r.instructor_name,
                    r.units,
                    if r.is_lab { " (lab)" } else { "" },
                )?;
            }
        }
        Ok(())
    }
}

pub fn render_timetable(group: &ScheduleGroup, timetable: &GroupedTimetable) -> String {
    TimetableText { group, timetable }.to_string()
}
