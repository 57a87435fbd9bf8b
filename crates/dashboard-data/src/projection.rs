//! Read-only table projection of the filtered postings.

use dashboard_core::models::{DisplayRow, JobRecord};
use dashboard_core::skills::display_skills;

/// Display rows for the data table, one per record in input order.
///
/// Only the seven table columns are kept and `skills` becomes plain
/// comma-separated text.
pub fn display_rows<'a>(records: impl IntoIterator<Item = &'a JobRecord>) -> Vec<DisplayRow> {
    records.into_iter().map(display_row).collect()
}

fn display_row(r: &JobRecord) -> DisplayRow {
    DisplayRow {
        title: r.title.clone(),
        company: r.company.clone(),
        location: r.location.clone(),
        contract_type: r.contract_type.clone(),
        salary_min: r.salary_min,
        salary_max: r.salary_max,
        skills: display_skills(r.skills.as_deref()),
    }
}
