//! Flat export of team documents.
//!
//! Each (team, member) pair becomes one row carrying the team name, the
//! member name, the five team-level values and the five member-level values.
//! Rows render as CSV with RFC 4180 quoting.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::milestone::{Milestone, MilestoneProgress};
use crate::team::TeamDocument;

/// Header of the team name column.
pub const TEAM_HEADER: &str = "Team";

/// Header of the member name column.
pub const MEMBER_HEADER: &str = "Member";

/// Header of the tech lead column in aggregated exports.
pub const TECH_LEAD_HEADER: &str = "Tech Lead";

/// One flattened (team, member) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRow<'a> {
    /// Team name.
    pub team: &'a str,
    /// Member name.
    pub member: &'a str,
    /// The team's own progress.
    pub team_progress: &'a MilestoneProgress,
    /// This member's progress.
    pub member_progress: &'a MilestoneProgress,
}

impl<'a> ExportRow<'a> {
    /// The ten milestone values: five team-level then five member-level.
    pub fn values(&self) -> impl Iterator<Item = &'a str> {
        let team = self.team_progress;
        let member = self.member_progress;
        Milestone::ALL
            .into_iter()
            .map(move |m| team.get(m))
            .chain(Milestone::ALL.into_iter().map(move |m| member.get(m)))
    }
}

/// Flatten a document, teams and members in sorted name order.
pub fn rows(document: &TeamDocument) -> impl Iterator<Item = ExportRow<'_>> {
    document.iter().flat_map(|(team_name, team)| {
        team.members.iter().map(move |(member, progress)| ExportRow {
            team: team_name,
            member,
            team_progress: &team.team_progress,
            member_progress: progress,
        })
    })
}

/// Column headers for an export.
#[must_use]
pub fn headers(with_tech_lead: bool) -> Vec<String> {
    let mut headers = Vec::with_capacity(13);
    if with_tech_lead {
        headers.push(TECH_LEAD_HEADER.to_string());
    }
    headers.push(TEAM_HEADER.to_string());
    headers.push(MEMBER_HEADER.to_string());
    headers.extend(Milestone::ALL.iter().map(|m| format!("{} (Team)", m.label())));
    headers.extend(
        Milestone::ALL
            .iter()
            .map(|m| format!("{} (Member)", m.label())),
    );
    headers
}

/// Render one tech lead's document as CSV.
#[must_use]
pub fn to_csv(document: &TeamDocument) -> String {
    let mut out = String::new();
    write_record(&mut out, headers(false).iter().map(String::as_str));
    for row in document.export_rows() {
        let fields = [row.team, row.member].into_iter().chain(row.values());
        write_record(&mut out, fields);
    }
    out
}

/// Render several tech leads' documents as one CSV with a tech lead column.
#[must_use]
pub fn to_csv_aggregated(documents: &[(String, TeamDocument)]) -> String {
    let mut out = String::new();
    write_record(&mut out, headers(true).iter().map(String::as_str));
    for (tech_lead, document) in documents {
        for row in document.export_rows() {
            let fields = [tech_lead.as_str(), row.team, row.member]
                .into_iter()
                .chain(row.values());
            write_record(&mut out, fields);
        }
    }
    out
}

/// File name stem used for aggregated exports.
pub const AGGREGATE_STEM: &str = "all_tech_leads";

/// Default download file name, e.g. `Jane_Doe_teams_20240115_093000.csv`.
#[must_use]
pub fn file_name(stem: &str, at: Option<DateTime<Local>>) -> String {
    match at {
        Some(at) => format!("{stem}_teams_{}.csv", at.format("%Y%m%d_%H%M%S")),
        None => format!("{stem}_teams.csv"),
    }
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::team::NewTeam;
    use chrono::TimeZone;

    fn five(prefix: &str) -> Vec<String> {
        (1..=5).map(|i| format!("{prefix}{i}")).collect()
    }

    fn two_team_document() -> TeamDocument {
        let mut doc = TeamDocument::new();
        let mut alpha_progress = MilestoneProgress::default();
        alpha_progress.set(Milestone::Ideation, "alpha idea");
        doc.create_team(NewTeam::new("Alpha", five("a")).with_progress(alpha_progress))
            .unwrap();
        doc.create_team(NewTeam::new("Beta", five("b"))).unwrap();

        let mut member = MilestoneProgress::default();
        member.set(Milestone::Vision, "b2 vision");
        doc.update_member_progress("Beta", "b2", member).unwrap();
        doc
    }

    #[test]
    fn test_two_teams_yield_ten_rows() {
        let doc = two_team_document();
        let rows: Vec<ExportRow<'_>> = doc.export_rows().collect();
        assert_eq!(rows.len(), 10);

        assert_eq!(rows[0].team, "Alpha");
        assert_eq!(rows[0].member, "a1");
        assert_eq!(rows[9].team, "Beta");
        assert_eq!(rows[9].member, "b5");
    }

    #[test]
    fn test_row_values() {
        let doc = two_team_document();
        let row = doc
            .export_rows()
            .find(|r| r.team == "Beta" && r.member == "b2")
            .unwrap();
        let values: Vec<&str> = row.values().collect();

        assert_eq!(values.len(), 10);
        assert!(values[..5].iter().all(|v| v.is_empty()));
        assert_eq!(values[9], "b2 vision");

        let alpha_row = doc.export_rows().next().unwrap();
        assert_eq!(alpha_row.values().next(), Some("alpha idea"));
    }

    #[test]
    fn test_rows_are_restartable() {
        let doc = two_team_document();
        assert_eq!(doc.export_rows().count(), doc.export_rows().count());
    }

    #[test]
    fn test_empty_document_has_no_rows() {
        assert_eq!(TeamDocument::new().export_rows().count(), 0);
    }

    #[test]
    fn test_headers() {
        let headers = headers(false);
        assert_eq!(headers.len(), 12);
        assert_eq!(headers[0], "Team");
        assert_eq!(headers[1], "Member");
        assert_eq!(headers[2], "Phase 0: Ideation & Mission (Team)");
        assert_eq!(headers[11], "Post-Internship Vision (Member)");

        let aggregated = super::headers(true);
        assert_eq!(aggregated[0], "Tech Lead");
        assert_eq!(aggregated.len(), 13);
    }

    #[test]
    fn test_to_csv_line_count() {
        let csv = to_csv(&two_team_document());
        assert_eq!(csv.lines().count(), 11);
        assert!(csv.starts_with("Team,Member,Phase 0: Ideation & Mission (Team),"));
    }

    #[test]
    fn test_csv_quoting() {
        let mut out = String::new();
        push_field(&mut out, "plain");
        out.push('|');
        push_field(&mut out, "a, b");
        out.push('|');
        push_field(&mut out, "say \"hi\"");
        out.push('|');
        push_field(&mut out, "two\nlines");
        assert_eq!(out, "plain|\"a, b\"|\"say \"\"hi\"\"\"|\"two\nlines\"");
    }

    #[test]
    fn test_to_csv_aggregated() {
        let docs = vec![
            ("Jane Doe".to_string(), two_team_document()),
            ("Sam Roe".to_string(), TeamDocument::new()),
        ];
        let csv = to_csv_aggregated(&docs);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 11);
        assert!(lines[1].starts_with("Jane Doe,Alpha,a1,alpha idea,"));
    }

    #[test]
    fn test_file_name() {
        let session = Session::new("Jane Doe").unwrap();
        let at = Local.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();

        assert_eq!(
            file_name(&session.file_stem(), Some(at)),
            "Jane_Doe_teams_20240115_093000.csv"
        );
        assert_eq!(file_name(&session.file_stem(), None), "Jane_Doe_teams.csv");
        assert_eq!(file_name(AGGREGATE_STEM, None), "all_tech_leads_teams.csv");
    }
}
