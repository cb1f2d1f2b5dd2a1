use std::io::Write;

use chrono::{DateTime, Local, TimeZone};
use claimdesk::{Claim, ClaimList, UserDetails};
use serde::Serialize;

use crate::error::CliError;

/// One claim as printed by `list --json`.
#[derive(Debug, Serialize)]
struct ClaimLine<'a> {
    id: &'a str,
    venue: &'a str,
    description: &'a str,
    submitted_at: Option<String>,
    user_doc_id: &'a str,
}

/// Render a Unix-seconds timestamp in `tz`, or the raw number if out of range.
pub fn format_timestamp_in<Tz: TimeZone>(secs: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(secs, 0) {
        Some(utc) => utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => secs.to_string(),
    }
}

/// Render a Unix-seconds timestamp in local time.
pub fn format_timestamp(secs: i64) -> String {
    format_timestamp_in(secs, &Local)
}

/// Write the claims on screen, one per line.
///
/// TSV columns: id, venue name, description, submitted, user doc id.
pub fn write_claims<W: Write>(
    claims: &[Claim],
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    for claim in claims {
        if json_mode {
            let line = ClaimLine {
                id: &claim.id,
                venue: &claim.venue().name,
                description: &claim.venue().description,
                submitted_at: claim.submitted_at().map(|t| t.to_rfc3339()),
                user_doc_id: &claim.user().user_doc_id,
            };
            serde_json::to_writer(&mut *writer, &line)?;
            writeln!(writer)?;
        } else {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                claim.id,
                tsv_field(&claim.venue().name),
                tsv_field(&claim.venue().description),
                format_timestamp(claim.r.timestamp),
                claim.user().user_doc_id,
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Pagination summary printed after a listing.
pub fn pagination_footer(list: &ClaimList) -> String {
    let more = if list.next_enable() { "+" } else { "" };
    format!(
        "page {}/{}{} ({} shown)",
        list.current_page(),
        list.page_count(),
        more,
        list.claims().len(),
    )
}

/// Write a requester profile as labelled lines or a JSON object.
pub fn write_user<W: Write>(
    details: &UserDetails,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        serde_json::to_writer(&mut *writer, details)?;
        writeln!(writer)?;
    } else {
        for (label, value) in user_fields(details) {
            writeln!(writer, "{label}: {value}")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Labelled profile fields in display order, with `-` for missing values.
pub fn user_fields(details: &UserDetails) -> [(&'static str, &str); 4] {
    fn or_dash(v: &Option<String>) -> &str {
        v.as_deref().unwrap_or("-")
    }
    [
        ("First Name", or_dash(&details.first_name)),
        ("Last Name", or_dash(&details.last_name)),
        ("Email", or_dash(&details.email)),
        ("Phone Number", or_dash(&details.phone)),
    ]
}

/// Keep free text on one TSV cell.
fn tsv_field(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn claim() -> Claim {
        serde_json::from_value(json!({
            "id": "clm_01",
            "r": {
                "venue": {
                    "name": "The Lantern",
                    "description": "Live\tmusic\nvenue",
                    "event_conf_req": 0
                },
                "user": {"user_doc_id": "usr_12"},
                "timestamp": 1_700_000_000
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(format_timestamp_in(1_700_000_000, &Utc), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp_in(i64::MAX, &Utc), i64::MAX.to_string());
    }

    #[test]
    fn test_write_claims_tsv() {
        let mut out = Vec::new();
        write_claims(&[claim()], false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let cols: Vec<&str> = text.trim_end().split('\t').collect();
        assert_eq!(cols.len(), 5);
        assert_eq!(cols[0], "clm_01");
        assert_eq!(cols[1], "The Lantern");
        assert_eq!(cols[2], "Live music venue");
        assert_eq!(cols[4], "usr_12");
    }

    #[test]
    fn test_write_claims_json() {
        let mut out = Vec::new();
        write_claims(&[claim(), claim()], true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(v["id"], "clm_01");
        assert_eq!(v["submitted_at"], "2023-11-14T22:13:20+00:00");
        assert_eq!(v["user_doc_id"], "usr_12");
    }

    #[test]
    fn test_write_user_text() {
        let details = UserDetails {
            first_name: Some("Ann".into()),
            last_name: None,
            email: Some("ann@example.com".into()),
            phone: Some("555-0100".into()),
        };
        let mut out = Vec::new();
        write_user(&details, false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "First Name: Ann\nLast Name: -\nEmail: ann@example.com\nPhone Number: 555-0100\n"
        );
    }

    #[test]
    fn test_footer_before_any_load() {
        let list = ClaimList::new(5);
        assert_eq!(pagination_footer(&list), "page 1/1 (0 shown)");
    }
}
