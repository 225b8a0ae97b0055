//! HEAD commit info and commit-date validation.
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// `git log` format for [`HeadInfo::parse`]: NUL-separated fields.
pub(super) const HEAD_FORMAT: &str = "--format=%H%x00%h%x00%s%x00%an%x00%ar";

const DATE_OUT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadInfo {
    pub hash: String,
    pub short_hash: String,
    pub subject: String,
    pub author: String,
    /// e.g. "3 hours ago"
    pub relative_date: String,
    /// HEAD is already on the remote tracking branch.
    pub pushed: bool,
}

impl HeadInfo {
    pub(super) fn parse(output: &str) -> Option<Self> {
        let mut parts = output.trim_end_matches('\n').splitn(5, '\0');
        let hash = parts.next()?.trim().to_string();
        let short_hash = parts.next()?.trim().to_string();
        let subject = parts.next()?.to_string();
        let author = parts.next()?.to_string();
        let relative_date = parts.next()?.trim().to_string();
        if hash.is_empty() {
            return None;
        }
        Some(Self {
            hash,
            short_hash,
            subject,
            author,
            relative_date,
            pushed: false,
        })
    }
}

/// Normalise a user-typed commit date to `YYYY-MM-DD HH:MM:SS`.
///
/// Empty input or `now` yields an empty string (commit with the current time).
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, `YYYY/MM/DD` and RFC 3339.
pub fn validate_commit_date(input: &str) -> Result<String, String> {
    let s = input.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("now") {
        return Ok(String::new());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATE_OUT) {
        return Ok(dt.format(DATE_OUT).to_string());
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Some(dt) = NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.format(DATE_OUT).to_string());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.format(DATE_OUT).to_string());
    }

    Err(format!(
        "Invalid date format: {s} (use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_now_mean_current_time() {
        assert_eq!(validate_commit_date(""), Ok(String::new()));
        assert_eq!(validate_commit_date("   "), Ok(String::new()));
        assert_eq!(validate_commit_date("NOW"), Ok(String::new()));
    }

    #[test]
    fn test_accepted_formats_normalise() {
        assert_eq!(
            validate_commit_date("2024-03-05 14:15:16").unwrap(),
            "2024-03-05 14:15:16"
        );
        assert_eq!(validate_commit_date("2024-03-05").unwrap(), "2024-03-05 00:00:00");
        assert_eq!(validate_commit_date("2024/03/05").unwrap(), "2024-03-05 00:00:00");
        assert_eq!(
            validate_commit_date("2024-03-05T14:15:16+02:00").unwrap(),
            "2024-03-05 14:15:16"
        );
    }

    #[test]
    fn test_rejects_garbage() {
        let err = validate_commit_date("next tuesday").unwrap_err();
        assert!(err.contains("next tuesday"));
        assert!(validate_commit_date("2024-13-01").is_err());
    }

    #[test]
    fn test_head_info_parse() {
        let out = "abc123def456\0abc123d\0fix: handle empty input\0Ada Lovelace\03 hours ago\n";
        let info = HeadInfo::parse(out).unwrap();
        assert_eq!(info.hash, "abc123def456");
        assert_eq!(info.short_hash, "abc123d");
        assert_eq!(info.subject, "fix: handle empty input");
        assert_eq!(info.author, "Ada Lovelace");
        assert_eq!(info.relative_date, "3 hours ago");
        assert!(!info.pushed);
    }

    #[test]
    fn test_head_info_parse_rejects_short_output() {
        assert!(HeadInfo::parse("abc\0def").is_none());
        assert!(HeadInfo::parse("").is_none());
    }
}
