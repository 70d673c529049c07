use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::domain::{MonthKey, Transaction};

/// Shown in place of the business name when no profile is set.
pub const UNNAMED_BUSINESS: &str = "Unnamed Business";

/// Shown in place of an empty note.
pub const DEFAULT_NOTE: &str = "Cash";

const SEPARATOR: &str = "--------------------------";

/// Presentation settings for the plain-text report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Prefix for every amount, e.g. "₦" or "$"
    pub currency_symbol: String,
    /// chrono strftime pattern for row dates
    pub date_format: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₦".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
        }
    }
}

impl ReportOptions {
    /// Reject date patterns chrono cannot render.
    pub fn validate(&self) -> Result<(), String> {
        let invalid = StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(format!("invalid date format '{}'", self.date_format));
        }
        Ok(())
    }
}

/// A rendered monthly report, ready to be saved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub month: MonthKey,
    pub filename: String,
    pub contents: String,
}

impl Report {
    pub fn content_type(&self) -> &'static str {
        "text/plain"
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.contents.into_bytes()
    }

    /// Number of transaction rows below the header.
    pub fn row_count(&self) -> usize {
        self.contents.lines().skip(3).count()
    }
}

/// Suggested file name for a month's report.
pub fn report_filename(month: MonthKey) -> String {
    format!("Report_{}.txt", month)
}

/// Render one transaction as a report row:
/// `<date> | <TYPE> | <note or "Cash"> | <symbol><amount>`
pub fn format_row(transaction: &Transaction, options: &ReportOptions) -> String {
    let note = transaction
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_NOTE);

    format!(
        "{} | {} | {} | {}{}",
        transaction.date.format(&options.date_format),
        transaction.flow.as_str().to_uppercase(),
        note,
        options.currency_symbol,
        transaction.amount
    )
}

/// Render the report for `month`.
///
/// `transactions` is rendered as given, in order; callers filter to the month
/// beforehand so the report matches what the history view shows.
pub fn format_report(
    profile_name: Option<&str>,
    month: MonthKey,
    transactions: &[Transaction],
    options: &ReportOptions,
) -> Report {
    let name = profile_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNNAMED_BUSINESS);

    let header = format!(
        "CASHTRACK REPORT - {}\nBusiness: {}\n{}\n",
        month, name, SEPARATOR
    );
    let rows = transactions
        .iter()
        .map(|t| format_row(t, options))
        .collect::<Vec<_>>()
        .join("\n");

    Report {
        month,
        filename: report_filename(month),
        contents: header + &rows,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{FlowType, parse_amount};

    fn may_report() -> MonthKey {
        "2024-05".parse().unwrap()
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let report = format_report(Some("Kiosk"), may_report(), &[], &ReportOptions::default());

        assert_eq!(
            report.contents,
            "CASHTRACK REPORT - 2024-05\nBusiness: Kiosk\n--------------------------\n"
        );
        assert_eq!(report.row_count(), 0);
        assert_eq!(report.filename, "Report_2024-05.txt");
        assert_eq!(report.content_type(), "text/plain");
    }

    #[test]
    fn test_missing_profile_name_uses_placeholder() {
        let options = ReportOptions::default();
        let report = format_report(None, may_report(), &[], &options);
        assert!(report.contents.contains("Business: Unnamed Business\n"));

        let report = format_report(Some("  "), may_report(), &[], &options);
        assert!(report.contents.contains("Business: Unnamed Business\n"));
    }

    #[test]
    fn test_rows_follow_given_order() {
        let sale = Transaction::new(
            parse_amount("500").unwrap(),
            FlowType::Inflow,
            Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap(),
        )
        .with_note("Sale");
        let restock = Transaction::new(
            parse_amount("200").unwrap(),
            FlowType::Outflow,
            Utc.with_ymd_and_hms(2024, 5, 4, 15, 30, 0).unwrap(),
        );

        let report = format_report(
            Some("Kiosk"),
            may_report(),
            &[restock, sale],
            &ReportOptions::default(),
        );

        let lines: Vec<&str> = report.contents.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "5/4/2024 | OUTFLOW | Cash | ₦200");
        assert_eq!(lines[4], "5/3/2024 | INFLOW | Sale | ₦500");
        assert!(!report.contents.ends_with('\n'));
        assert_eq!(report.row_count(), 2);
    }

    #[test]
    fn test_custom_options() {
        let tx = Transaction::new(
            parse_amount("12.50").unwrap(),
            FlowType::Inflow,
            Utc.with_ymd_and_hms(2024, 5, 9, 0, 0, 0).unwrap(),
        )
        .with_note("Tips");
        let options = ReportOptions {
            currency_symbol: "$".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        };

        assert_eq!(format_row(&tx, &options), "2024-05-09 | INFLOW | Tips | $12.5");
        assert!(options.validate().is_ok());

        let broken = ReportOptions {
            date_format: "%Q".to_string(),
            ..ReportOptions::default()
        };
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_formatter_does_not_filter() {
        let april = Transaction::new(
            parse_amount("1").unwrap(),
            FlowType::Inflow,
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        );
        let report = format_report(Some("Kiosk"), may_report(), &[april], &ReportOptions::default());
        assert_eq!(report.row_count(), 1);
    }
}
