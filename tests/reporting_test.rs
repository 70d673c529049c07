mod common;

use anyhow::Result;
use cashtrack::application::{LedgerStore, ReportOptions, format_report};
use cashtrack::domain::FlowType;
use cashtrack::storage::MemoryStore;
use common::{at, ready_ledger, test_ledger};

#[tokio::test]
async fn test_monthly_report_scenario() -> Result<()> {
    let (mut ledger, _temp) = ready_ledger().await?;

    ledger
        .add_transaction_at("500", Some("Sale"), FlowType::Inflow, at(2024, 5, 3))
        .await?;
    ledger
        .add_transaction_at("200", Some("Restock"), FlowType::Outflow, at(2024, 5, 4))
        .await?;

    let report = ledger.report("2024-05".parse()?, &ReportOptions::default());

    assert_eq!(report.filename, "Report_2024-05.txt");
    assert_eq!(
        report.contents,
        "CASHTRACK REPORT - 2024-05\n\
         Business: Iya Basira Provisions\n\
         --------------------------\n\
         5/4/2024 | OUTFLOW | Restock | ₦200\n\
         5/3/2024 | INFLOW | Sale | ₦500"
    );
    assert_eq!(report.row_count(), 2);

    Ok(())
}

#[tokio::test]
async fn test_report_rows_match_history() -> Result<()> {
    let (mut ledger, _temp) = ready_ledger().await?;

    ledger
        .add_transaction_at("80", Some("Old stock"), FlowType::Outflow, at(2024, 4, 28))
        .await?;
    ledger
        .add_transaction_at("1250.5", None, FlowType::Inflow, at(2024, 5, 2))
        .await?;
    ledger
        .add_transaction_at("60", Some("Transport"), FlowType::Outflow, at(2024, 5, 9))
        .await?;
    ledger
        .add_transaction_at("15", Some("June"), FlowType::Inflow, at(2024, 6, 1))
        .await?;

    let month = "2024-05".parse()?;
    let options = ReportOptions::default();
    let history = ledger.filter_by_month(month);
    let report = ledger.report(month, &options);

    let expected = format_report(
        ledger.profile().map(|p| p.name.as_str()),
        month,
        &history,
        &options,
    );
    assert_eq!(report, expected);
    assert_eq!(report.row_count(), history.len());

    let rows: Vec<&str> = report.contents.lines().skip(3).collect();
    assert_eq!(rows, vec![
        "5/9/2024 | OUTFLOW | Transport | ₦60",
        "5/2/2024 | INFLOW | Cash | ₦1250.5",
    ]);

    Ok(())
}

#[tokio::test]
async fn test_empty_month_report_is_header_only() -> Result<()> {
    let (ledger, _temp) = ready_ledger().await?;

    let report = ledger.report("2024-02".parse()?, &ReportOptions::default());

    assert_eq!(
        report.contents,
        "CASHTRACK REPORT - 2024-02\nBusiness: Iya Basira Provisions\n--------------------------\n"
    );
    assert_eq!(report.row_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_report_without_profile_uses_placeholder() -> Result<()> {
    let (mut ledger, _temp) = test_ledger().await?;
    ledger
        .add_transaction_at("5", None, FlowType::Inflow, at(2024, 5, 1))
        .await?;

    let report = ledger.report("2024-05".parse()?, &ReportOptions::default());
    let lines: Vec<&str> = report.contents.lines().collect();

    assert_eq!(lines[1], "Business: Unnamed Business");
    assert_eq!(lines[3], "5/1/2024 | INFLOW | Cash | ₦5");

    Ok(())
}

#[tokio::test]
async fn test_report_bytes_and_custom_options() -> Result<()> {
    let mut ledger = LedgerStore::initialize(MemoryStore::new()).await?;
    ledger.set_profile("Corner Shop", "Retail").await?;
    ledger
        .add_transaction_at("19.99", Some("Snacks"), FlowType::Inflow, at(2024, 5, 12))
        .await?;

    let options = ReportOptions {
        currency_symbol: "$".to_string(),
        date_format: "%d.%m.%Y".to_string(),
    };
    let report = ledger.report("2024-05".parse()?, &options);

    assert!(report.contents.ends_with("12.05.2024 | INFLOW | Snacks | $19.99"));
    assert_eq!(report.content_type(), "text/plain");
    assert_eq!(report.as_bytes(), report.contents.as_bytes());
    let text = String::from_utf8(report.clone().into_bytes())?;
    assert_eq!(text, report.contents);

    Ok(())
}
