use crate::infra::ReportMonth;
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::Args;
use resident_billing::error::AppError;
use resident_billing::reports::views::OccupancyReportView;
use resident_billing::reports::{
    aggregate, BatchResult, ChargeRecord, DateInterval, GroupKey, GroupSummary, ProrationEngine,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Args, Debug, Default)]
pub(crate) struct OccupancyReportArgs {
    /// Report a full calendar month (YYYY-MM); defaults to the current month
    #[arg(long, value_parser = crate::infra::parse_month, conflicts_with_all = ["date", "from", "to"])]
    pub(crate) month: Option<ReportMonth>,
    /// Report a single day (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date, conflicts_with_all = ["from", "to"])]
    pub(crate) date: Option<NaiveDate>,
    /// Report range start (YYYY-MM-DD); requires --to
    #[arg(long, value_parser = crate::infra::parse_date, requires = "to")]
    pub(crate) from: Option<NaiveDate>,
    /// Report range end (YYYY-MM-DD); requires --from
    #[arg(long, value_parser = crate::infra::parse_date, requires = "from")]
    pub(crate) to: Option<NaiveDate>,
}

pub(crate) fn run_occupancy_report(args: OccupancyReportArgs) -> Result<(), AppError> {
    let window = resolve_window(&args)?;
    let (capacities, records) = demo_dataset(&window);

    let batch = ProrationEngine::prorate_batch(window, records)?;
    let summaries = aggregate(&capacities, &batch.outcomes);
    render_report(&batch, &summaries);

    Ok(())
}

fn resolve_window(args: &OccupancyReportArgs) -> Result<DateInterval, AppError> {
    if let Some(month) = args.month {
        return Ok(DateInterval::calendar_month(month.year, month.month)?);
    }
    if let Some(date) = args.date {
        return Ok(DateInterval::single_day(date));
    }
    if let (Some(from), Some(to)) = (args.from, args.to) {
        return Ok(DateInterval::range(from, to)?);
    }

    let today = Local::now().date_naive();
    Ok(DateInterval::calendar_month(today.year(), today.month())?)
}

fn money(raw: &str) -> Decimal {
    raw.parse().unwrap_or(Decimal::ZERO)
}

/// Two demo facilities with admissions anchored around the window start, so
/// the report stays meaningful for any requested window.
fn demo_dataset(window: &DateInterval) -> (BTreeMap<GroupKey, u32>, Vec<ChargeRecord>) {
    let anchor = window.start();
    let mut capacities = BTreeMap::new();
    capacities.insert(GroupKey::new("maple-house"), 10);
    capacities.insert(GroupKey::new("willow-court"), 6);

    let mut records = Vec::new();
    let mut push = |charge_id: &str, group: &str, period_code: &str, amount: &str, validity| {
        records.push(ChargeRecord {
            charge_id: charge_id.to_owned(),
            group_key: GroupKey::new(group),
            amount: money(amount),
            period_code: period_code.to_owned(),
            validity,
        });
    };

    for index in 0..5 {
        let admitted = anchor - Duration::days(200 + index * 17);
        if let Ok(validity) = DateInterval::from_admission(admitted, None) {
            push(
                &format!("maple-{:03}", index + 1),
                "maple-house",
                "monthly",
                "3100.00",
                validity,
            );
        }
    }

    // Mid-window admission, prorated from the admission day.
    if let Ok(validity) = DateInterval::from_admission(anchor + Duration::days(14), None) {
        push("maple-006", "maple-house", "monthly", "2400.00", validity);
    }

    // Short respite stay ending inside the window.
    if let Ok(validity) =
        DateInterval::from_admission(anchor - Duration::days(30), Some(anchor + Duration::days(6)))
    {
        push("maple-007", "maple-house", "weekly", "700.00", validity);
    }

    if let Ok(validity) = DateInterval::from_admission(anchor - Duration::days(10), None) {
        push("maple-008", "maple-house", "daily", "95.00", validity);
    }

    for index in 0..2 {
        let admitted = anchor - Duration::days(400 + index * 31);
        if let Ok(validity) = DateInterval::from_admission(admitted, None) {
            push(
                &format!("willow-{:03}", index + 1),
                "willow-court",
                "monthly",
                "4800.00",
                validity,
            );
        }
    }

    if let Ok(validity) = DateInterval::from_admission(anchor - Duration::days(90), None) {
        push("willow-003", "willow-court", "yearly", "30000.00", validity);
    }

    // A legacy rate record with a period code the engine does not accept;
    // it should surface in the skipped list, not sink the report.
    if let Ok(validity) = DateInterval::from_admission(anchor - Duration::days(45), None) {
        push("willow-004", "willow-court", "per-stay", "500.00", validity);
    }

    (capacities, records)
}

fn render_report(batch: &BatchResult, summaries: &BTreeMap<GroupKey, GroupSummary>) {
    let view = OccupancyReportView::build(batch, summaries);

    println!("Occupancy and revenue report (demo data)");
    match view.window_end {
        Some(end) => println!(
            "Window: {} -> {} ({})",
            view.window_start, end, view.window_shape
        ),
        None => println!("Window: {} -> open ({})", view.window_start, view.window_shape),
    }

    for group in &view.groups {
        println!("\n{} ({} units)", group.group_key, group.available_units);
        println!(
            "- gross revenue {} | average rate {} | paying records {}",
            group.gross_revenue, group.average_rate, group.paying_records
        );
        println!(
            "- occupancy {:.1}% | vacancy {:.1}%",
            group.occupancy_percent, group.vacancy_percent
        );
        let brackets: Vec<String> = group
            .revenue_brackets
            .iter()
            .map(|entry| format!("{} {:.1}%", entry.bracket_label, entry.percent))
            .collect();
        println!("- brackets: {}", brackets.join(" | "));
    }

    if view.record_errors.is_empty() {
        println!("\nSkipped records: none");
    } else {
        println!("\nSkipped records");
        for error in &view.record_errors {
            println!("- {} ({}): {}", error.charge_id, error.group_key, error.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_the_current_calendar_month() {
        let window =
            resolve_window(&OccupancyReportArgs::default()).expect("default window builds");
        let today = Local::now().date_naive();
        assert_eq!(window.start().month(), today.month());
        assert_eq!(window.start().day(), 1);
        assert!(window.contains_day(today));
    }

    #[test]
    fn demo_dataset_reports_one_skipped_record() {
        let window = DateInterval::calendar_month(2024, 3).expect("window builds");
        let (capacities, records) = demo_dataset(&window);

        let batch = ProrationEngine::prorate_batch(window, records).expect("batch runs");
        let skipped: Vec<&str> = batch
            .failed_records()
            .map(|entry| entry.record.charge_id.as_str())
            .collect();
        assert_eq!(skipped, vec!["willow-004"]);

        let summaries = aggregate(&capacities, &batch.outcomes);
        assert_eq!(summaries.len(), 2);
        let maple = summaries
            .get(&GroupKey::new("maple-house"))
            .expect("maple-house summarized");
        assert!(maple.gross_revenue > Decimal::ZERO);
    }
}
