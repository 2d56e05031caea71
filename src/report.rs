use std::path::Path;

use tracing::{info, instrument};

use crate::{
    analysis::{growth::GrowthPoint, monthly::MonthlyProfitReport},
    error::RateWindowError,
};

/// Writes `month,rate,profit` rows, one per report entry.
#[instrument(skip(report), fields(entries = report.len()))]
pub fn write_monthly_csv(path: &Path, report: &MonthlyProfitReport) -> Result<(), RateWindowError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["month", "rate", "profit"])?;
    for entry in &report.entries {
        writer.write_record([
            entry.label(),
            entry.effective_rate.to_string(),
            format!("{:.2}", entry.profit),
        ])?;
    }
    writer.flush()?;
    info!("Wrote monthly report to {}", path.display());
    Ok(())
}

/// Writes `date,rate,value,difference` rows for a growth curve.
#[instrument(skip(points), fields(points = points.len()))]
pub fn write_growth_csv(path: &Path, points: &[GrowthPoint]) -> Result<(), RateWindowError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "rate", "value", "difference"])?;
    for point in points {
        writer.write_record([
            point.date.to_string(),
            point.rate.to_string(),
            format!("{:.2}", point.value),
            format!("{:.2}", point.difference),
        ])?;
    }
    writer.flush()?;
    info!("Wrote growth curve to {}", path.display());
    Ok(())
}
