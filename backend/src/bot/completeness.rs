use async_trait::async_trait;

/// Decides whether a timesheet is complete for a month.
#[async_trait]
pub trait CompletenessCheck: Send + Sync {
    async fn is_complete(&self, spreadsheet_id: &str, month: &str) -> bool;
}

/// Stand-in check: a coin flip per timesheet.
///
/// There is no real completeness logic yet; tests inject a deterministic check.
#[derive(Debug, Default)]
pub struct RandomCompleteness;

#[async_trait]
impl CompletenessCheck for RandomCompleteness {
    async fn is_complete(&self, spreadsheet_id: &str, month: &str) -> bool {
        tracing::info!("Simulating check for timesheet {} for month {}", spreadsheet_id, month);
        rand::random::<bool>()
    }
}
