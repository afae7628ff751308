use chrono::NaiveDate;

/// Returns `days` consecutive dates ending at `end`, newest first.
///
/// The window is cut short at [NaiveDate::MIN].
pub fn window_dates(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    std::iter::successors(Some(end), NaiveDate::pred_opt)
        .take(days as usize)
        .collect()
}
