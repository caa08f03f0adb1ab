//! Timestep list construction from the scenario's timeframe and resolution
//! (spec §4.4 "Timesteps").

use crate::ast::{Metadata, Resolution};

use super::calendar::{civil_from_days, days_from_civil};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Timestep {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

pub fn build_timesteps(metadata: &Metadata) -> Vec<Timestep> {
    let Some((start, end)) = metadata.timeframe else {
        return Vec::new();
    };
    if end < start {
        return Vec::new();
    }

    match metadata.resolution.unwrap_or(Resolution::Yearly) {
        Resolution::Yearly => (start.year..=end.year)
            .map(|year| Timestep { year, month: 1, day: 1 })
            .collect(),
        Resolution::Monthly => {
            let mut out = Vec::new();
            let (mut year, mut month) = (start.year, start.month.unwrap_or(1));
            let (end_year, end_month) = (end.year, end.month.unwrap_or(1));
            loop {
                out.push(Timestep { year, month, day: 1 });
                if year > end_year || (year == end_year && month >= end_month) {
                    break;
                }
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
            out
        }
        resolution @ (Resolution::Weekly | Resolution::Daily) => {
            let step = if resolution == Resolution::Weekly { 7 } else { 1 };
            let start_ord = days_from_civil(start.year, start.month.unwrap_or(1), start.day.unwrap_or(1));
            let end_ord = days_from_civil(end.year, end.month.unwrap_or(1), end.day.unwrap_or(1));
            let mut out = Vec::new();
            let mut ord = start_ord;
            while ord <= end_ord {
                let (year, month, day) = civil_from_days(ord);
                out.push(Timestep { year, month, day });
                ord += step;
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DateLit;

    fn metadata_with(start: DateLit, end: DateLit, resolution: Resolution) -> Metadata {
        Metadata {
            timeframe: Some((start, end)),
            resolution: Some(resolution),
            ..Metadata::default()
        }
    }

    #[test]
    fn yearly_covers_every_calendar_year_inclusive() {
        let metadata = metadata_with(DateLit::year_only(2025), DateLit::year_only(2027), Resolution::Yearly);
        let steps = build_timesteps(&metadata);
        assert_eq!(steps.iter().map(|s| s.year).collect::<Vec<_>>(), vec![2025, 2026, 2027]);
    }

    #[test]
    fn no_timeframe_yields_no_timesteps() {
        assert!(build_timesteps(&Metadata::default()).is_empty());
    }

    #[test]
    fn monthly_spans_every_month_in_range() {
        let metadata = metadata_with(
            DateLit::ymd(2025, 1, 1),
            DateLit::ymd(2025, 3, 1),
            Resolution::Monthly,
        );
        let steps = build_timesteps(&metadata);
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn daily_steps_one_day_at_a_time() {
        let metadata = metadata_with(
            DateLit::ymd(2025, 1, 1),
            DateLit::ymd(2025, 1, 5),
            Resolution::Daily,
        );
        let steps = build_timesteps(&metadata);
        assert_eq!(steps.len(), 5);
    }
}
