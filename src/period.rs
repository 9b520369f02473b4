use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

const SHORT_MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    #[serde(rename = "current-month")]
    CurrentMonth,
    #[serde(rename = "last-month")]
    LastMonth,
    #[serde(rename = "last-3-months")]
    Last3Months,
    #[serde(rename = "last-6-months")]
    Last6Months,
    #[serde(rename = "current-year")]
    CurrentYear,
    #[serde(rename = "custom")]
    Custom,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 6] = [
        PeriodKind::CurrentMonth,
        PeriodKind::LastMonth,
        PeriodKind::Last3Months,
        PeriodKind::Last6Months,
        PeriodKind::CurrentYear,
        PeriodKind::Custom,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            PeriodKind::CurrentMonth => "current-month",
            PeriodKind::LastMonth => "last-month",
            PeriodKind::Last3Months => "last-3-months",
            PeriodKind::Last6Months => "last-6-months",
            PeriodKind::CurrentYear => "current-year",
            PeriodKind::Custom => "custom",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::CurrentMonth => "Mes actual",
            PeriodKind::LastMonth => "Mes anterior",
            PeriodKind::Last3Months => "Últimos 3 meses",
            PeriodKind::Last6Months => "Últimos 6 meses",
            PeriodKind::CurrentYear => "Año actual",
            PeriodKind::Custom => "Personalizado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PeriodError {
    #[error("la fecha de fin {end} es anterior a la fecha de inicio {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

// start_date <= end_date
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: PeriodKind,
    pub label: String,
}

impl PeriodRange {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: PeriodKind,
        label: impl Into<String>,
    ) -> Result<Self, PeriodError> {
        if end_date < start_date {
            return Err(PeriodError::EndBeforeStart {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
            kind,
            label: label.into(),
        })
    }

    pub fn preset(kind: PeriodKind, reference: NaiveDate) -> Option<Self> {
        let (start_date, end_date) = match kind {
            PeriodKind::CurrentMonth => (first_of_month(reference), last_of_month(reference)),
            PeriodKind::LastMonth => {
                let previous = months_back(first_of_month(reference), 1);
                (previous, last_of_month(previous))
            }
            PeriodKind::Last3Months => (
                months_back(first_of_month(reference), 2),
                last_of_month(reference),
            ),
            PeriodKind::Last6Months => (
                months_back(first_of_month(reference), 5),
                last_of_month(reference),
            ),
            PeriodKind::CurrentYear => (
                NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap_or(reference),
                last_of_month(reference),
            ),
            PeriodKind::Custom => return None,
        };

        Some(Self {
            start_date,
            end_date,
            kind,
            label: kind.label().to_string(),
        })
    }

    pub fn current_month(reference: NaiveDate) -> Self {
        let start_date = first_of_month(reference);
        Self {
            start_date,
            end_date: last_of_month(reference),
            kind: PeriodKind::CurrentMonth,
            label: PeriodKind::CurrentMonth.label().to_string(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn start_param(&self) -> String {
        format_iso_date(self.start_date)
    }

    pub fn end_param(&self) -> String {
        format_iso_date(self.end_date)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomRangeDraft {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl CustomRangeDraft {
    pub fn from_period(period: &PeriodRange) -> Self {
        if period.kind == PeriodKind::Custom {
            Self {
                start: Some(period.start_date),
                end: Some(period.end_date),
            }
        } else {
            Self::default()
        }
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        self.start = start;
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end < start {
                self.end = None;
            }
        }
    }

    pub fn is_end_disabled(&self, date: NaiveDate) -> bool {
        matches!(self.start, Some(start) if date < start)
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) -> bool {
        match end {
            Some(date) if self.is_end_disabled(date) => false,
            other => {
                self.end = other;
                true
            }
        }
    }

    pub fn can_apply(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn apply(&self) -> Option<PeriodRange> {
        let (start, end) = (self.start?, self.end?);
        PeriodRange::new(start, end, PeriodKind::Custom, custom_label(start, end)).ok()
    }
}

pub fn custom_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_day_month(start), format_day_month_year(end))
}

pub fn format_day_month(date: NaiveDate) -> String {
    format!("{:02} {}", date.day(), short_month(date))
}

pub fn format_day_month_year(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), short_month(date), date.year())
}

pub fn short_month(date: NaiveDate) -> &'static str {
    SHORT_MONTHS_ES[date.month0() as usize]
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_loose(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

pub fn parse_month_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d").ok()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

fn months_back(first_day: NaiveDate, months: u32) -> NaiveDate {
    let index = first_day.year() * 12 + first_day.month0() as i32 - months as i32;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1).unwrap_or(first_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn current_month_spans_the_reference_month() {
        let p = PeriodRange::preset(PeriodKind::CurrentMonth, d(2024, 2, 14)).unwrap();
        assert_eq!((p.start_date, p.end_date), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(p.label, "Mes actual");
    }

    #[test]
    fn last_month_is_the_previous_calendar_month() {
        let p = PeriodRange::preset(PeriodKind::LastMonth, d(2024, 3, 15)).unwrap();
        assert_eq!((p.start_date, p.end_date), (d(2024, 2, 1), d(2024, 2, 29)));

        let p = PeriodRange::preset(PeriodKind::LastMonth, d(2024, 1, 31)).unwrap();
        assert_eq!((p.start_date, p.end_date), (d(2023, 12, 1), d(2023, 12, 31)));
    }

    #[test]
    fn rolling_windows_cross_year_boundaries() {
        let p = PeriodRange::preset(PeriodKind::Last3Months, d(2024, 2, 10)).unwrap();
        assert_eq!((p.start_date, p.end_date), (d(2023, 12, 1), d(2024, 2, 29)));

        let p = PeriodRange::preset(PeriodKind::Last6Months, d(2024, 5, 31)).unwrap();
        assert_eq!((p.start_date, p.end_date), (d(2023, 12, 1), d(2024, 5, 31)));
    }

    #[test]
    fn current_year_runs_to_end_of_reference_month() {
        let p = PeriodRange::preset(PeriodKind::CurrentYear, d(2024, 8, 3)).unwrap();
        assert_eq!((p.start_date, p.end_date), (d(2024, 1, 1), d(2024, 8, 31)));
        assert_eq!(p.kind.tag(), "current-year");
    }

    #[test]
    fn custom_has_no_preset() {
        assert!(PeriodRange::preset(PeriodKind::Custom, d(2024, 1, 1)).is_none());
    }

    #[test]
    fn constructor_rejects_reversed_bounds() {
        let err = PeriodRange::new(d(2024, 3, 10), d(2024, 3, 1), PeriodKind::Custom, "x").unwrap_err();
        assert_eq!(
            err,
            PeriodError::EndBeforeStart {
                start: d(2024, 3, 10),
                end: d(2024, 3, 1)
            }
        );
    }

    #[test]
    fn custom_draft_needs_both_dates() {
        let mut draft = CustomRangeDraft::default();
        assert!(!draft.can_apply());
        assert!(draft.apply().is_none());

        draft.set_start(Some(d(2024, 3, 10)));
        assert!(!draft.can_apply());
        assert!(draft.apply().is_none());

        assert!(draft.set_end(Some(d(2024, 3, 31))));
        assert!(draft.can_apply());
        let period = draft.apply().unwrap();
        assert_eq!(period.kind, PeriodKind::Custom);
        assert_eq!(period.label, "10 mar - 31 mar 2024");
    }

    #[test]
    fn end_picker_disallows_days_before_start() {
        let mut draft = CustomRangeDraft::default();
        draft.set_start(Some(d(2024, 3, 10)));
        assert!(draft.is_end_disabled(d(2024, 3, 1)));
        assert!(!draft.set_end(Some(d(2024, 3, 1))));
        assert_eq!(draft.end, None);
        assert!(!draft.can_apply());
        assert!(!draft.is_end_disabled(d(2024, 3, 10)));
    }

    #[test]
    fn moving_start_past_end_clears_end() {
        let mut draft = CustomRangeDraft::default();
        draft.set_start(Some(d(2024, 3, 1)));
        draft.set_end(Some(d(2024, 3, 5)));
        draft.set_start(Some(d(2024, 3, 9)));
        assert_eq!(draft.end, None);
    }

    #[test]
    fn custom_label_uses_spanish_short_months() {
        assert_eq!(custom_label(d(2023, 9, 1), d(2024, 1, 5)), "01 sept - 05 ene 2024");
    }

    #[test]
    fn parses_loose_dates() {
        assert_eq!(parse_date_loose("2024-01-31"), Some(d(2024, 1, 31)));
        assert_eq!(parse_date_loose("2024-01-31T00:00:00.000Z"), Some(d(2024, 1, 31)));
        assert_eq!(parse_date_loose("2024-01-31 10:00"), Some(d(2024, 1, 31)));
        assert_eq!(parse_date_loose("ayer"), None);
        assert_eq!(parse_month_key("2024-02"), Some(d(2024, 2, 1)));
    }

    #[test]
    fn serializes_kind_tags() {
        let json = serde_json::to_value(PeriodKind::Last3Months).unwrap();
        assert_eq!(json, serde_json::json!("last-3-months"));
        assert_eq!(PeriodKind::from_tag("last-6-months"), Some(PeriodKind::Last6Months));
    }

    fn reference_from(days: u16) -> NaiveDate {
        d(1990, 1, 1) + chrono::Duration::days(days as i64)
    }

    #[quickcheck]
    fn presets_are_ordered(days: u16) -> bool {
        let reference = reference_from(days);
        PeriodKind::ALL
            .into_iter()
            .filter_map(|kind| PeriodRange::preset(kind, reference))
            .all(|p| p.start_date <= p.end_date)
    }

    #[quickcheck]
    fn presets_other_than_last_month_contain_reference(days: u16) -> bool {
        let reference = reference_from(days);
        PeriodKind::ALL
            .into_iter()
            .filter(|kind| *kind != PeriodKind::LastMonth)
            .filter_map(|kind| PeriodRange::preset(kind, reference))
            .all(|p| p.contains(reference))
    }

    #[quickcheck]
    fn last_month_ends_the_day_before_this_month(days: u16) -> bool {
        let reference = reference_from(days);
        let p = PeriodRange::preset(PeriodKind::LastMonth, reference).unwrap();
        p.end_date.succ_opt() == Some(first_of_month(reference)) && p.start_date.day() == 1
    }
}
