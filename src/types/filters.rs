//! Query-side selectors: traffic direction, cross-tab axes, weekday sets
//! and the rain filter.

use chrono::Weekday;

pub(crate) const DAYS_MONDAY_FIRST: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Which count column of a series a view reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Traffic entering along the site's "in" direction.
    In,
    /// Traffic leaving along the site's "out" direction.
    Out,
    /// Both directions together.
    Combined,
}

/// The grouping axis of a cross-tabulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PivotAxis {
    /// Group by hour of day, positions `0..=23`.
    HourOfDay,
    /// Group by day of week, positions `0..=6` counted from Monday.
    DayOfWeek,
}

impl PivotAxis {
    /// All positions along this axis in output order, hour `0..=23` or
    /// Monday-first weekday index `0..=6`.
    pub fn positions(&self) -> std::ops::Range<u8> {
        match self {
            PivotAxis::HourOfDay => 0..24,
            PivotAxis::DayOfWeek => 0..7,
        }
    }

    /// A display label for a position along this axis, `"07:00"` for hours
    /// and `"Mon".."Sun"` for weekdays.
    pub fn label(&self, position: u8) -> String {
        match self {
            PivotAxis::HourOfDay => format!("{position:02}:00"),
            PivotAxis::DayOfWeek => DAYS_MONDAY_FIRST
                .get(position as usize)
                .map(|day| day.to_string())
                .unwrap_or_else(|| position.to_string()),
        }
    }
}

/// Whether the daily overlay keeps all days or only days recorded as dry.
///
/// A day counts as dry only when a weather row exists for it and reports
/// exactly zero precipitation; a day with no weather row is never dry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RainFilter {
    /// Keep every day.
    #[default]
    All,
    /// Keep only days with a recorded precipitation of zero.
    DryOnly,
}

impl RainFilter {
    /// Whether a day with the given precipitation reading passes the filter.
    pub fn keeps(&self, precipitation: Option<f64>) -> bool {
        match self {
            RainFilter::All => true,
            RainFilter::DryOnly => matches!(precipitation, Some(p) if p == 0.0),
        }
    }
}

/// A set of weekdays, used to restrict views to e.g. working days.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use velostat::WeekdaySet;
///
/// let weekend = WeekdaySet::WEEKEND;
/// assert!(weekend.contains(Weekday::Sat));
/// assert!(!weekend.contains(Weekday::Wed));
///
/// let custom: WeekdaySet = [Weekday::Mon, Weekday::Fri].into_iter().collect();
/// assert_eq!(custom.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Every day of the week.
    pub const ALL: WeekdaySet = WeekdaySet(0b0111_1111);
    /// Monday through Friday.
    pub const WEEKDAYS: WeekdaySet = WeekdaySet(0b0001_1111);
    /// Saturday and Sunday.
    pub const WEEKEND: WeekdaySet = WeekdaySet(0b0110_0000);

    /// The empty set.
    pub fn empty() -> Self {
        WeekdaySet(0)
    }

    /// Adds a day to the set.
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    /// Whether the set contains `day`.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of days in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// The days in the set, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        DAYS_MONDAY_FIRST
            .into_iter()
            .filter(move |day| self.contains(*day))
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        WeekdaySet::ALL
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        let mut set = WeekdaySet::empty();
        for day in days {
            set.insert(day);
        }
        set
    }
}
