//! Calendar arithmetic on the simulation's Julian-day clock.
//!
//! Years follow the model's leap rule (`year % 4 == 0`), which is not the Gregorian rule, so
//! day counting is done here rather than through `chrono`.

use std::fmt;

pub const HOURS_PER_DAY: u8 = 24;

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// A Julian day (1-based) within a year. Ordered by year, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfYear {
    year: i32,
    julian: u32,
}

impl DayOfYear {
    /// Builds a day, rolling `julian` over into following or preceding years when it falls
    /// outside `1..=days_in_year(year)`.
    pub fn new(julian: i64, year: i32) -> Self {
        let mut julian = julian;
        let mut year = year;
        while julian > days_in_year(year) as i64 {
            julian -= days_in_year(year) as i64;
            year += 1;
        }
        while julian < 1 {
            year -= 1;
            julian += days_in_year(year) as i64;
        }
        DayOfYear {
            year,
            julian: julian as u32,
        }
    }

    pub fn julian(&self) -> u32 {
        self.julian
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn next(self) -> Self {
        DayOfYear::new(self.julian as i64 + 1, self.year)
    }

    pub fn previous(self) -> Self {
        DayOfYear::new(self.julian as i64 - 1, self.year)
    }

    /// Signed number of days from `self` to `other`, counting every intervening year with its
    /// own length.
    pub fn days_until(self, other: DayOfYear) -> i64 {
        let mut days = other.julian as i64 - self.julian as i64;
        if other.year >= self.year {
            for year in self.year..other.year {
                days += days_in_year(year) as i64;
            }
        } else {
            for year in other.year..self.year {
                days -= days_in_year(year) as i64;
            }
        }
        days
    }
}

impl fmt::Display for DayOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {:>3} of {}", self.julian, self.year)
    }
}

/// Hour of the day on the legacy 1-based clock.
///
/// Values run 1..=24 and name the *end* of each hour. Hour 24 is midnight at the end of the day,
/// the same instant as hour 0 of the next day; it is stored in slot 24 of the day that ends, never
/// in a slot 0 of the following day. Downstream physics relies on that convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourOfDay(u8);

impl HourOfDay {
    pub const FIRST: HourOfDay = HourOfDay(1);
    pub const MIDNIGHT: HourOfDay = HourOfDay(HOURS_PER_DAY);

    pub fn new(hour: u8) -> Option<Self> {
        (1..=HOURS_PER_DAY).contains(&hour).then_some(HourOfDay(hour))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Position in a zero-based array of 24 slots.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn all() -> impl Iterator<Item = HourOfDay> {
        (1..=HOURS_PER_DAY).map(HourOfDay)
    }

    /// Step-end hours of a day for a step of `hours` hours: `hours, 2*hours, ..., 24`.
    pub fn step_ends(hours: u8) -> impl Iterator<Item = HourOfDay> {
        (hours..=HOURS_PER_DAY)
            .step_by(hours.max(1) as usize)
            .map(HourOfDay)
    }
}

/// An instant on the hourly clock, kept in normalised form: `hour` is 0..=23 and hour 24 of a
/// day is stored as hour 0 of the following day, with the year rolled over when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    day: DayOfYear,
    hour: u8,
}

impl Timestamp {
    pub fn new(julian: i64, hour: u8, year: i32) -> Self {
        let day = DayOfYear::new(julian, year);
        let extra_days = (hour / HOURS_PER_DAY) as i64;
        let hour = hour % HOURS_PER_DAY;
        Timestamp {
            day: DayOfYear::new(day.julian as i64 + extra_days, day.year),
            hour,
        }
    }

    pub fn start_of(day: DayOfYear) -> Self {
        Timestamp { day, hour: 0 }
    }

    /// The instant `hour` of `day` names on the 1-based clock.
    pub fn at(day: DayOfYear, hour: HourOfDay) -> Self {
        Timestamp::new(day.julian as i64, hour.get(), day.year)
    }

    pub fn day(&self) -> DayOfYear {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// The (day, hour) pair on the 1-based clock: hour 0 of day D+1 reads as hour 24 of day D.
    pub fn as_day_hour(&self) -> (DayOfYear, HourOfDay) {
        if self.hour == 0 {
            (self.day.previous(), HourOfDay::MIDNIGHT)
        } else {
            (self.day, HourOfDay(self.hour))
        }
    }

    pub fn hours_until(self, other: Timestamp) -> i64 {
        self.day.days_until(other.day) * HOURS_PER_DAY as i64 + other.hour as i64
            - self.hour as i64
    }
}

/// The driver's clock: the instant the last completed step ended, and the step length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    now: Timestamp,
    hours_per_step: u8,
}

impl SimulationClock {
    pub fn new(start: Timestamp, hours_per_step: u8) -> Self {
        SimulationClock {
            now: start,
            hours_per_step,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// The (day, hour) at which the next step ends.
    fn next_step_end(&self) -> (DayOfYear, HourOfDay) {
        let end = self.now.day.julian as i64 * HOURS_PER_DAY as i64
            + self.now.hour as i64
            + self.hours_per_step as i64;
        let julian = end.div_euclid(HOURS_PER_DAY as i64);
        let hour = end.rem_euclid(HOURS_PER_DAY as i64) as u8;
        Timestamp::new(julian, hour, self.now.day.year).as_day_hour()
    }

    /// The day being simulated: the one the next step ends in.
    pub fn day(&self) -> DayOfYear {
        self.next_step_end().0
    }

    pub fn julian(&self) -> u32 {
        self.day().julian
    }

    pub fn year(&self) -> i32 {
        self.day().year
    }

    /// Hour at which the next step ends, 1..=24.
    pub fn hour(&self) -> u8 {
        self.next_step_end().1.get()
    }

    pub fn days_in_year(&self) -> u32 {
        days_in_year(self.year())
    }

    /// Completes one step.
    pub fn advance(&mut self) -> Timestamp {
        let (day, hour) = self.next_step_end();
        self.now = Timestamp::at(day, hour);
        self.now
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (day, hour) = self.as_day_hour();
        write!(f, "{} hour {:>2}", day, hour.get())
    }
}
