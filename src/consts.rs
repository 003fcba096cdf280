/// Maximum valid year (inclusive); dates are rendered with four year digits
pub const MAX_YEAR: i32 = 9999;

/// Minimum valid year
pub const MIN_YEAR: i32 = 1;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Largest explicit day-of-month selector
pub const MAX_MONTH_DAY: u8 = 31;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Largest interval accepted by a daily rule
pub const MAX_INTERVAL_DAYS: u16 = 400;

/// Weekday numbering: Monday is 1, Sunday is 7
pub const MAX_WEEKDAY: u8 = 7;

/// Upper bound on the day-by-day scan of a monthly rule.
/// Two consecutive Feb 29ths can be eight years apart (2096 -> 2104).
pub const MAX_MONTHLY_SCAN_DAYS: u32 = 9 * 366;

/// Text form of a calendar date: `YYYYMMDD`
pub const DATE_FORMAT: &str = "%Y%m%d";
/// Length of a date in text form
pub const DATE_TEXT_LEN: usize = 8;

/// Rule kind letter: every N days
pub const RULE_DAILY: &str = "d";
/// Rule kind letter: every year on the same date
pub const RULE_YEARLY: &str = "y";
/// Rule kind letter: on selected weekdays
pub const RULE_WEEKLY: &str = "w";
/// Rule kind letter: on selected days of selected months
pub const RULE_MONTHLY: &str = "m";

/// Separator inside a list token (`1,3,5`)
pub const LIST_SEPARATOR: char = ',';
