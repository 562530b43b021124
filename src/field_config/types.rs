//! Option types shared by several column configurations

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Symbols of a rating column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingStyle {
    #[default]
    Star,
    Heart,
    ThumbsUp,
    Flag,
    Smile,
}

/// Rendering of dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateFormat {
    /// D/M/Y
    #[serde(rename = "EU")]
    Eu,
    /// M/D/Y
    #[serde(rename = "US")]
    Us,
    /// Y-M-D
    #[default]
    #[serde(rename = "ISO")]
    Iso,
}

/// 12 or 24 hour clock, sent as the number of hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TimeFormat {
    #[default]
    Hour24,
    Hour12,
}

impl From<TimeFormat> for u8 {
    fn from(format: TimeFormat) -> Self {
        match format {
            TimeFormat::Hour24 => 24,
            TimeFormat::Hour12 => 12,
        }
    }
}

impl TryFrom<u8> for TimeFormat {
    type Error = String;

    fn try_from(hours: u8) -> Result<Self, Self::Error> {
        match hours {
            24 => Ok(TimeFormat::Hour24),
            12 => Ok(TimeFormat::Hour12),
            other => Err(format!("time format must be 12 or 24, got {other}")),
        }
    }
}

/// Rendering of durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurationFormat {
    #[serde(rename = "h:mm")]
    HoursMinutes,
    #[default]
    #[serde(rename = "h:mm:ss")]
    HoursMinutesSeconds,
    #[serde(rename = "h:mm:ss.s")]
    HoursMinutesSecondsDeciseconds,
    #[serde(rename = "h:mm:ss.ss")]
    HoursMinutesSecondsCentiseconds,
    #[serde(rename = "h:mm:ss.sss")]
    HoursMinutesSecondsMilliseconds,
    #[serde(rename = "d h")]
    DaysHours,
    #[serde(rename = "d h:mm")]
    DaysHoursMinutes,
    #[serde(rename = "d h:mm:ss")]
    DaysHoursMinutesSeconds,
}

/// Result type of a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaType {
    Invalid,
    Text,
    Char,
    Button,
    Link,
    DateInterval,
    Duration,
    Date,
    Boolean,
    Number,
    Array,
    SingleSelect,
    MultipleSelect,
    SingleFile,
}

/// Date settings of date-like columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateOptions {
    #[serde(default)]
    pub date_format: DateFormat,
    #[serde(default)]
    pub date_include_time: bool,
    #[serde(default)]
    pub date_time_format: TimeFormat,
    #[serde(default)]
    pub date_show_tzinfo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_force_timezone: Option<String>,
    /// Minutes added to the forced timezone when converting existing values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_force_timezone_offset: Option<i32>,
}

/// Settings shared by formula, count, rollup and lookup columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaOptions {
    pub formula: String,
    pub formula_type: FormulaType,
    /// Element type when `formula_type` is `array`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_formula_type: Option<FormulaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub number_decimal_places: u8,
    #[serde(default)]
    pub duration_format: DurationFormat,
    #[serde(default)]
    pub date_format: DateFormat,
    #[serde(default)]
    pub date_include_time: bool,
    #[serde(default)]
    pub date_time_format: TimeFormat,
    #[serde(default)]
    pub date_show_tzinfo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_force_timezone: Option<String>,
}

impl FormulaOptions {
    /// A formula with the given result type and default rendering
    pub fn new(formula: impl Into<String>, formula_type: FormulaType) -> Self {
        Self {
            formula: formula.into(),
            formula_type,
            array_formula_type: None,
            error: None,
            number_decimal_places: 0,
            duration_format: DurationFormat::default(),
            date_format: DateFormat::default(),
            date_include_time: false,
            date_time_format: TimeFormat::default(),
            date_show_tzinfo: false,
            date_force_timezone: None,
        }
    }
}

/// One option of a select column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOptionConfig {
    /// Set when changing an existing option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub value: String,
    #[serde(default = "random_color")]
    pub color: String,
}

impl SelectOptionConfig {
    /// A new option with a random color
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: None,
            value: value.into(),
            color: random_color(),
        }
    }

    /// Use a specific color
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Minimum difference between any two channels of a random color
const MIN_CHANNEL_DELTA: i16 = 30;

/// A random `#rrggbb` color whose channels differ pairwise by at least 30
///
/// Keeps generated colors away from greys.
pub fn random_color() -> String {
    let mut rng = rand::thread_rng();
    loop {
        let [red, green, blue]: [u8; 3] = rng.gen();
        let (r, g, b) = (i16::from(red), i16::from(green), i16::from(blue));
        if (r - g).abs() >= MIN_CHANNEL_DELTA
            && (g - b).abs() >= MIN_CHANNEL_DELTA
            && (r - b).abs() >= MIN_CHANNEL_DELTA
        {
            return format!("#{red:02x}{green:02x}{blue:02x}");
        }
    }
}
