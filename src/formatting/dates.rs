// src/formatting/dates.rs
//! Locale-aware rendering of CMS timestamps.
//!
//! Patterns use date-fns style tokens (`dd MMM yyyy`) and are translated
//! to chrono format strings before localized formatting. Locale and UTC
//! offset belong to the formatter instance; nothing is read from globals.

use crate::error::AppError;
use crate::types::ValidationError;
use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc, Weekday};
use std::fmt;
use std::str::FromStr;

/// Locales the blog can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLocale {
    #[default]
    PtBr,
    EnUs,
}

impl DisplayLocale {
    /// BCP 47 language tag.
    pub fn tag(&self) -> &'static str {
        match self {
            DisplayLocale::PtBr => "pt-BR",
            DisplayLocale::EnUs => "en-US",
        }
    }

    /// Whether the locale has AM/PM markers; pt-BR clocks are 24-hour only.
    pub fn uses_meridiem(&self) -> bool {
        matches!(self, DisplayLocale::EnUs)
    }

    fn chrono_locale(&self) -> chrono::Locale {
        match self {
            DisplayLocale::PtBr => chrono::Locale::pt_BR,
            DisplayLocale::EnUs => chrono::Locale::en_US,
        }
    }

    /// Pattern for the "last edited" line on post pages.
    pub fn edited_pattern(&self) -> &'static str {
        match self {
            DisplayLocale::PtBr => "'editado em' dd MMM yyyy', às' HH:mm",
            DisplayLocale::EnUs => "'edited on' dd MMM yyyy', at' HH:mm",
        }
    }

    fn relative_pattern(&self, distance: CalendarDistance, weekday: Weekday) -> &'static str {
        use CalendarDistance::*;
        match (self, distance) {
            (DisplayLocale::PtBr, LastWeek) => match weekday {
                Weekday::Sat | Weekday::Sun => "'último' EEEE 'às' HH:mm",
                _ => "'última' EEEE 'às' HH:mm",
            },
            (DisplayLocale::PtBr, Yesterday) => "'ontem às' HH:mm",
            (DisplayLocale::PtBr, Today) => "'hoje às' HH:mm",
            (DisplayLocale::PtBr, Tomorrow) => "'amanhã às' HH:mm",
            (DisplayLocale::PtBr, NextWeek) => "EEEE 'às' HH:mm",
            (DisplayLocale::PtBr, Other) => "dd/MM/yyyy",
            (DisplayLocale::EnUs, LastWeek) => "'last' EEEE 'at' HH:mm",
            (DisplayLocale::EnUs, Yesterday) => "'yesterday at' HH:mm",
            (DisplayLocale::EnUs, Today) => "'today at' HH:mm",
            (DisplayLocale::EnUs, Tomorrow) => "'tomorrow at' HH:mm",
            (DisplayLocale::EnUs, NextWeek) => "EEEE 'at' HH:mm",
            (DisplayLocale::EnUs, Other) => "MM/dd/yyyy",
        }
    }
}

impl FromStr for DisplayLocale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "pt-br" | "pt" => Ok(DisplayLocale::PtBr),
            "en-us" | "en" => Ok(DisplayLocale::EnUs),
            _ => Err(ValidationError::UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for DisplayLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Distance between two calendar days, bucketed for relative phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalendarDistance {
    LastWeek,
    Yesterday,
    Today,
    Tomorrow,
    NextWeek,
    Other,
}

impl CalendarDistance {
    fn from_days(days: i64) -> Self {
        match days {
            d if d < -6 => CalendarDistance::Other,
            d if d < -1 => CalendarDistance::LastWeek,
            -1 => CalendarDistance::Yesterday,
            0 => CalendarDistance::Today,
            1 => CalendarDistance::Tomorrow,
            d if d < 7 => CalendarDistance::NextWeek,
            _ => CalendarDistance::Other,
        }
    }
}

/// Formats timestamps for one locale and display offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    locale: DisplayLocale,
    offset: FixedOffset,
}

impl DateFormatter {
    /// A formatter that displays times in UTC.
    pub fn new(locale: DisplayLocale) -> Self {
        Self {
            locale,
            offset: Utc.fix(),
        }
    }

    /// Displays times shifted by `minutes` east of UTC.
    pub fn with_utc_offset_minutes(self, minutes: i32) -> Result<Self, ValidationError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ValidationError::InvalidUtcOffset(minutes))?;
        Ok(Self { offset, ..self })
    }

    pub fn locale(&self) -> DisplayLocale {
        self.locale
    }

    /// Formats `timestamp` with a date-fns style `pattern`.
    ///
    /// A meridiem token (`a`) is rejected for locales without AM/PM markers.
    pub fn format_absolute(&self, timestamp: &str, pattern: &str) -> Result<String, AppError> {
        let format = self.localized_format(pattern)?;
        let moment = parse_timestamp(timestamp)?.with_timezone(&self.offset);
        Ok(moment
            .format_localized(&format, self.locale.chrono_locale())
            .to_string())
    }

    /// Describes `timestamp` relative to `reference` ("yesterday at 14:00").
    ///
    /// `reference` defaults to the current time.
    pub fn format_relative(
        &self,
        timestamp: &str,
        reference: Option<DateTime<Utc>>,
    ) -> Result<String, AppError> {
        let moment = parse_timestamp(timestamp)?.with_timezone(&self.offset);
        let reference = reference.unwrap_or_else(Utc::now).with_timezone(&self.offset);

        let days = (moment.date_naive() - reference.date_naive()).num_days();
        let pattern = self
            .locale
            .relative_pattern(CalendarDistance::from_days(days), moment.weekday());

        let format = self.localized_format(pattern)?;
        Ok(moment
            .format_localized(&format, self.locale.chrono_locale())
            .to_string())
    }

    fn localized_format(&self, pattern: &str) -> Result<String, AppError> {
        let translated = translate(pattern)?;
        if translated.meridiem && !self.locale.uses_meridiem() {
            return Err(AppError::InvalidDatePattern {
                pattern: pattern.to_string(),
                reason: format!("{} has no AM/PM marker", self.locale),
            });
        }
        Ok(translated.format)
    }

    /// The "last edited" line shown on post pages.
    pub fn format_edited(&self, timestamp: &str) -> Result<String, AppError> {
        self.format_absolute(timestamp, self.locale.edited_pattern())
    }

    /// Display helper: formats when possible, otherwise returns an empty string.
    ///
    /// Unpublished documents (`None`) are silently blank; unparseable
    /// timestamps are logged.
    pub fn format_or_placeholder(&self, timestamp: Option<&str>, pattern: &str) -> String {
        let Some(timestamp) = timestamp else {
            return String::new();
        };
        match self.format_absolute(timestamp, pattern) {
            Ok(formatted) => formatted,
            Err(e) => {
                log::warn!("Showing placeholder date: {}", e);
                String::new()
            }
        }
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(DisplayLocale::default())
    }
}

/// Parses RFC 3339 timestamps and the CMS variant without an offset colon.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, AppError> {
    let trimmed = input.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|_| AppError::InvalidTimestamp {
            input: input.to_string(),
        })
}

/// Translates a date-fns style pattern into a chrono format string.
///
/// Text between single quotes is literal and `''` is a literal quote.
/// Any other unquoted ASCII letter must be a known token.
pub fn translate_pattern(pattern: &str) -> Result<String, AppError> {
    translate(pattern).map(|translated| translated.format)
}

struct Translated {
    format: String,
    meridiem: bool,
}

fn translate(pattern: &str) -> Result<Translated, AppError> {
    let invalid = |reason: String| AppError::InvalidDatePattern {
        pattern: pattern.to_string(),
        reason,
    };

    let chars: Vec<char> = pattern.chars().collect();
    let mut output = String::with_capacity(pattern.len() * 2);
    let mut meridiem = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                output.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => return Err(invalid("unterminated quoted literal".to_string())),
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        output.push('\'');
                        j += 2;
                    }
                    Some('\'') => break,
                    Some(&literal) => {
                        push_literal(literal, &mut output);
                        j += 1;
                    }
                }
            }
            i = j + 1;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let run = chars[i..].iter().take_while(|&&other| other == c).count();
            let spec = token_spec(c, run)
                .ok_or_else(|| invalid(format!("unsupported token '{}'", c.to_string().repeat(run))))?;
            output.push_str(spec);
            meridiem |= c == 'a';
            i += run;
            continue;
        }

        push_literal(c, &mut output);
        i += 1;
    }

    Ok(Translated {
        format: output,
        meridiem,
    })
}

fn push_literal(c: char, output: &mut String) {
    if c == '%' {
        output.push_str("%%");
    } else {
        output.push(c);
    }
}

fn token_spec(token: char, run: usize) -> Option<&'static str> {
    let spec = match (token, run) {
        ('y', 2) => "%y",
        ('y', 1 | 3 | 4) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', 4) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('E' | 'e', 1..=3) => "%a",
        ('E' | 'e', 4) => "%A",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('a', 1..=3) => "%p",
        _ => return None,
    };
    Some(spec)
}
