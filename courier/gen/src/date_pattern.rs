//! Date/time pattern handling.
//!
//! Contracts may declare patterns in the familiar letter style
//! (`yyyy-MM-dd HH:mm:ss`) or directly as chrono/strftime format strings
//! (`%Y-%m-%d`). Letter patterns are translated; anything containing `%` is
//! taken as strftime already.

use crate::errors::DatePatternError;
use crate::model::TemporalKind;

/// Format used for temporal values when neither the parameter nor the
/// contract configures one.
pub const BASELINE_PATTERN: &str = "yyyy-MM-dd'T'HH:mm:ss";

/// A resolved date format: the pattern as declared and its strftime form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pub pattern: String,
    pub strftime: String,
}

impl DateFormat {
    /// Parses a declared pattern.
    ///
    /// ## Examples
    ///
    /// ```
    /// use courier_gen::date_pattern::DateFormat;
    ///
    /// let format = DateFormat::parse("yyyy-MM-dd").unwrap();
    /// assert_eq!(format.strftime, "%Y-%m-%d");
    ///
    /// let format = DateFormat::parse("%d/%m/%Y").unwrap();
    /// assert_eq!(format.strftime, "%d/%m/%Y");
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns a [`DatePatternError`] for empty patterns, letters without a
    /// strftime equivalent and unterminated quotes.
    pub fn parse(pattern: &str) -> Result<Self, DatePatternError> {
        if pattern.trim().is_empty() {
            return Err(DatePatternError::Empty);
        }
        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            translate(pattern)?
        };
        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
        })
    }

    /// The fallback format.
    pub fn baseline() -> Self {
        Self {
            pattern: BASELINE_PATTERN.to_string(),
            strftime: "%Y-%m-%dT%H:%M:%S".to_string(),
        }
    }

    /// Which kinds of fields the format prints.
    pub fn fields(&self) -> DateFields {
        let mut fields = DateFields::default();
        let mut chars = self.strftime.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                continue;
            }
            // skip padding flags, widths, fraction dots and offset colons
            let spec = chars.find(|c| !matches!(*c, '-' | '_' | '0'..='9' | '.' | ':' | '#'));
            match spec {
                Some('Y' | 'C' | 'y' | 'm' | 'b' | 'B' | 'h' | 'd' | 'e' | 'a' | 'A' | 'w' | 'u' | 'U' | 'W'
                | 'G' | 'g' | 'V' | 'j' | 'D' | 'x' | 'F' | 'v') => fields.date = true,
                Some('H' | 'k' | 'I' | 'l' | 'P' | 'p' | 'M' | 'S' | 'f' | 'R' | 'T' | 'X' | 'r') => {
                    fields.time = true
                }
                Some('c' | 's') => {
                    fields.date = true;
                    fields.time = true;
                }
                Some('z' | 'Z') => fields.offset = true,
                Some('+') => {
                    fields.date = true;
                    fields.time = true;
                    fields.offset = true;
                }
                _ => {}
            }
        }
        fields
    }

    /// Whether a value of `kind` can be printed with this format.
    ///
    /// chrono panics when a format asks for a field the value lacks, e.g.
    /// an hour from a `NaiveDate`.
    ///
    /// ```
    /// use courier_gen::date_pattern::DateFormat;
    /// use courier_gen::model::TemporalKind;
    ///
    /// let format = DateFormat::parse("yyyy-MM-dd HH:mm").unwrap();
    /// assert!(format.fits(TemporalKind::DateTime));
    /// assert!(!format.fits(TemporalKind::Date));
    /// ```
    pub fn fits(&self, kind: TemporalKind) -> bool {
        let fields = self.fields();
        match kind {
            TemporalKind::Date => !fields.time && !fields.offset,
            TemporalKind::Time => !fields.date && !fields.offset,
            TemporalKind::DateTime => !fields.offset,
            TemporalKind::Zoned => true,
        }
    }
}

/// Field classes a format prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFields {
    pub date: bool,
    pub time: bool,
    pub offset: bool,
}

fn translate(pattern: &str) -> Result<String, DatePatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is an escaped quote; otherwise copy up to the closing quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            let mut j = i + 1;
            loop {
                match chars.get(j) {
                    None => {
                        return Err(DatePatternError::UnterminatedQuote {
                            pattern: pattern.to_string(),
                        });
                    }
                    Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                        out.push('\'');
                        j += 2;
                    }
                    Some('\'') => break,
                    Some(other) => {
                        out.push(*other);
                        j += 1;
                    }
                }
            }
            i = j + 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let mut count = 1;
        while chars.get(i + count) == Some(&c) {
            count += 1;
        }
        out.push_str(letter(c, count).ok_or_else(|| DatePatternError::UnknownLetter {
            letter: c,
            count,
            pattern: pattern.to_string(),
        })?);
        i += count;
    }

    Ok(out)
}

fn letter(c: char, count: usize) -> Option<&'static str> {
    let strftime = match (c, count) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('D', _) => "%j",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('a', 1) => "%p",
        ('E', 1..=3) => "%a",
        ('E', _) => "%A",
        ('Z', _) => "%z",
        ('X', 3) => "%:z",
        ('X', 1..=2) => "%z",
        ('z', _) => "%Z",
        _ => return None,
    };
    Some(strftime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strftime(pattern: &str) -> String {
        DateFormat::parse(pattern).unwrap().strftime
    }

    #[test]
    fn translates_common_patterns() {
        assert_eq!(strftime("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(strftime("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(strftime("dd/MM/yy"), "%d/%m/%y");
        assert_eq!(strftime("EEE, d MMM yyyy"), "%a, %-d %b %Y");
        assert_eq!(strftime("hh:mm a"), "%I:%M %p");
        assert_eq!(strftime("HH:mm:ss.SSSXXX"), "%H:%M:%S.%3f%:z");
    }

    #[test]
    fn quoted_literals_are_copied() {
        assert_eq!(strftime("yyyy-MM-dd'T'HH:mm"), "%Y-%m-%dT%H:%M");
        assert_eq!(strftime("HH 'o''clock'"), "%H o'clock");
        assert_eq!(strftime("''yy"), "'%y");
    }

    #[test]
    fn strftime_patterns_pass_through() {
        assert_eq!(strftime("%Y%m%d"), "%Y%m%d");
    }

    #[test]
    fn baseline_matches_its_pattern() {
        assert_eq!(strftime(BASELINE_PATTERN), DateFormat::baseline().strftime);
    }

    #[test]
    fn field_classes_follow_the_specifiers() {
        let fields = |pattern: &str| DateFormat::parse(pattern).unwrap().fields();

        assert_eq!(fields("yyyy-MM-dd"), DateFields { date: true, time: false, offset: false });
        assert_eq!(fields("hh:mm a"), DateFields { date: false, time: true, offset: false });
        assert_eq!(fields("HH:mm:ss.SSSXXX"), DateFields { date: false, time: true, offset: true });
        assert_eq!(fields("%s"), DateFields { date: true, time: true, offset: false });
        assert_eq!(fields("%Y%% %-d"), DateFields { date: true, time: false, offset: false });
        assert_eq!(fields("'at' HH"), DateFields { date: false, time: true, offset: false });
    }

    #[test]
    fn formats_fit_only_kinds_carrying_their_fields() {
        let date_time = DateFormat::parse("yyyy-MM-dd HH:mm:ss").unwrap();
        assert!(!date_time.fits(TemporalKind::Date));
        assert!(!date_time.fits(TemporalKind::Time));
        assert!(date_time.fits(TemporalKind::DateTime));
        assert!(date_time.fits(TemporalKind::Zoned));

        let zoned = DateFormat::parse("yyyy-MM-dd'T'HH:mmZ").unwrap();
        assert!(!zoned.fits(TemporalKind::DateTime));
        assert!(zoned.fits(TemporalKind::Zoned));

        let date = DateFormat::parse("EEE, d MMM yyyy").unwrap();
        assert!(date.fits(TemporalKind::Date));
        assert!(!date.fits(TemporalKind::Time));

        assert!(DateFormat::parse("%H:%M").unwrap().fits(TemporalKind::Time));
        assert!(DateFormat::baseline().fits(TemporalKind::DateTime));
    }

    #[test]
    fn rejects_bad_patterns() {
        assert_eq!(DateFormat::parse(" "), Err(DatePatternError::Empty));
        assert!(matches!(
            DateFormat::parse("yyyy-QQ"),
            Err(DatePatternError::UnknownLetter { letter: 'Q', count: 2, .. })
        ));
        assert!(matches!(
            DateFormat::parse("SS"),
            Err(DatePatternError::UnknownLetter { letter: 'S', count: 2, .. })
        ));
        assert!(matches!(
            DateFormat::parse("yyyy'T"),
            Err(DatePatternError::UnterminatedQuote { .. })
        ));
    }
}
