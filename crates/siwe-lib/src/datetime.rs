//! Calendar validation of RFC 3339 timestamps.
//!
//! The grammar only checks the shape (`2021-13-45T25:61:00Z` is well-formed);
//! this module rejects dates and times that do not exist.

/// A `date-time` split into its fields. The fraction of a second is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// 0 to 59; leap seconds are rejected.
    pub second: u8,
    /// Signed UTC offset in minutes; 0 for `Z`.
    pub offset_minutes: i16,
}

impl DateTime {
    /// Parse `YYYY-MM-DDTHH:MM:SS[.fff](Z|+HH:MM|-HH:MM)`.
    ///
    /// `T` and `Z` are case-insensitive. Returns `None` for malformed text and
    /// for values outside the calendar.
    pub fn parse(text: &str) -> Option<Self> {
        let b = text.as_bytes();
        if b.len() < 20 {
            return None;
        }

        let year = digits(b, 0, 4)? as u16;
        expect(b, 4, b'-')?;
        let month = digits(b, 5, 2)? as u8;
        expect(b, 7, b'-')?;
        let day = digits(b, 8, 2)? as u8;
        if !b[10].eq_ignore_ascii_case(&b'T') {
            return None;
        }
        let hour = digits(b, 11, 2)? as u8;
        expect(b, 13, b':')?;
        let minute = digits(b, 14, 2)? as u8;
        expect(b, 16, b':')?;
        let second = digits(b, 17, 2)? as u8;

        let mut pos = 19;
        if b[pos] == b'.' {
            let frac = b[pos + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
            if frac == 0 {
                return None;
            }
            pos += 1 + frac;
        }

        let offset_minutes = match b.get(pos..)? {
            [z] if z.eq_ignore_ascii_case(&b'Z') => 0,
            [sign @ (b'+' | b'-'), rest @ ..] if rest.len() == 5 => {
                let hours = digits(rest, 0, 2)?;
                expect(rest, 2, b':')?;
                let minutes = digits(rest, 3, 2)?;
                if hours > 23 || minutes > 59 {
                    return None;
                }
                let total = (hours * 60 + minutes) as i16;
                if *sign == b'-' { -total } else { total }
            }
            _ => return None,
        };

        let valid = (1..=12).contains(&month)
            && day >= 1
            && day <= days_in_month(year, month)
            && hour <= 23
            && minute <= 59
            && second <= 59;

        valid.then_some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            offset_minutes,
        })
    }
}

/// True iff `text` is a well-formed timestamp naming a real instant.
pub fn is_valid_date_time(text: &str) -> bool {
    DateTime::parse(text).is_some()
}

pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn digits(b: &[u8], at: usize, len: usize) -> Option<u32> {
    let window = b.get(at..at + len)?;
    window.iter().try_fold(0u32, |acc, c| {
        c.is_ascii_digit().then(|| acc * 10 + u32::from(c - b'0'))
    })
}

fn expect(b: &[u8], at: usize, want: u8) -> Option<()> {
    (b.get(at) == Some(&want)).then_some(())
}
