//! Date and time utilities.

use std::{cmp::Ordering, marker::PhantomData, ops, time::Duration};

use derive_more::{Debug, Display, Error};
use time::{
    format_description::well_known::Rfc3339, Date, Month, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time of the `Of` kind.
///
/// Kinds prevent mixing up unrelated moments (an expiration with a creation,
/// for example), while [`DateTimeOf::coerce()`] converts between them
/// explicitly.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// UTC moment, truncated to microseconds.
    inner: OffsetDateTime,

    /// Kind of this [`DateTimeOf`].
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Wraps the provided UTC moment.
    const fn wrap(inner: OffsetDateTime) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }

    /// Returns the current moment.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();
        Self::wrap(
            now.replace_microsecond(now.microsecond())
                .expect("microseconds of a valid moment"),
        )
    }

    /// Parses an [RFC 3339] string, normalizing its offset to UTC.
    ///
    /// # Errors
    ///
    /// If the `input` is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        let parsed =
            OffsetDateTime::parse(input, &Rfc3339).map_err(ParseError::Parse)?;
        parsed
            .to_offset(UtcOffset::UTC)
            .replace_microsecond(parsed.microsecond())
            .map(Self::wrap)
            .map_err(ParseError::ComponentRange)
    }

    /// Formats this [`DateTimeOf`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Shifts this [`DateTimeOf`] by the provided number of calendar
    /// `months`, keeping the day of month and the time of day.
    ///
    /// Days the target month doesn't have spill over into the next one, so
    /// January 31 plus one month is March 2 or 3.
    ///
    /// [`None`] is returned if the result is out of the representable range.
    #[must_use]
    pub fn checked_add_months(self, months: u32) -> Option<Self> {
        let date = self.inner.date();

        let index = i64::from(date.year()) * 12
            + i64::from(u8::from(date.month()) - 1)
            + i64::from(months);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month =
            Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?)
                .ok()?;

        let shifted = Date::from_calendar_date(year, month, 1)
            .ok()?
            .checked_add(time::Duration::days(i64::from(date.day()) - 1))?;

        Some(Self::wrap(self.inner.replace_date(shifted)))
    }

    /// Same as [`DateTimeOf::checked_add_months()`], but stops at the latest
    /// representable moment instead of overflowing.
    #[must_use]
    pub fn saturating_add_months(self, months: u32) -> Self {
        self.checked_add_months(months)
            .unwrap_or_else(|| Self::wrap(PrimitiveDateTime::MAX.assume_utc()))
    }

    /// Converts this [`DateTimeOf`] into another kind.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf::wrap(self.inner)
    }
}

/// Error of parsing a [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// String is not an [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    Parse(time::error::Parse),

    /// Parsed moment has an out of range component.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::wrap(self.inner + rhs)
    }
}

impl<Of: ?Sized> ops::Sub<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::wrap(self.inner - rhs)
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! Module providing integration with [`serde`] crate.

    pub mod rfc3339 {
        //! [RFC 3339] string representation of a [`DateTimeOf`], for use
        //! with `#[serde(with = "...")]`.
        //!
        //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

        use serde::{de::Error, Deserialize as _, Deserializer, Serializer};

        use crate::DateTimeOf;

        /// Serializes the [`DateTimeOf`] as an RFC 3339 string.
        ///
        /// # Errors
        ///
        /// If the `serializer` fails.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Of: ?Sized,
        {
            serializer.serialize_str(&dt.to_rfc3339())
        }

        /// Deserializes a [`DateTimeOf`] from an RFC 3339 string.
        ///
        /// # Errors
        ///
        /// If the string is not a valid RFC 3339 date and time.
        pub fn deserialize<'de, D, Of>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            D: Deserializer<'de>,
            Of: ?Sized,
        {
            let s = String::deserialize(deserializer)?;
            DateTimeOf::from_rfc3339(&s).map_err(|e| {
                Error::custom(format!("invalid RFC 3339 date: {e}"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::DateTime;

    fn dt(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    #[test]
    fn rfc3339() {
        let utc = dt("2024-03-01T12:30:00Z");
        assert_eq!(utc.to_rfc3339(), "2024-03-01T12:30:00Z");
        assert_eq!(dt("2024-03-01T15:30:00+03:00"), utc);

        assert!(DateTime::from_rfc3339("2024-03-01").is_err());
        assert!(DateTime::from_rfc3339("yesterday").is_err());
    }

    #[test]
    fn arithmetic_and_ordering() {
        let at = dt("2024-03-01T12:30:00Z");
        let later = at + Duration::from_secs(60);
        let earlier = at - Duration::from_secs(60);

        assert_eq!(later, dt("2024-03-01T12:31:00Z"));
        assert_eq!(earlier, dt("2024-03-01T12:29:00Z"));
        assert!(earlier < at && at < later);
    }

    #[test]
    fn adds_calendar_months() {
        for (from, months, to) in [
            ("2024-03-01T12:30:00Z", 1, "2024-04-01T12:30:00Z"),
            ("2024-04-15T00:00:00Z", 1, "2024-05-15T00:00:00Z"),
            ("2024-12-15T08:00:00Z", 1, "2025-01-15T08:00:00Z"),
            ("2024-11-30T23:59:59Z", 14, "2026-01-30T23:59:59Z"),
            ("2024-01-31T10:00:00Z", 1, "2024-03-02T10:00:00Z"),
            ("2023-01-31T10:00:00Z", 1, "2023-03-03T10:00:00Z"),
            ("2024-05-31T10:00:00Z", 1, "2024-07-01T10:00:00Z"),
            ("2024-05-31T10:00:00Z", 0, "2024-05-31T10:00:00Z"),
        ] {
            assert_eq!(
                dt(from).saturating_add_months(months),
                dt(to),
                "{from} + {months} months",
            );
        }
    }

    #[test]
    fn saturates_at_range_end() {
        let end = dt("9999-12-31T23:59:59Z");

        assert!(end.checked_add_months(1).is_none());
        assert!(end.saturating_add_months(1) >= end);
    }
}
