//! Date and time utilities.

use std::{cmp::Ordering, marker::PhantomData, ops, time::Duration};

use derive_more::{Debug, Display, Error};
use time::{format_description::well_known::Rfc3339, UtcOffset};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// Calendar date.
pub type Date = time::Date;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// A [`DateTime`] representing the Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        inner: time::OffsetDateTime::UNIX_EPOCH,
        _of: PhantomData,
    };

    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::ComponentRange)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Returns the calendar [`Date`] of this [`DateTime`] as observed at the
    /// provided [`UtcOffset`].
    #[must_use]
    pub fn date_at(&self, offset: UtcOffset) -> Date {
        self.inner.to_offset(offset).date()
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] has an out of range component.
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

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for time::OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner + rhs,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> ops::Sub for DateTimeOf<Of> {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        (self.inner - rhs.inner)
            .try_into()
            .expect("duration overflow")
    }
}

impl<Of: ?Sized> ops::Sub<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner - rhs,
            _of: PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! Module providing integration with [`serde`] crate.

    pub mod rfc3339 {
        //! Module providing serialization of [`DateTimeOf`] as an [RFC 3339]
        //! string.
        //!
        //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

        use serde::Serializer;

        use super::super::DateTimeOf;

        /// Serializes the [`DateTimeOf`] as an [RFC 3339] string.
        ///
        /// # Errors
        ///
        /// Errors if the underlying [`Serializer`] fails.
        ///
        /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
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

        pub mod option {
            //! Module providing serialization of an optional [`DateTimeOf`]
            //! as a nullable [RFC 3339] string.
            //!
            //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

            use serde::Serializer;

            use super::super::super::DateTimeOf;

            /// Serializes the optional [`DateTimeOf`] as an [RFC 3339]
            /// string or `null`.
            ///
            /// # Errors
            ///
            /// Errors if the underlying [`Serializer`] fails.
            ///
            /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
            pub fn serialize<Of, S>(
                dt: &Option<DateTimeOf<Of>>,
                serializer: S,
            ) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
                Of: ?Sized,
            {
                match dt {
                    Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                    None => serializer.serialize_none(),
                }
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use time::{Month, UtcOffset};

    use super::DateTime;

    #[test]
    fn parses_rfc3339_into_utc() {
        let dt = DateTime::from_rfc3339("2024-03-10T23:30:00+03:00").unwrap();

        assert_eq!(dt.to_rfc3339(), "2024-03-10T20:30:00Z");
        assert!(DateTime::from_rfc3339("10.03.2024").is_err());
    }

    #[test]
    fn resolves_calendar_date_at_offset() {
        let dt = DateTime::from_rfc3339("2024-03-10T22:30:00Z").unwrap();

        let utc = dt.date_at(UtcOffset::UTC);
        assert_eq!((utc.month(), utc.day()), (Month::March, 10));

        let istanbul = dt.date_at(UtcOffset::from_hms(3, 0, 0).unwrap());
        assert_eq!((istanbul.month(), istanbul.day()), (Month::March, 11));
    }

    #[test]
    fn orders_by_instant() {
        let dt = DateTime::from_rfc3339("2024-03-10T12:00:00Z").unwrap();
        let later = dt + Duration::from_micros(1);

        assert!(dt < later);
        assert_eq!(later - dt, Duration::from_micros(1));
        assert_eq!(later - Duration::from_micros(1), dt);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_rfc3339() {
        #[derive(serde::Serialize)]
        struct Moments {
            #[serde(serialize_with = "super::serde::rfc3339::serialize")]
            at: DateTime,
            #[serde(
                serialize_with = "super::serde::rfc3339::option::serialize"
            )]
            due: Option<DateTime>,
            #[serde(
                serialize_with = "super::serde::rfc3339::option::serialize"
            )]
            done: Option<DateTime>,
        }

        let at = DateTime::from_rfc3339("2024-03-10T23:30:00+03:00").unwrap();
        let json = serde_json::to_value(Moments {
            at,
            due: Some(at + Duration::from_secs(3600)),
            done: None,
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "at": "2024-03-10T20:30:00Z",
                "due": "2024-03-10T21:30:00Z",
                "done": null,
            }),
        );
    }
}
