// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Time utilities for certificate validation.
//!
//! Certificate validity periods in both UTCTime and GeneralizedTime form, and
//! the [`Clock`] abstraction validators use to obtain "now".
//!
//! # UTCTime Y2K Conversion
//!
//! UTCTime values are interpreted according to RFC 5280:
//! - Years 50-99 are interpreted as 1950-1999
//! - Years 00-49 are interpreted as 2000-2049

use core::cmp::Ordering;
use core::time::Duration;
use der::{
    asn1::{GeneralizedTime, UtcTime},
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Result, Tag, Writer,
};

/// A timestamp that can be either UTCTime or GeneralizedTime.
///
/// RFC 5280 mandates:
/// - UTCTime for dates through 2049
/// - GeneralizedTime for dates in 2050 or later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Time {
    /// UTCTime format (YYMMDDHHMMSSZ)
    UtcTime(UtcTime),
    /// GeneralizedTime format (YYYYMMDDHHMMSSZ)
    GeneralizedTime(GeneralizedTime),
}

impl Time {
    /// Creates a GeneralizedTime from seconds since the Unix epoch.
    pub fn from_unix_duration(duration: Duration) -> Result<Self> {
        Ok(Time::GeneralizedTime(GeneralizedTime::from_unix_duration(
            duration,
        )?))
    }

    /// Midnight UTC on the given calendar day.
    pub fn from_date(year: u16, month: u8, day: u8) -> Result<Self> {
        let dt = der::DateTime::new(year, month, day, 0, 0, 0)?;
        Ok(Time::GeneralizedTime(GeneralizedTime::from_date_time(dt)))
    }

    /// Returns the DateTime representation.
    pub fn to_date_time(&self) -> der::DateTime {
        match self {
            Time::UtcTime(utc) => utc.to_date_time(),
            Time::GeneralizedTime(gen) => gen.to_date_time(),
        }
    }

    pub fn unix_duration(&self) -> Duration {
        self.to_date_time().unix_duration()
    }

    /// Whole UTC days since 1970-01-01.
    pub fn days_since_epoch(&self) -> u64 {
        self.unix_duration().as_secs() / 86_400
    }

    /// Returns this time shifted forward by `secs` seconds.
    pub fn add_seconds(&self, secs: u64) -> Result<Self> {
        Self::from_unix_duration(self.unix_duration() + Duration::from_secs(secs))
    }

    /// Checks if this time is before another time.
    pub fn is_before(&self, other: &Time) -> bool {
        let self_dt = self.to_date_time();
        let other_dt = other.to_date_time();
        self_dt.unix_duration() < other_dt.unix_duration()
    }

    /// Checks if this time is after another time.
    pub fn is_after(&self, other: &Time) -> bool {
        let self_dt = self.to_date_time();
        let other_dt = other.to_date_time();
        self_dt.unix_duration() > other_dt.unix_duration()
    }

    /// Checks if this time is before or equal to another time.
    pub fn is_before_or_equal(&self, other: &Time) -> bool {
        let self_dt = self.to_date_time();
        let other_dt = other.to_date_time();
        self_dt.unix_duration() <= other_dt.unix_duration()
    }

    /// Checks if this time is after or equal to another time.
    pub fn is_after_or_equal(&self, other: &Time) -> bool {
        let self_dt = self.to_date_time();
        let other_dt = other.to_date_time();
        self_dt.unix_duration() >= other_dt.unix_duration()
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        let self_dt = self.to_date_time();
        let other_dt = other.to_date_time();
        self_dt.unix_duration().cmp(&other_dt.unix_duration())
    }
}

impl<'a> DecodeValue<'a> for Time {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> Result<Self> {
        match header.tag {
            Tag::UtcTime => Ok(Time::UtcTime(UtcTime::decode_value(reader, header)?)),
            Tag::GeneralizedTime => Ok(Time::GeneralizedTime(GeneralizedTime::decode_value(
                reader, header,
            )?)),
            tag => Err(der::Error::from(der::ErrorKind::TagUnexpected {
                expected: Some(Tag::UtcTime),
                actual: tag,
            })),
        }
    }
}

impl EncodeValue for Time {
    fn value_len(&self) -> Result<Length> {
        match self {
            Time::UtcTime(utc) => utc.value_len(),
            Time::GeneralizedTime(gen) => gen.value_len(),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Time::UtcTime(utc) => utc.encode_value(writer),
            Time::GeneralizedTime(gen) => gen.encode_value(writer),
        }
    }
}

impl Encode for Time {
    fn encoded_len(&self) -> Result<Length> {
        match self {
            Time::UtcTime(utc) => utc.encoded_len(),
            Time::GeneralizedTime(gen) => gen.encoded_len(),
        }
    }

    fn encode(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Time::UtcTime(utc) => utc.encode(writer),
            Time::GeneralizedTime(gen) => gen.encode(writer),
        }
    }
}

impl<'a> Decode<'a> for Time {
    fn decode<R: Reader<'a>>(reader: &mut R) -> Result<Self> {
        let header = Header::decode(reader)?;
        Self::decode_value(reader, header)
    }
}

/// Certificate validity period.
///
/// As defined in RFC 5280 Section 4.1.2.5:
/// ```text
/// Validity ::= SEQUENCE {
///     notBefore      Time,
///     notAfter       Time
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    /// The time before which the certificate is not valid.
    pub not_before: Time,
    /// The time after which the certificate is not valid.
    pub not_after: Time,
}

impl Validity {
    /// Creates a new Validity period.
    pub const fn new(not_before: Time, not_after: Time) -> Self {
        Validity {
            not_before,
            not_after,
        }
    }

    /// Checks if the certificate is valid at the given time.
    pub fn is_valid_at(&self, check_time: &Time) -> bool {
        self.not_before.is_before_or_equal(check_time)
            && self.not_after.is_after_or_equal(check_time)
    }

    /// Checks if the validity period is well-formed.
    pub fn is_well_formed(&self) -> bool {
        self.not_before.is_before_or_equal(&self.not_after)
    }
}

impl<'a> DecodeValue<'a> for Validity {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> Result<Self> {
        header.tag.assert_eq(Tag::Sequence)?;
        reader.read_nested(header.length, |reader| {
            let not_before = Time::decode(reader)?;
            let not_after = Time::decode(reader)?;
            Ok(Validity {
                not_before,
                not_after,
            })
        })
    }
}

impl EncodeValue for Validity {
    fn value_len(&self) -> Result<Length> {
        self.not_before.encoded_len()? + self.not_after.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        self.not_before.encode(writer)?;
        self.not_after.encode(writer)?;
        Ok(())
    }
}

impl der::Sequence<'_> for Validity {}

/// Gets current time as X.509 Time.
pub fn current_time() -> Result<Time> {
    #[cfg(feature = "std")]
    {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|_| der::Error::from(der::ErrorKind::DateTime))?;
        Time::from_unix_duration(now)
    }

    #[cfg(not(feature = "std"))]
    {
        Err(der::Error::from(der::ErrorKind::DateTime))
    }
}

/// Source of the validation instant.
///
/// Validators hold a clock instead of a mutable "validation date" so that a
/// fixed instant can be injected for tests without shared mutable state.
pub trait Clock: Send + Sync {
    fn now(&self) -> crate::Result<Time>;
}

/// Wall-clock time (std only; fails on bare targets).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> crate::Result<Time> {
        current_time().map_err(|_| crate::Error::TimeError(crate::error::TimeError::InvalidTime))
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Time);

impl FixedClock {
    pub fn at_unix(secs: u64) -> crate::Result<Self> {
        Ok(FixedClock(Time::from_unix_duration(Duration::from_secs(
            secs,
        ))?))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> crate::Result<Time> {
        Ok(self.0)
    }
}
