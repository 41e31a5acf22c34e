//! Normalisation of raw server payloads into [`MediaMetadata`].
//!
//! Parsing is total: a missing or unparseable field leaves the matching
//! output field empty and never fails the whole record.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::debug;

use super::provider::{MediaMetadata, Person, RawMetadataPayload};

/// chrono form of `yyyy-MM-dd HH:mm:ss`.
const CREATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Glyph whose count inside the tag string encodes a rating.
const STAR: char = '★';

/// Converts [`RawMetadataPayload`] values into [`MediaMetadata`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataParser;

impl MetadataParser {
    pub fn new() -> Self {
        Self
    }

    /// Normalise a raw payload.
    ///
    /// `production_year` is only ever taken from the parsed `create_time`;
    /// merging in a year the host already knows is up to the caller.
    pub fn parse(&self, raw: &RawMetadataPayload) -> MediaMetadata {
        let premiere_date = raw.create_time.as_deref().and_then(parse_create_time);
        let tags = raw.tag_string.as_deref().map(split_tags).unwrap_or_default();
        let cast = raw
            .artist_string
            .as_deref()
            .map(split_artists)
            .unwrap_or_default();
        let rating = raw.tag_string.as_deref().and_then(community_rating);

        let metadata = MediaMetadata {
            title: raw.title.clone().unwrap_or_default(),
            overview: non_empty(raw.summary.as_deref()),
            premiere_date,
            production_year: premiere_date.map(|d| d.year()),
            studios: non_empty(raw.studio.as_deref()).into_iter().collect(),
            tags,
            cast,
            community_rating: rating,
            critic_rating: raw.score,
            poster_url: non_empty(raw.poster_url.as_deref()),
        };

        debug!(
            title = %metadata.title,
            premiere_date = ?metadata.premiere_date,
            tags = metadata.tags.len(),
            cast = metadata.cast.len(),
            community_rating = ?metadata.community_rating,
            critic_rating = ?metadata.critic_rating,
            "Parsed metadata payload"
        );

        metadata
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parse a `yyyy-MM-dd HH:mm:ss` timestamp into its calendar date.
///
/// The shape is checked strictly (fixed-width digits, no surrounding
/// whitespace) before chrono validates the calendar values. Leap seconds
/// and year 0000 are rejected.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wbprovider::metadata::parser::parse_create_time;
///
/// assert_eq!(
///     parse_create_time("2020-05-01 12:30:00"),
///     NaiveDate::from_ymd_opt(2020, 5, 1)
/// );
/// assert_eq!(parse_create_time("2024-13-40 00:00:00"), None);
/// assert_eq!(parse_create_time("2020-05-01"), None);
/// ```
pub fn parse_create_time(value: &str) -> Option<NaiveDate> {
    if !has_create_time_shape(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, CREATE_TIME_FORMAT)
        .ok()
        // chrono reports `:60` as second 59 with an overflowing nanosecond
        .filter(|dt| dt.nanosecond() < 1_000_000_000 && dt.year() >= 1)
        .map(|dt| dt.date())
}

fn has_create_time_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

/// Year of a `yyyy-MM-dd HH:mm:ss` timestamp, by the same rule as
/// [`parse_create_time`].
pub fn production_year(create_time: Option<&str>) -> Option<i32> {
    create_time.and_then(parse_create_time).map(|d| d.year())
}

/// Split a comma-separated tag string, dropping empty segments.
pub fn split_tags(tag_string: &str) -> Vec<String> {
    tag_string
        .split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a whitespace-separated artist string into actors.
pub fn split_artists(artist_string: &str) -> Vec<Person> {
    artist_string.split_whitespace().map(Person::actor).collect()
}

/// Rating derived from the number of `★` glyphs anywhere in the tag string.
///
/// One to five stars map to 2.0 through 10.0; any other count yields `None`.
pub fn community_rating(tag_string: &str) -> Option<f32> {
    match tag_string.chars().filter(|c| *c == STAR).count() {
        1 => Some(2.0),
        2 => Some(4.0),
        3 => Some(6.0),
        4 => Some(8.0),
        5 => Some(10.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::provider::PersonType;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn create_time_valid() {
        assert_eq!(parse_create_time("2020-05-01 00:00:00"), date(2020, 5, 1));
        assert_eq!(parse_create_time("1999-12-31 23:59:59"), date(1999, 12, 31));
        assert_eq!(parse_create_time("2024-02-29 08:15:00"), date(2024, 2, 29));
    }

    #[test]
    fn create_time_invalid() {
        for input in [
            "",
            "2024-13-40 00:00:00",
            "2023-02-29 00:00:00",
            "2020-05-01",
            "2020-5-1 00:00:00",
            "2020/05/01 00:00:00",
            "2020-05-01T00:00:00",
            " 2020-05-01 00:00:00",
            "2020-05-01 00:00:00 ",
            "2020-05-01 24:00:00",
            "2020-05-01 23:59:60",
            "0000-01-01 00:00:00",
            "abcd-ef-gh ij:kl:mn",
        ] {
            assert_eq!(parse_create_time(input), None, "input: {input:?}");
        }
    }

    #[test]
    fn production_year_follows_date_rule() {
        assert_eq!(production_year(Some("2011-03-04 10:00:00")), Some(2011));
        assert_eq!(production_year(Some("2011-03-04")), None);
        assert_eq!(production_year(None), None);
        assert_eq!(production_year(Some("2020-05-01 23:59:60")), None);
        assert_eq!(production_year(Some("0000-06-01 00:00:00")), None);
        assert_eq!(production_year(Some("0001-01-01 00:00:00")), Some(1));
    }

    #[test]
    fn leap_second_timestamp_alone_is_no_content() {
        let raw = RawMetadataPayload {
            create_time: Some("2020-05-01 23:59:60".into()),
            ..Default::default()
        };
        let metadata = MetadataParser::new().parse(&raw);
        assert_eq!(metadata.premiere_date, None);
        assert_eq!(metadata.production_year, None);
        assert!(!metadata.has_content());
    }

    #[test]
    fn star_count_to_rating() {
        let expected = [None, Some(2.0), Some(4.0), Some(6.0), Some(8.0), Some(10.0), None];
        for (stars, want) in expected.iter().enumerate() {
            let tags = format!("Drama,{},Tokyo", STAR.to_string().repeat(stars));
            assert_eq!(community_rating(&tags), *want, "stars: {stars}");
        }
    }

    #[test]
    fn stars_counted_across_segments() {
        assert_eq!(community_rating("★,★★,Action★"), Some(8.0));
        assert_eq!(community_rating(""), None);
        assert_eq!(community_rating("☆☆☆"), None);
    }

    #[test]
    fn tags_split_and_round_trip() {
        assert_eq!(split_tags("a,,b,"), vec!["a", "b"]);
        assert!(split_tags("").is_empty());
        assert_eq!(split_tags(" a , b"), vec![" a ", " b"]);

        let joined = "Action,Drama,★★★";
        assert_eq!(split_tags(joined).join(","), joined);
    }

    #[test]
    fn artists_split_on_whitespace() {
        let cast = split_artists("  Alice   Bob\tCarol ");
        let names: Vec<&str> = cast.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        assert!(cast.iter().all(|p| p.role == PersonType::Actor));
    }

    #[test]
    fn parse_full_payload() {
        let raw = RawMetadataPayload {
            title: Some("Foo".into()),
            create_time: Some("2020-05-01 00:00:00".into()),
            tag_string: Some("Action,★★★".into()),
            artist_string: Some("Alice Bob".into()),
            ..Default::default()
        };
        let metadata = MetadataParser::new().parse(&raw);

        assert_eq!(metadata.title, "Foo");
        assert_eq!(metadata.premiere_date, date(2020, 5, 1));
        assert_eq!(metadata.production_year, Some(2020));
        assert_eq!(metadata.tags, vec!["Action", "★★★"]);
        assert_eq!(metadata.community_rating, Some(6.0));
        assert_eq!(metadata.cast, vec![Person::actor("Alice"), Person::actor("Bob")]);
        assert!(metadata.studios.is_empty());
        assert_eq!(metadata.poster_url, None);
    }

    #[test]
    fn parse_studio_score_and_poster() {
        let raw = RawMetadataPayload {
            studio: Some("Studio X".into()),
            score: Some(4.5),
            poster_url: Some(r"\\shun920\av\p.jpg".into()),
            ..Default::default()
        };
        let metadata = MetadataParser::new().parse(&raw);
        assert_eq!(metadata.studios, vec!["Studio X"]);
        assert_eq!(metadata.critic_rating, Some(4.5));
        assert_eq!(metadata.poster_url.as_deref(), Some(r"\\shun920\av\p.jpg"));
        assert!(metadata.has_content());
    }

    #[test]
    fn parse_empty_strings_leave_fields_absent() {
        let raw = RawMetadataPayload {
            studio: Some(String::new()),
            poster_url: Some(String::new()),
            tag_string: Some(String::new()),
            artist_string: Some("   ".into()),
            create_time: Some(String::new()),
            summary: Some(String::new()),
            ..Default::default()
        };
        let metadata = MetadataParser::new().parse(&raw);
        assert!(metadata.studios.is_empty());
        assert_eq!(metadata.overview, None);
        assert_eq!(metadata.poster_url, None);
        assert!(metadata.tags.is_empty());
        assert!(metadata.cast.is_empty());
        assert_eq!(metadata.production_year, None);
        assert!(!metadata.has_content());
    }
}
