//! The five output streams and their column inventories

use super::types::FieldType::{Integer as Int, JsonBlob as Json, Number as Num, String as Str};
use super::types::{FieldType, JsonSchema};
use serde::Serialize;
use serde_json::Value;

const HOTEL_FIELDS: &[(&str, FieldType)] = &[
    ("hotel_id", Int),
    ("hotel_url", Str),
    ("hotel_reviews_snapshot_url", Str),
    ("hotel_json", Json),
    ("name", Str),
    ("slug", Str),
    ("logo", Str),
    ("url", Str),
    ("address1", Str),
    ("address2", Str),
    ("city", Str),
    ("state", Str),
    ("postal_code", Str),
    ("country", Str),
    ("trip_advisor_id", Int),
    ("revinate_purchase_uri", Str),
    ("revinate_login_uri", Str),
    ("account_type", Str),
    ("links_json", Json),
];

const REVIEW_FIELDS: &[(&str, FieldType)] = &[
    ("review_id", Int),
    ("review_url", Str),
    ("review_json", Json),
    ("hotel_id", Int),
    ("hotel_url", Str),
    ("title", Str),
    ("body", Str),
    ("author", Str),
    ("author_location", Str),
    ("date_review", Int),
    ("date_collected", Int),
    ("updated_at", Int),
    ("rating", Num),
    ("nps", Int),
    ("review_site_json", Json),
    ("review_site_id", Int),
    ("review_site_url", Str),
    ("review_site_name", Str),
    ("review_site_main_url", Str),
    ("review_site_slug", Str),
    ("language_json", Json),
    ("language_id", Int),
    ("language_url", Str),
    ("language_name", Str),
    ("language_english_name", Str),
    ("language_slug", Str),
    ("crawled_url", Str),
    ("subratings_json", Json),
    ("subratings_cleanliness", Num),
    ("subratings_hotel_condition", Num),
    ("subratings_rooms", Num),
    ("subratings_service", Num),
    ("trip_type", Str),
    ("guest_stay_json", Json),
    ("survey_topics_json", Json),
    ("response_json", Json),
    ("links_json", Json),
];

const SNAPSHOT_FIELDS: &[(&str, FieldType)] = &[
    ("hotel_id", Int),
    ("hotel_reviews_snapshot_url", Str),
    ("hotel_reviews_snapshot_json", Json),
    ("snapshot_start_date", Int),
    ("snapshot_end_date", Int),
    ("aggregate_values_json", Json),
    ("aggregate_average_rating", Num),
    ("aggregate_new_reviews", Num),
    ("aggregate_pos_reviews_pct", Num),
    ("aggregate_trip_advisor_market_ranking", Int),
    ("aggregate_trip_advisor_market_ranking_pctl", Num),
    ("aggregate_trip_advisor_market_size", Int),
    ("values_by_review_site_json", Json),
    ("values_by_time_json", Json),
    ("links_json", Json),
];

const SNAPSHOT_BY_SITE_FIELDS: &[(&str, FieldType)] = &[
    ("hotel_id", Int),
    ("hotel_reviews_snapshot_url", Str),
    ("site_json", Json),
    ("snapshot_start_date", Int),
    ("snapshot_end_date", Int),
    ("review_site_json", Json),
    ("review_site_id", Int),
    ("review_site_url", Str),
    ("review_site_name", Str),
    ("review_site_main_url", Str),
    ("review_site_slug", Str),
    ("values_json", Json),
    ("site_average_rating", Num),
    ("site_new_reviews", Num),
    ("site_pos_reviews_pct", Num),
    ("site_trip_advisor_market_ranking", Int),
    ("site_trip_advisor_market_ranking_pctl", Num),
    ("site_trip_advisor_market_size", Int),
];

const SNAPSHOT_BY_TIME_FIELDS: &[(&str, FieldType)] = &[
    ("hotel_id", Int),
    ("hotel_reviews_snapshot_url", Str),
    ("time_period_json", Json),
    ("unix_time", Int),
    ("values_json", Json),
    ("snapshot_average_rating", Num),
    ("snapshot_new_reviews", Num),
    ("snapshot_pos_reviews_pct", Num),
    ("snapshot_trip_advisor_market_ranking", Int),
    ("snapshot_trip_advisor_market_ranking_pctl", Num),
    ("snapshot_trip_advisor_market_size", Int),
];

/// Output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Hotels,
    Reviews,
    HotelReviewsSnapshot,
    HotelReviewsSnapshotBySite,
    HotelReviewsSnapshotByTime,
}

impl Stream {
    /// Every stream, in declaration order
    pub const ALL: [Stream; 5] = [
        Stream::Hotels,
        Stream::Reviews,
        Stream::HotelReviewsSnapshot,
        Stream::HotelReviewsSnapshotBySite,
        Stream::HotelReviewsSnapshotByTime,
    ];

    /// Stream name on the wire
    pub fn name(self) -> &'static str {
        match self {
            Stream::Hotels => "hotels",
            Stream::Reviews => "reviews",
            Stream::HotelReviewsSnapshot => "hotel_reviews_snapshot",
            Stream::HotelReviewsSnapshotBySite => "hotel_reviews_snapshot_by_site",
            Stream::HotelReviewsSnapshotByTime => "hotel_reviews_snapshot_by_time",
        }
    }

    /// Look a stream up by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Primary key columns
    pub fn key_properties(self) -> &'static [&'static str] {
        match self {
            Stream::Hotels => &["hotel_id"],
            Stream::Reviews => &["review_id"],
            Stream::HotelReviewsSnapshot => &["hotel_id", "snapshot_start_date"],
            Stream::HotelReviewsSnapshotBySite => {
                &["hotel_id", "review_site_id", "snapshot_start_date"]
            }
            Stream::HotelReviewsSnapshotByTime => &["hotel_id", "unix_time"],
        }
    }

    /// Column names and types, in row order
    pub fn fields(self) -> &'static [(&'static str, FieldType)] {
        match self {
            Stream::Hotels => HOTEL_FIELDS,
            Stream::Reviews => REVIEW_FIELDS,
            Stream::HotelReviewsSnapshot => SNAPSHOT_FIELDS,
            Stream::HotelReviewsSnapshotBySite => SNAPSHOT_BY_SITE_FIELDS,
            Stream::HotelReviewsSnapshotByTime => SNAPSHOT_BY_TIME_FIELDS,
        }
    }

    /// JSON schema of the stream's rows
    ///
    /// Every column is always present in a flattened row, so all of them
    /// are required.
    pub fn schema(self) -> JsonSchema {
        let mut schema = JsonSchema::new().with_title(self.name());
        for (name, field_type) in self.fields() {
            schema.add_property(name, field_type.property());
            schema.add_required(name);
        }
        schema
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalog entry printed by discovery
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub stream: &'static str,
    pub tap_stream_id: &'static str,
    pub schema: JsonSchema,
    pub key_properties: &'static [&'static str],
}

/// Discovery catalog
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Catalog of every stream
    pub fn discover() -> Self {
        let streams = Stream::ALL
            .into_iter()
            .map(|stream| CatalogEntry {
                stream: stream.name(),
                tap_stream_id: stream.name(),
                schema: stream.schema(),
                key_properties: stream.key_properties(),
            })
            .collect();
        Self { streams }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
