//! Flatten functions, one per output stream

use super::fields::{put, sanitize_text, to_float, to_int, to_text, SubObject};
use super::links::{find_link, parse_snapshot_window, resolve, LinkKind};
use crate::types::FlatRecord;
use serde_json::Value;

/// Hotel-level context shared by a snapshot and its child rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnapshotContext {
    /// Owning hotel
    pub hotel_id: i64,
    /// Snapshot self link
    pub snapshot_url: String,
    /// Window start (Unix seconds)
    pub start_date: i64,
    /// Window end (Unix seconds)
    pub end_date: i64,
}

impl SnapshotContext {
    /// Derive the context from a raw snapshot object
    pub fn from_snapshot(snapshot: &Value, hotel_id: i64) -> Self {
        let snapshot_url = find_link(snapshot, "self").unwrap_or_default();
        let (start_date, end_date) = parse_snapshot_window(snapshot_url);
        Self {
            hotel_id,
            snapshot_url: snapshot_url.to_string(),
            start_date,
            end_date,
        }
    }
}

/// Flatten one `/hotels` item
pub fn flatten_hotel(hotel: &Value) -> FlatRecord {
    let links = SubObject::of(hotel, "links");
    let this = resolve(Some(hotel), "self", LinkKind::Hotel);
    let snapshot = resolve(Some(hotel), "reviewssnapshot", LinkKind::Hotel);

    let mut row = FlatRecord::new();
    put(&mut row, "hotel_id", this.id);
    put(&mut row, "hotel_url", this.url);
    put(&mut row, "hotel_reviews_snapshot_url", snapshot.url);
    put(&mut row, "hotel_json", hotel.to_string());
    for (column, key) in [
        ("name", "name"),
        ("slug", "slug"),
        ("logo", "logo"),
        ("url", "url"),
        ("address1", "address1"),
        ("address2", "address2"),
        ("city", "city"),
        ("state", "state"),
        ("postal_code", "postalCode"),
        ("country", "country"),
        ("revinate_purchase_uri", "revinatePurchaseUri"),
        ("revinate_login_uri", "revinateLoginUri"),
        ("account_type", "accountType"),
    ] {
        put(&mut row, column, to_text(hotel.get(key)));
    }
    put(&mut row, "trip_advisor_id", to_int(hotel.get("tripAdvisorId")));
    put(&mut row, "links_json", links.json());
    row
}

/// Flatten one `/reviews` item
pub fn flatten_review(review: &Value) -> FlatRecord {
    let links = SubObject::of(review, "links");
    let review_site = SubObject::of(review, "reviewSite");
    let language = SubObject::of(review, "language");
    let subratings = SubObject::of(review, "subratings");
    let guest_stay = SubObject::of(review, "guestStay");
    let survey_topics = SubObject::of(review, "surveyTopics");
    let response = SubObject::of(review, "response");

    let this = resolve(Some(review), "self", LinkKind::Review);
    let hotel = resolve(Some(review), "hotel", LinkKind::Hotel);
    let site = resolve(review_site.value(), "self", LinkKind::ReviewSite);
    let lang = resolve(language.value(), "self", LinkKind::Language);

    let mut row = FlatRecord::new();
    put(&mut row, "review_id", this.id);
    put(&mut row, "review_url", this.url);
    put(&mut row, "review_json", review.to_string());
    put(&mut row, "hotel_id", hotel.id);
    put(&mut row, "hotel_url", hotel.url);

    put(&mut row, "title", sanitize_text(&to_text(review.get("title"))));
    put(&mut row, "body", sanitize_text(&to_text(review.get("body"))));
    put(&mut row, "author", to_text(review.get("author")));
    put(&mut row, "author_location", to_text(review.get("authorLocation")));
    put(&mut row, "date_review", to_int(review.get("dateReview")));
    put(&mut row, "date_collected", to_int(review.get("dateCollected")));
    put(&mut row, "updated_at", to_int(review.get("updatedAt")));
    put(&mut row, "rating", to_float(review.get("rating")));
    put(&mut row, "nps", to_int(review.get("nps")));
    put(&mut row, "crawled_url", to_text(review.get("crawledUrl")));
    put(&mut row, "trip_type", to_text(review.get("tripType")));

    put(&mut row, "review_site_json", review_site.json());
    put(&mut row, "review_site_id", site.id);
    put(&mut row, "review_site_url", site.url);
    put(&mut row, "review_site_name", review_site.text("name"));
    put(&mut row, "review_site_main_url", review_site.text("mainUrl"));
    put(&mut row, "review_site_slug", review_site.text("slug"));

    put(&mut row, "language_json", language.json());
    put(&mut row, "language_id", lang.id);
    put(&mut row, "language_url", lang.url);
    put(&mut row, "language_name", language.text("name"));
    put(&mut row, "language_english_name", language.text("englishName"));
    put(&mut row, "language_slug", language.text("slug"));

    put(&mut row, "subratings_json", subratings.json());
    put(&mut row, "subratings_cleanliness", subratings.float("Cleanliness"));
    put(&mut row, "subratings_hotel_condition", subratings.float("Hotel condition"));
    put(&mut row, "subratings_rooms", subratings.float("Rooms"));
    put(&mut row, "subratings_service", subratings.float("Service"));

    put(&mut row, "guest_stay_json", guest_stay.json());
    put(&mut row, "survey_topics_json", survey_topics.json());
    put(&mut row, "response_json", response.json());
    put(&mut row, "links_json", links.json());
    row
}

/// Flatten one `/hotels/{id}/reviewssnapshot` response
pub fn flatten_snapshot(snapshot: &Value, context: &SnapshotContext) -> FlatRecord {
    let links = SubObject::of(snapshot, "links");
    let aggregate = SubObject::of(snapshot, "aggregateValues");
    let by_site = SubObject::of(snapshot, "valuesByReviewSite");
    let by_time = SubObject::of(snapshot, "valuesByTime");

    let mut row = FlatRecord::new();
    put(&mut row, "hotel_id", context.hotel_id);
    put(&mut row, "hotel_reviews_snapshot_url", context.snapshot_url.clone());
    put(&mut row, "hotel_reviews_snapshot_json", snapshot.to_string());
    put(&mut row, "snapshot_start_date", context.start_date);
    put(&mut row, "snapshot_end_date", context.end_date);
    put(&mut row, "aggregate_values_json", aggregate.json());
    put_metrics(&mut row, "aggregate", &aggregate);
    put(&mut row, "values_by_review_site_json", by_site.json());
    put(&mut row, "values_by_time_json", by_time.json());
    put(&mut row, "links_json", links.json());
    row
}

/// Flatten one entry of a snapshot's `valuesByReviewSite`
pub fn flatten_snapshot_by_site(context: &SnapshotContext, site: &Value) -> FlatRecord {
    let review_site = SubObject::of(site, "reviewSite");
    let values = SubObject::of(site, "values");
    let link = resolve(review_site.value(), "self", LinkKind::ReviewSite);

    let mut row = FlatRecord::new();
    put(&mut row, "hotel_id", context.hotel_id);
    put(&mut row, "hotel_reviews_snapshot_url", context.snapshot_url.clone());
    put(&mut row, "site_json", site.to_string());
    put(&mut row, "snapshot_start_date", context.start_date);
    put(&mut row, "snapshot_end_date", context.end_date);
    put(&mut row, "review_site_json", review_site.json());
    put(&mut row, "review_site_id", link.id);
    put(&mut row, "review_site_url", link.url);
    put(&mut row, "review_site_name", review_site.text("name"));
    put(&mut row, "review_site_main_url", review_site.text("mainUrl"));
    put(&mut row, "review_site_slug", review_site.text("slug"));
    put(&mut row, "values_json", values.json());
    put_metrics(&mut row, "site", &values);
    row
}

/// Flatten one entry of a snapshot's `valuesByTime`
pub fn flatten_snapshot_by_time(context: &SnapshotContext, period: &Value) -> FlatRecord {
    let values = SubObject::of(period, "values");

    let mut row = FlatRecord::new();
    put(&mut row, "hotel_id", context.hotel_id);
    put(&mut row, "hotel_reviews_snapshot_url", context.snapshot_url.clone());
    put(&mut row, "time_period_json", period.to_string());
    put(&mut row, "unix_time", to_int(period.get("time")));
    put(&mut row, "values_json", values.json());
    put_metrics(&mut row, "snapshot", &values);
    row
}

/// The six review metrics Porter reports per aggregate, site and period
fn put_metrics(row: &mut FlatRecord, prefix: &str, values: &SubObject<'_>) {
    put(row, &format!("{prefix}_average_rating"), values.float("averageRating"));
    put(row, &format!("{prefix}_new_reviews"), values.float("newReviews"));
    put(row, &format!("{prefix}_pos_reviews_pct"), values.float("posReviewsPct"));
    put(
        row,
        &format!("{prefix}_trip_advisor_market_ranking"),
        values.int("tripadvisorMarketRanking"),
    );
    put(
        row,
        &format!("{prefix}_trip_advisor_market_ranking_pctl"),
        values.float("tripadvisorMarketRankingPctl"),
    );
    put(
        row,
        &format!("{prefix}_trip_advisor_market_size"),
        values.int("tripadvisorMarketSize"),
    );
}

/// Items of a snapshot child collection (`valuesByReviewSite`, `valuesByTime`)
pub fn snapshot_children<'a>(snapshot: &'a Value, key: &str) -> &'a [Value] {
    snapshot
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
