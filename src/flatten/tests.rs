//! Tests for record flattening

use super::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

const BASE: &str = "https://porter.revinate.com";

fn full_review() -> Value {
    json!({
        "title": "Great \"stay\"\r\n",
        "body": "Clean rooms.\nFriendly staff.",
        "author": "Jane",
        "authorLocation": "Oslo",
        "dateReview": 1_699_000_000,
        "dateCollected": 1_699_100_000,
        "updatedAt": 1_700_000_000,
        "rating": 4.5,
        "nps": 9,
        "crawledUrl": "https://reviews.example.com/r/1",
        "tripType": "BUSINESS",
        "subratings": {"Cleanliness": 5, "Hotel condition": 4.5, "Rooms": "4", "Service": 3.0},
        "guestStay": {"nights": 2},
        "surveyTopics": {"breakfast": "good"},
        "response": {"body": "Thanks!"},
        "reviewSite": {
            "name": "TripAdvisor",
            "mainUrl": "https://www.tripadvisor.com",
            "slug": "tripadvisor",
            "links": [{"rel": "self", "href": format!("{BASE}/reviewsites/1")}]
        },
        "language": {
            "name": "Norsk",
            "englishName": "Norwegian",
            "slug": "no",
            "links": [{"rel": "self", "href": format!("{BASE}/languages/12")}]
        },
        "links": [
            {"rel": "self", "href": format!("{BASE}/reviews/42")},
            {"rel": "hotel", "href": format!("{BASE}/hotels/7")}
        ]
    })
}

fn snapshot() -> Value {
    json!({
        "aggregateValues": {
            "averageRating": 4.2,
            "newReviews": 12,
            "posReviewsPct": 0.8,
            "tripadvisorMarketRanking": 3,
            "tripadvisorMarketRankingPctl": 0.95,
            "tripadvisorMarketSize": 120
        },
        "valuesByReviewSite": [
            {
                "reviewSite": {
                    "name": "Expedia",
                    "slug": "expedia",
                    "links": [{"rel": "self", "href": format!("{BASE}/reviewsites/5")}]
                },
                "values": {"averageRating": 4.0, "newReviews": 2}
            }
        ],
        "valuesByTime": [
            {"time": 1_698_796_800, "values": {"averageRating": 4.1, "tripadvisorMarketSize": 118}}
        ],
        "links": [
            {"rel": "self", "href": format!("{BASE}/hotels/7/reviewssnapshot?date=1696118400..1698796800")}
        ]
    })
}

// ============================================================================
// Field coercion
// ============================================================================

#[test_case(json!(7), 7 ; "integer")]
#[test_case(json!(7.9), 7 ; "float truncates")]
#[test_case(json!("12"), 12 ; "numeric string")]
#[test_case(json!("3.5"), 3 ; "float string")]
#[test_case(json!("abc"), 0 ; "garbage string")]
#[test_case(json!(null), 0 ; "null")]
#[test_case(json!({"a": 1}), 0 ; "object")]
fn test_to_int(value: Value, expected: i64) {
    assert_eq!(to_int(Some(&value)), expected);
}

#[test]
fn test_to_float_and_text() {
    assert_eq!(to_float(Some(&json!(4))), 4.0);
    assert_eq!(to_float(Some(&json!("4.25"))), 4.25);
    assert_eq!(to_float(None), 0.0);

    assert_eq!(to_text(Some(&json!("x"))), "x");
    assert_eq!(to_text(Some(&json!(12))), "12");
    assert_eq!(to_text(Some(&json!(true))), "true");
    assert_eq!(to_text(Some(&json!(null))), "");
    assert_eq!(to_text(None), "");
}

#[test]
fn test_sanitize_text() {
    assert_eq!(sanitize_text("a\r\nb\nc"), "abc");
    assert_eq!(sanitize_text(r#"say "hi""#), r#"say \"hi\""#);
    assert_eq!(sanitize_text("plain"), "plain");
    assert_eq!(sanitize_text(r#"C:\path"#), r#"C:\\path"#);
    assert_eq!(sanitize_text(r#"ends \"quoted"#), r#"ends \\\"quoted"#);
}

#[test]
fn test_sub_object_absent_and_null() {
    let source = json!({"present": {"x": 1}, "nulled": null});

    let present = SubObject::of(&source, "present");
    assert!(present.is_present());
    assert_eq!(present.json(), r#"{"x":1}"#);
    assert_eq!(present.int("x"), 1);
    assert_eq!(present.text("missing"), "");

    for key in ["nulled", "absent"] {
        let sub = SubObject::of(&source, key);
        assert!(!sub.is_present());
        assert_eq!(sub.json(), EMPTY_JSON);
        assert_eq!(sub.float("x"), 0.0);
    }
}

// ============================================================================
// Links
// ============================================================================

#[test_case("https://porter.revinate.com/hotels/7", LinkKind::Hotel, 7 ; "plain")]
#[test_case("https://porter.revinate.com/hotels/7/", LinkKind::Hotel, 7 ; "trailing slash")]
#[test_case("https://porter.revinate.com/hotels/7?projection=full", LinkKind::Hotel, 7 ; "query string")]
#[test_case("http://localhost:8080/reviews/42", LinkKind::Review, 42 ; "other host")]
#[test_case("/reviewsites/3", LinkKind::ReviewSite, 3 ; "relative")]
#[test_case("https://porter.revinate.com/review-sites/3", LinkKind::ReviewSite, 3 ; "hyphenated")]
#[test_case("https://porter.revinate.com/reviewSites/3", LinkKind::ReviewSite, 3 ; "camel case")]
#[test_case("https://porter.revinate.com/languages/12", LinkKind::Language, 12 ; "language")]
#[test_case("https://porter.revinate.com/hotels/7/reviewssnapshot", LinkKind::Hotel, 0 ; "not trailing")]
#[test_case("https://porter.revinate.com/hotels/abc", LinkKind::Hotel, 0 ; "non numeric")]
#[test_case("https://porter.revinate.com/reviews/42", LinkKind::Hotel, 0 ; "wrong collection")]
#[test_case("", LinkKind::Review, 0 ; "empty")]
fn test_parse_id(href: &str, kind: LinkKind, expected: i64) {
    assert_eq!(parse_id(href, kind), expected);
}

#[test]
fn test_find_link() {
    let object = json!({"links": [
        {"rel": "hotel", "href": "h"},
        {"rel": "self", "href": "s"}
    ]});
    assert_eq!(find_link(&object, "self"), Some("s"));
    assert_eq!(find_link(&object, "hotel"), Some("h"));
    assert_eq!(find_link(&object, "other"), None);
    assert_eq!(find_link(&json!({"links": {}}), "self"), None);
    assert_eq!(find_link(&json!({}), "self"), None);
}

#[test]
fn test_resolve_missing_object() {
    assert_eq!(resolve(None, "self", LinkKind::Review), LinkRef::default());
}

#[test]
fn test_parse_snapshot_window() {
    assert_eq!(
        parse_snapshot_window("https://x/hotels/7/reviewssnapshot?date=100..200"),
        (100, 200)
    );
    assert_eq!(
        parse_snapshot_window("https://x/hotels/7/reviewssnapshot?a=1&date=100..200&b=2"),
        (100, 200)
    );
    assert_eq!(parse_snapshot_window("https://x/hotels/7/reviewssnapshot"), (0, 0));
    assert_eq!(parse_snapshot_window("?date=abc..200"), (0, 0));
}

// ============================================================================
// Reviews
// ============================================================================

#[test]
fn test_review_example_without_subratings() {
    let review = json!({
        "links": [
            {"rel": "self", "href": ".../reviews/42"},
            {"rel": "hotel", "href": ".../hotels/7"}
        ],
        "updatedAt": 1_700_000_000,
        "rating": 4.5
    });

    let row = flatten_review(&review);
    assert_eq!(row["review_id"], json!(42));
    assert_eq!(row["hotel_id"], json!(7));
    assert_eq!(row["rating"], json!(4.5));
    assert_eq!(row["updated_at"], json!(1_700_000_000));
    assert_eq!(row["subratings_cleanliness"], json!(0.0));
    assert_eq!(row["subratings_json"], json!("{}"));
}

#[test]
fn test_review_full() {
    let row = flatten_review(&full_review());

    assert_eq!(row["review_id"], json!(42));
    assert_eq!(row["review_url"], json!(format!("{BASE}/reviews/42")));
    assert_eq!(row["hotel_id"], json!(7));
    assert_eq!(row["hotel_url"], json!(format!("{BASE}/hotels/7")));
    assert_eq!(row["title"], json!(r#"Great \"stay\""#));
    assert_eq!(row["body"], json!("Clean rooms.Friendly staff."));
    assert_eq!(row["author_location"], json!("Oslo"));
    assert_eq!(row["date_review"], json!(1_699_000_000));
    assert_eq!(row["nps"], json!(9));
    assert_eq!(row["trip_type"], json!("BUSINESS"));

    assert_eq!(row["review_site_id"], json!(1));
    assert_eq!(row["review_site_name"], json!("TripAdvisor"));
    assert_eq!(row["review_site_main_url"], json!("https://www.tripadvisor.com"));
    assert_eq!(row["language_id"], json!(12));
    assert_eq!(row["language_english_name"], json!("Norwegian"));

    assert_eq!(row["subratings_cleanliness"], json!(5.0));
    assert_eq!(row["subratings_hotel_condition"], json!(4.5));
    assert_eq!(row["subratings_rooms"], json!(4.0));
    assert_eq!(row["subratings_service"], json!(3.0));
    assert_eq!(row["guest_stay_json"], json!(r#"{"nights":2}"#));
    assert_eq!(row["response_json"], json!(r#"{"body":"Thanks!"}"#));

    // The original object survives intact
    let roundtrip: Value = serde_json::from_str(row["review_json"].as_str().unwrap()).unwrap();
    assert_eq!(roundtrip, full_review());
}

#[test]
fn test_review_without_any_sub_objects() {
    let row = flatten_review(&json!({}));

    assert_eq!(row["review_id"], json!(0));
    assert_eq!(row["hotel_id"], json!(0));
    assert_eq!(row["review_url"], json!(""));
    assert_eq!(row["rating"], json!(0.0));
    for key in [
        "review_site_json",
        "language_json",
        "subratings_json",
        "guest_stay_json",
        "survey_topics_json",
        "response_json",
        "links_json",
    ] {
        assert_eq!(row[key], json!("{}"), "{key}");
    }
    for key in ["review_site_id", "language_id"] {
        assert_eq!(row[key], json!(0), "{key}");
    }
    for key in [
        "subratings_cleanliness",
        "subratings_hotel_condition",
        "subratings_rooms",
        "subratings_service",
    ] {
        assert_eq!(row[key], json!(0.0), "{key}");
    }
    for key in ["review_site_name", "language_name", "language_slug", "title", "body"] {
        assert_eq!(row[key], json!(""), "{key}");
    }
}

#[test]
fn test_review_site_without_links() {
    let row = flatten_review(&json!({"reviewSite": {"name": "Booking"}}));
    assert_eq!(row["review_site_id"], json!(0));
    assert_eq!(row["review_site_name"], json!("Booking"));
    assert_eq!(row["review_site_json"], json!(r#"{"name":"Booking"}"#));
}

#[test]
fn test_review_links_without_self() {
    let row = flatten_review(&json!({"links": [{"rel": "hotel", "href": "/hotels/3"}]}));
    assert_eq!(row["review_id"], json!(0));
    assert_eq!(row["hotel_id"], json!(3));
}

#[test]
fn test_flatten_is_idempotent() {
    let review = full_review();
    let first = serde_json::to_string(&flatten_review(&review)).unwrap();
    let second = serde_json::to_string(&flatten_review(&review)).unwrap();
    assert_eq!(first, second);

    let ctx = SnapshotContext::from_snapshot(&snapshot(), 7);
    let first = serde_json::to_string(&flatten_snapshot(&snapshot(), &ctx)).unwrap();
    let second = serde_json::to_string(&flatten_snapshot(&snapshot(), &ctx)).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Hotels
// ============================================================================

#[test]
fn test_hotel_full() {
    let hotel = json!({
        "name": "Grand Hotel",
        "slug": "grand-hotel",
        "address1": "Karl Johans gate 31",
        "city": "Oslo",
        "postalCode": "0159",
        "country": "NO",
        "tripAdvisorId": "190529",
        "accountType": "PREMIUM",
        "revinatePurchaseUri": "https://purchase",
        "links": [
            {"rel": "self", "href": format!("{BASE}/hotels/7")},
            {"rel": "reviewssnapshot", "href": format!("{BASE}/hotels/7/reviewssnapshot")}
        ]
    });

    let row = flatten_hotel(&hotel);
    assert_eq!(row["hotel_id"], json!(7));
    assert_eq!(row["hotel_url"], json!(format!("{BASE}/hotels/7")));
    assert_eq!(
        row["hotel_reviews_snapshot_url"],
        json!(format!("{BASE}/hotels/7/reviewssnapshot"))
    );
    assert_eq!(row["name"], json!("Grand Hotel"));
    assert_eq!(row["postal_code"], json!("0159"));
    assert_eq!(row["trip_advisor_id"], json!(190_529));
    assert_eq!(row["account_type"], json!("PREMIUM"));
    assert_eq!(row["revinate_purchase_uri"], json!("https://purchase"));
    assert_eq!(row["address2"], json!(""));
    assert_eq!(row.len(), 19);
}

#[test]
fn test_hotel_without_links() {
    let row = flatten_hotel(&json!({"name": "Nowhere Inn"}));
    assert_eq!(row["hotel_id"], json!(0));
    assert_eq!(row["hotel_url"], json!(""));
    assert_eq!(row["hotel_reviews_snapshot_url"], json!(""));
    assert_eq!(row["links_json"], json!("{}"));
    assert_eq!(row["trip_advisor_id"], json!(0));
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_snapshot_context() {
    let ctx = SnapshotContext::from_snapshot(&snapshot(), 7);
    assert_eq!(ctx.hotel_id, 7);
    assert_eq!(ctx.start_date, 1_696_118_400);
    assert_eq!(ctx.end_date, 1_698_796_800);
    assert!(ctx.snapshot_url.ends_with("date=1696118400..1698796800"));
}

#[test]
fn test_snapshot_row() {
    let snapshot = snapshot();
    let ctx = SnapshotContext::from_snapshot(&snapshot, 7);
    let row = flatten_snapshot(&snapshot, &ctx);

    assert_eq!(row["hotel_id"], json!(7));
    assert_eq!(row["snapshot_start_date"], json!(1_696_118_400));
    assert_eq!(row["aggregate_average_rating"], json!(4.2));
    assert_eq!(row["aggregate_new_reviews"], json!(12.0));
    assert_eq!(row["aggregate_trip_advisor_market_ranking"], json!(3));
    assert_eq!(row["aggregate_trip_advisor_market_size"], json!(120));
    assert!(row["values_by_review_site_json"]
        .as_str()
        .unwrap()
        .starts_with('['));
}

#[test]
fn test_snapshot_empty() {
    let ctx = SnapshotContext::from_snapshot(&json!({}), 9);
    assert_eq!(ctx, SnapshotContext { hotel_id: 9, ..Default::default() });

    let row = flatten_snapshot(&json!({}), &ctx);
    assert_eq!(row["aggregate_values_json"], json!("{}"));
    assert_eq!(row["values_by_review_site_json"], json!("{}"));
    assert_eq!(row["values_by_time_json"], json!("{}"));
    assert_eq!(row["aggregate_average_rating"], json!(0.0));
    assert_eq!(row["aggregate_trip_advisor_market_size"], json!(0));
    assert_eq!(row["snapshot_start_date"], json!(0));
}

#[test]
fn test_snapshot_by_site() {
    let snapshot = snapshot();
    let ctx = SnapshotContext::from_snapshot(&snapshot, 7);
    let sites = snapshot_children(&snapshot, "valuesByReviewSite");
    assert_eq!(sites.len(), 1);

    let row = flatten_snapshot_by_site(&ctx, &sites[0]);
    assert_eq!(row["hotel_id"], json!(7));
    assert_eq!(row["review_site_id"], json!(5));
    assert_eq!(row["review_site_name"], json!("Expedia"));
    assert_eq!(row["review_site_main_url"], json!(""));
    assert_eq!(row["snapshot_start_date"], json!(1_696_118_400));
    assert_eq!(row["snapshot_end_date"], json!(1_698_796_800));
    assert_eq!(row["site_average_rating"], json!(4.0));
    assert_eq!(row["site_new_reviews"], json!(2.0));
    assert_eq!(row["site_pos_reviews_pct"], json!(0.0));
    assert_eq!(row["site_trip_advisor_market_size"], json!(0));
}

#[test]
fn test_snapshot_by_site_without_review_site() {
    let ctx = SnapshotContext::default();
    let row = flatten_snapshot_by_site(&ctx, &json!({"values": {"newReviews": 1}}));
    assert_eq!(row["review_site_id"], json!(0));
    assert_eq!(row["review_site_json"], json!("{}"));
    assert_eq!(row["site_new_reviews"], json!(1.0));
}

#[test]
fn test_snapshot_by_time() {
    let snapshot = snapshot();
    let ctx = SnapshotContext::from_snapshot(&snapshot, 7);
    let periods = snapshot_children(&snapshot, "valuesByTime");

    let row = flatten_snapshot_by_time(&ctx, &periods[0]);
    assert_eq!(row["hotel_id"], json!(7));
    assert_eq!(row["unix_time"], json!(1_698_796_800));
    assert_eq!(row["snapshot_average_rating"], json!(4.1));
    assert_eq!(row["snapshot_trip_advisor_market_size"], json!(118));
    assert_eq!(row["snapshot_new_reviews"], json!(0.0));

    let empty = flatten_snapshot_by_time(&ctx, &json!({}));
    assert_eq!(empty["unix_time"], json!(0));
    assert_eq!(empty["values_json"], json!("{}"));
    assert_eq!(empty["time_period_json"], json!("{}"));
}

#[test]
fn test_snapshot_children_missing() {
    assert!(snapshot_children(&json!({}), "valuesByTime").is_empty());
    assert!(snapshot_children(&json!({"valuesByTime": {}}), "valuesByTime").is_empty());
}
