//! Flattens a nested search hit into a [`FlatRecord`].
//!
//! Every lookup goes through `serde_json`'s `Index`, which yields `Null` for a
//! missing key or a non-object parent, so an absent branch simply produces
//! empty cells further down.

use super::models::FlatRecord;
use serde_json::Value;

/// Columns of a flattened record, in the order [`flatten`] inserts them.
pub const COLUMNS: [&str; 24] = [
    "exhibitor_id",
    "name",
    "rewriteId",
    "country_iso3",
    "country",
    "city",
    "zip",
    "street",
    "phone",
    "fax",
    "email",
    "homepage",
    "hall",
    "booth",
    "logo",
    "keywords",
    "products_count",
    "exhibition_id",
    "exhibition_name",
    "exhibition_start",
    "exhibition_end",
    "last_approval_date",
    "sortKey",
    "postal_formatted",
];

/// Maps one search hit to a flat row. Never fails; missing data becomes `""` or `0`.
pub fn flatten(hit: &Value) -> FlatRecord {
    let ex = &hit["exhibitor"];
    let addr = &ex["address"];
    let country = &addr["country"];
    let exhibition = &ex["exhibition"];
    let (hall, booth) = hall_and_booth(ex);

    let mut row = FlatRecord::new();
    row.insert("exhibitor_id", text(&ex["id"]));
    row.insert("name", text(&ex["name"]));
    row.insert("rewriteId", text(&ex["rewriteId"]));
    row.insert("country_iso3", text(&country["iso3"]));
    row.insert("country", text(&country["label"]));
    row.insert("city", text(&addr["city"]));
    row.insert("zip", text(&addr["zip"]));
    row.insert("street", text(&addr["street"]));
    row.insert("phone", text(&addr["tel"]));
    row.insert("fax", text(&addr["fax"]));
    row.insert("email", text(&addr["email"]));
    row.insert("homepage", text(first_truthy(&ex["homepage"], &ex["href"])));
    row.insert("hall", hall);
    row.insert("booth", booth);
    row.insert("logo", text(&ex["logo"]));
    row.insert("keywords", join_keywords(&ex["keyWords"]));
    row.insert("products_count", integer(&ex["products"]["countTotal"]));
    row.insert("exhibition_id", text(&exhibition["id"]));
    row.insert("exhibition_name", text(&exhibition["name"]));
    row.insert("exhibition_start", text(&exhibition["startdate"]));
    row.insert("exhibition_end", text(&exhibition["enddate"]));
    row.insert("last_approval_date", text(&ex["lastApprovalDate"]));
    row.insert("sortKey", text(&ex["sortKey"]));
    row.insert("postal_formatted", text(&ex["addressrdm"]["formatedAddress"]));
    row
}

/// Hall and booth of the first listed hall.
///
/// The hall is the first hall's `name` (or its `id`). The booth is that hall's
/// first stand `name`; only when that is empty does the first presentation
/// link's first `pstands[].firstBoothNumber` apply.
fn hall_and_booth(ex: &Value) -> (String, String) {
    let first_hall = &ex["exhibition"]["exhibitionHall"][0];
    let hall = text(first_truthy(&first_hall["name"], &first_hall["id"]));

    let mut booth = first_or_blank(&first_hall["stand"], "name");
    if booth.is_empty() {
        booth = first_or_blank(&ex["presentationLinks"][0]["pstands"], "firstBoothNumber");
    }

    (hall, booth)
}

/// `key` of the first element of `list`, or `""` if there is none or it is falsy.
fn first_or_blank(list: &Value, key: &str) -> String {
    let value = &list[0][key];
    if is_truthy(value) {
        text(value)
    } else {
        String::new()
    }
}

/// Joins truthy keywords with `", "`, trimming each and skipping blanks.
pub fn join_keywords(keywords: &Value) -> String {
    keywords
        .as_array()
        .map(|list| {
            list.iter()
                .filter(|k| is_truthy(k))
                .map(|k| text(k).trim().to_string())
                .filter(|k| !k.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// Scalar as cell text: strings verbatim, `null` as empty, anything else as JSON.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// `primary` when truthy, otherwise `fallback`.
fn first_truthy<'a>(primary: &'a Value, fallback: &'a Value) -> &'a Value {
    if is_truthy(primary) {
        primary
    } else {
        fallback
    }
}
