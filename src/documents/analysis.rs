use std::collections::BTreeMap;

use mongodb::bson::{doc, Bson, Document};

use super::models::{CollectionSummary, RecentDocument, SummaryReport, TrendReport};
use crate::services::mongo::{bson_as_i64, bson_to_display_string};

const UNCATEGORIZED: &str = "uncategorized";
const SAMPLE_TITLES: usize = 10;
const RECENT_DOCUMENTS: usize = 5;

fn category_of(doc: &Document) -> String {
    match doc.get("category") {
        None | Some(Bson::Null) => UNCATEGORIZED.to_string(),
        Some(value) => bson_to_display_string(value),
    }
}

pub fn empty_collection_message(collection: &str) -> String {
    format!("No documents found in collection '{collection}'")
}

/// Tally categories, titles and recent entries over a sample of `collection`.
pub fn build_collection_summary(
    collection: &str,
    total_documents: u64,
    sample: &[Document],
) -> SummaryReport {
    if total_documents == 0 {
        return SummaryReport::Empty {
            message: empty_collection_message(collection),
        };
    }

    let mut document_types: BTreeMap<String, u64> = BTreeMap::new();
    let mut titles = Vec::new();
    let mut recent = Vec::new();

    for doc in sample {
        let category = category_of(doc);
        *document_types.entry(category.clone()).or_default() += 1;

        if let Some(title) = doc.get("title") {
            titles.push(bson_to_display_string(title));
        }

        if let Some(timestamp) = doc.get("timestamp") {
            recent.push((
                bson_to_display_string(timestamp),
                RecentDocument {
                    title: doc
                        .get("title")
                        .map(bson_to_display_string)
                        .unwrap_or_else(|| "Untitled".to_string()),
                    timestamp: timestamp.clone().into_relaxed_extjson(),
                    doc_type: category,
                },
            ));
        }
    }

    recent.sort_by(|a, b| b.0.cmp(&a.0));
    titles.truncate(SAMPLE_TITLES);

    let summary = format!(
        "Collection '{collection}' contains {total_documents} documents with {} different types/categories.",
        document_types.len()
    );

    SummaryReport::Summary(CollectionSummary {
        collection: collection.to_string(),
        total_documents,
        analyzed_documents: sample.len(),
        document_types,
        sample_titles: titles,
        recent_documents: recent
            .into_iter()
            .take(RECENT_DOCUMENTS)
            .map(|(_, doc)| doc)
            .collect(),
        summary,
    })
}

/// Daily/category grouping of documents whose `time_field` parses as a date.
pub fn trend_pipeline(time_field: &str) -> Vec<Document> {
    vec![
        doc! { "$match": { time_field: { "$exists": true } } },
        doc! { "$addFields": {
            "date": {
                "$dateFromString": {
                    "dateString": format!("${time_field}"),
                    "onError": Bson::Null,
                }
            }
        }},
        doc! { "$match": { "date": { "$ne": Bson::Null } } },
        doc! { "$group": {
            "_id": {
                "year": { "$year": "$date" },
                "month": { "$month": "$date" },
                "day": { "$dayOfMonth": "$date" },
                "category": "$category",
            },
            "count": { "$sum": 1 },
            "titles": { "$push": "$title" },
        }},
        doc! { "$sort": { "_id.year": -1, "_id.month": -1, "_id.day": -1 } },
    ]
}

/// Fold grouped trend rows into per-day and per-category totals.
///
/// Ties for the most active category go to the name that sorts first.
pub fn build_trend_report(collection: &str, total_documents: u64, rows: &[Document]) -> TrendReport {
    let mut daily: BTreeMap<String, u64> = BTreeMap::new();
    let mut categories: BTreeMap<String, u64> = BTreeMap::new();

    for row in rows {
        let Ok(key) = row.get_document("_id") else {
            continue;
        };
        let part = |name: &str| key.get(name).and_then(bson_as_i64).unwrap_or(0);
        let date = format!("{}-{:02}-{:02}", part("year"), part("month"), part("day"));
        let count = row
            .get("count")
            .and_then(bson_as_i64)
            .and_then(|c| u64::try_from(c).ok())
            .unwrap_or(0);

        *daily.entry(date).or_default() += count;
        *categories.entry(category_of(key)).or_default() += count;
    }

    let most_active_category = categories
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, count)| (name.clone(), *count));

    TrendReport {
        collection: collection.to_string(),
        total_documents,
        analysis_period: format!("{} days with data", daily.len()),
        daily_document_counts: daily,
        category_distribution: categories,
        most_active_category,
    }
}
