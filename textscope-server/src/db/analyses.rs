//! Analysis record persistence
//!
//! Structured results (metrics, phrases, entities, distributions) are stored
//! as JSON text columns; scalar results get their own columns so listings can
//! sort on them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use textscope_common::db::{format_timestamp, parse_timestamp};
use textscope_nlp::{
    KeyPhrase, NamedEntities, ProfessionalMetrics, ProfessionalScores, SentimentLabel,
    TextAnalysis, Tone,
};

/// One analysis, flattened the way clients receive it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// `None` when the record could not be stored
    pub id: Option<i64>,
    pub title: String,
    pub text: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub saved: bool,

    pub sentiment: SentimentLabel,
    pub polarity: f64,
    pub subjectivity: f64,
    pub sentiment_confidence: f64,
    pub tone: Tone,
    pub professional_metrics: ProfessionalMetrics,

    pub flesch_score: Option<f64>,
    pub avg_sentence_length: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub syllable_count: usize,
    pub difficulty_level: String,
    pub professional_scores: ProfessionalScores,
    pub writing_improvements: Vec<String>,

    pub key_phrases: Vec<KeyPhrase>,
    pub named_entities: NamedEntities,

    pub language_code: String,
    pub language_confidence: String,
    pub is_english: Option<bool>,
    pub content_category: String,
    pub category_confidence: f64,
    pub category_distribution: BTreeMap<String, f64>,

    pub summary: String,
}

impl AnalysisRecord {
    /// Build an unsaved record from a finished analysis
    pub fn new(
        user_id: i64,
        title: String,
        text: String,
        created_at: DateTime<Utc>,
        analysis: TextAnalysis,
    ) -> Self {
        let TextAnalysis {
            sentiment_analysis: sentiment,
            readability,
            key_phrases,
            named_entities,
            language_info,
            content_category,
            summary,
        } = analysis;

        Self {
            id: None,
            title,
            text,
            user_id,
            created_at,
            saved: false,

            sentiment: sentiment.sentiment,
            polarity: sentiment.polarity,
            subjectivity: sentiment.subjectivity,
            sentiment_confidence: sentiment.confidence,
            tone: sentiment.tone,
            professional_metrics: sentiment.professional_metrics,

            flesch_score: readability.flesch_reading_ease,
            avg_sentence_length: readability.avg_sentence_length,
            word_count: readability.word_count,
            sentence_count: readability.sentence_count,
            syllable_count: readability.syllable_count,
            difficulty_level: readability.difficulty_level,
            professional_scores: readability.professional_scores,
            writing_improvements: readability.writing_improvements,

            key_phrases,
            named_entities,

            language_code: language_info.language_code,
            language_confidence: language_info.confidence,
            is_english: language_info.is_english,
            content_category: content_category.primary_category,
            category_confidence: content_category.confidence_score,
            category_distribution: content_category.category_distribution,

            summary,
        }
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: Some(row.try_get("id")?),
            title: row.try_get("title")?,
            text: row.try_get("text")?,
            user_id: row.try_get("user_id")?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
            saved: true,

            sentiment: decode_label(row, "sentiment")?,
            polarity: row.try_get("polarity")?,
            subjectivity: row.try_get("subjectivity")?,
            sentiment_confidence: row.try_get("sentiment_confidence")?,
            tone: decode_label(row, "tone")?,
            professional_metrics: decode_json(row, "professional_metrics")?,

            flesch_score: row.try_get("flesch_score")?,
            avg_sentence_length: row.try_get("avg_sentence_length")?,
            word_count: decode_count(row, "word_count")?,
            sentence_count: decode_count(row, "sentence_count")?,
            syllable_count: decode_count(row, "syllable_count")?,
            difficulty_level: row.try_get("difficulty_level")?,
            professional_scores: decode_json(row, "professional_scores")?,
            writing_improvements: decode_json(row, "writing_improvements")?,

            key_phrases: decode_json(row, "key_phrases")?,
            named_entities: decode_json(row, "named_entities")?,

            language_code: row.try_get("language_code")?,
            language_confidence: row.try_get("language_confidence")?,
            is_english: row.try_get("is_english")?,
            content_category: row.try_get("content_category")?,
            category_confidence: row.try_get("category_confidence")?,
            category_distribution: decode_json(row, "category_distribution")?,

            summary: row.try_get("summary")?,
        })
    }
}

/// Columns a listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Title,
    Sentiment,
    DifficultyLevel,
    WordCount,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::CreatedAt,
        SortField::Title,
        SortField::Sentiment,
        SortField::DifficultyLevel,
        SortField::WordCount,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Title => "title",
            SortField::Sentiment => "sentiment",
            SortField::DifficultyLevel => "difficulty_level",
            SortField::WordCount => "word_count",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(SortField::column).collect();
                format!("Invalid sort field. Must be one of: {}", valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err("Sort order must be 'asc' or 'desc'".to_string()),
        }
    }
}

/// Pagination and ordering of a user's analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub skip: i64,
    pub limit: i64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 10,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Store a record for its user; returns the new id
///
/// The record's own `id`/`saved` fields are ignored.
pub async fn insert_analysis(pool: &SqlitePool, record: &AnalysisRecord) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO text_analyses (
            title, text, created_at, user_id,
            sentiment, polarity, subjectivity, sentiment_confidence, tone, professional_metrics,
            flesch_score, avg_sentence_length, word_count, sentence_count, syllable_count,
            difficulty_level, professional_scores, writing_improvements,
            key_phrases, named_entities,
            language_code, language_confidence, is_english,
            content_category, category_confidence, category_distribution,
            summary
        ) VALUES (
            ?, ?, ?, ?,
            ?, ?, ?, ?, ?, ?,
            ?, ?, ?, ?, ?,
            ?, ?, ?,
            ?, ?,
            ?, ?, ?,
            ?, ?, ?,
            ?
        )
        "#,
    )
    .bind(&record.title)
    .bind(&record.text)
    .bind(format_timestamp(&record.created_at))
    .bind(record.user_id)
    .bind(record.sentiment.as_str())
    .bind(record.polarity)
    .bind(record.subjectivity)
    .bind(record.sentiment_confidence)
    .bind(record.tone.as_str())
    .bind(encode_json(&record.professional_metrics)?)
    .bind(record.flesch_score)
    .bind(record.avg_sentence_length)
    .bind(record.word_count as i64)
    .bind(record.sentence_count as i64)
    .bind(record.syllable_count as i64)
    .bind(&record.difficulty_level)
    .bind(encode_json(&record.professional_scores)?)
    .bind(encode_json(&record.writing_improvements)?)
    .bind(encode_json(&record.key_phrases)?)
    .bind(encode_json(&record.named_entities)?)
    .bind(&record.language_code)
    .bind(&record.language_confidence)
    .bind(record.is_english)
    .bind(&record.content_category)
    .bind(record.category_confidence)
    .bind(encode_json(&record.category_distribution)?)
    .bind(&record.summary)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Fetch one analysis if it belongs to the user
pub async fn get_analysis(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
) -> Result<Option<AnalysisRecord>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM text_analyses WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(AnalysisRecord::from_row).transpose()
}

/// One page of the user's analyses
pub async fn list_analyses(
    pool: &SqlitePool,
    user_id: i64,
    query: &ListQuery,
) -> Result<Vec<AnalysisRecord>, sqlx::Error> {
    // Column and direction come from closed enums, never from the request
    let sql = format!(
        "SELECT * FROM text_analyses WHERE user_id = ? ORDER BY {col} {dir}, id {dir} LIMIT ? OFFSET ?",
        col = query.sort_by.column(),
        dir = query.sort_order.sql(),
    );

    let rows = sqlx::query(&sql)
        .bind(user_id)
        .bind(query.limit)
        .bind(query.skip)
        .fetch_all(pool)
        .await?;

    rows.iter().map(AnalysisRecord::from_row).collect()
}

/// Delete an analysis if it belongs to the user; returns whether a row went away
pub async fn delete_analysis(pool: &SqlitePool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM text_analyses WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_json<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Lowercase label columns share the serde representation of their enums
fn decode_label<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    serde_json::from_value(serde_json::Value::String(raw)).map_err(|e| {
        sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        }
    })
}

fn decode_count(row: &SqliteRow, column: &str) -> Result<usize, sqlx::Error> {
    let value: i64 = row.try_get(column)?;
    usize::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
