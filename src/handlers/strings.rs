//! /strings endpoints
//!
//! - POST   /strings
//! - GET    /strings
//! - GET    /strings/filter-by-natural-language
//! - GET    /strings/{value}
//! - DELETE /strings/{value}

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::AppState;
use crate::analyzer::StringRecord;
use crate::error::{Error, Result};
use crate::filter::StructuredFilter;
use crate::nlp::InterpretedQuery;

/// Explicit filter parameters, kept raw so malformed values can be reported
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub is_palindrome: Option<String>,
    pub min_length: Option<String>,
    pub max_length: Option<String>,
    pub word_count: Option<String>,
    pub contains_character: Option<String>,
}

impl ListParams {
    /// Validates the parameters and builds the filter they describe
    pub fn into_filter(self) -> Result<StructuredFilter> {
        let mut filter = StructuredFilter::new();

        if let Some(raw) = self.is_palindrome {
            filter.is_palindrome = Some(raw == "true");
        }
        if let Some(raw) = self.min_length {
            filter.min_length = Some(parse_integer("min_length", &raw)?);
        }
        if let Some(raw) = self.max_length {
            filter.max_length = Some(parse_integer("max_length", &raw)?);
        }
        if let Some(raw) = self.word_count {
            filter.word_count = Some(parse_integer("word_count", &raw)?);
        }
        if let Some(raw) = self.contains_character {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some('\0'), None) => {
                    return Err(Error::Validation(
                        "Invalid query parameter: contains_character must not be NUL".to_string(),
                    ))
                }
                (Some(c), None) => filter.contains_character = Some(c),
                _ => {
                    return Err(Error::Validation(
                        "Invalid query parameter: contains_character must be a single character"
                            .to_string(),
                    ))
                }
            }
        }

        Ok(filter)
    }
}

fn parse_integer(name: &str, raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| {
        Error::Validation(format!(
            "Invalid query parameter: {} must be an integer",
            name
        ))
    })
}

#[derive(Debug, Deserialize)]
pub struct NaturalLanguageParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<StringRecord>,
    pub count: usize,
    pub filters_applied: StructuredFilter,
}

#[derive(Debug, Serialize)]
pub struct NaturalLanguageResponse {
    pub data: Vec<StringRecord>,
    pub count: usize,
    pub interpreted_query: InterpretedQuery,
}

/// POST /strings
pub async fn create_string(
    State(state): State<AppState>,
    payload: std::result::Result<Json<JsonValue>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = payload
        .map_err(|e| Error::Validation(format!("Invalid request body: {}", e.body_text())))?;

    let value = match body.get("value") {
        None | Some(JsonValue::Null) => {
            return Err(Error::Validation("Missing \"value\" field".to_string()))
        }
        // Frequency map keys are document field names, which cannot hold NUL
        Some(JsonValue::String(value)) if value.contains('\0') => {
            return Err(Error::Validation(
                "Invalid \"value\": NUL characters are not supported".to_string(),
            ))
        }
        Some(JsonValue::String(value)) => value,
        Some(_) => {
            return Err(Error::InvalidType(
                "Invalid data type for \"value\" (must be string)".to_string(),
            ))
        }
    };

    let record = state.service.create(value).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /strings
pub async fn list_strings(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListResponse>> {
    let Query(params) = params
        .map_err(|e| Error::Validation(format!("Invalid query parameters: {}", e.body_text())))?;
    let filter = params.into_filter()?;

    let data = state.service.list(&filter).await?;
    Ok(Json(ListResponse {
        count: data.len(),
        data,
        filters_applied: filter,
    }))
}

/// GET /strings/filter-by-natural-language
pub async fn filter_by_natural_language(
    State(state): State<AppState>,
    params: std::result::Result<Query<NaturalLanguageParams>, QueryRejection>,
) -> Result<Json<NaturalLanguageResponse>> {
    let Query(params) = params
        .map_err(|e| Error::Validation(format!("Invalid query parameters: {}", e.body_text())))?;
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| Error::Validation("Missing query parameter".to_string()))?;

    let (data, interpreted_query) = state.service.filter_by_natural_language(&query).await?;
    Ok(Json(NaturalLanguageResponse {
        count: data.len(),
        data,
        interpreted_query,
    }))
}

/// GET /strings/{value}
pub async fn get_string(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<StringRecord>> {
    Ok(Json(state.service.get(&value).await?))
}

/// DELETE /strings/{value}
pub async fn delete_string(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<StatusCode> {
    state.service.delete(&value).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "is_palindrome" => params.is_palindrome = value,
                "min_length" => params.min_length = value,
                "max_length" => params.max_length = value,
                "word_count" => params.word_count = value,
                "contains_character" => params.contains_character = value,
                other => panic!("unknown parameter {other}"),
            }
        }
        params
    }

    #[test]
    fn test_no_params_is_empty_filter() {
        assert!(ListParams::default().into_filter().unwrap().is_empty());
    }

    #[test]
    fn test_all_params() {
        let filter = params(&[
            ("is_palindrome", "true"),
            ("min_length", "3"),
            ("max_length", " 10 "),
            ("word_count", "1"),
            ("contains_character", "é"),
        ])
        .into_filter()
        .unwrap();
        assert_eq!(
            filter,
            StructuredFilter::new()
                .with_palindrome(true)
                .with_min_length(3)
                .with_max_length(10)
                .with_word_count(1)
                .with_contains_character('é')
        );
    }

    #[test]
    fn test_non_true_palindrome_means_false() {
        let filter = params(&[("is_palindrome", "yes")]).into_filter().unwrap();
        assert_eq!(filter.is_palindrome, Some(false));
    }

    #[test]
    fn test_malformed_integer_rejected() {
        for (key, value) in [("min_length", "abc"), ("max_length", "1.5"), ("word_count", "")] {
            let err = params(&[(key, value)]).into_filter().unwrap_err();
            assert!(matches!(err, Error::Validation(ref m) if m.contains(key)), "{key}={value}");
        }
    }

    #[test]
    fn test_contains_character_must_be_single() {
        assert!(params(&[("contains_character", "ab")]).into_filter().is_err());
        assert!(params(&[("contains_character", "")]).into_filter().is_err());
    }

    #[test]
    fn test_nul_character_rejected() {
        let err = params(&[("contains_character", "\0")]).into_filter().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("NUL")));
    }
}
