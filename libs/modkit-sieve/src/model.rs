//! Wire shapes: the structured record and query-string parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter names, in wire order.
pub const FILTERS_PARAM: &str = "filters";
pub const SORTS_PARAM: &str = "sorts";
pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// Structured `{ filters, sorts, page, pageSize }` record exchanged with the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SieveModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// A query parameter value in its native form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryParam {
    Text(String),
    Number(u32),
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParam::Text(s) => f.write_str(s),
            QueryParam::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Render parameters as `key=value&...`.
///
/// Text values are percent-encoded as opaque components (everything except
/// `A-Z a-z 0-9 - _ . ~`); numbers are written as-is.
#[must_use]
pub fn render_query_string(params: &[(&str, QueryParam)]) -> String {
    params
        .iter()
        .map(|(key, value)| match value {
            QueryParam::Text(text) => format!("{key}={}", urlencoding::encode(text)),
            QueryParam::Number(n) => format!("{key}={n}"),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_encoded_as_opaque_component() {
        let params = [(
            FILTERS_PARAM,
            QueryParam::Text("Name@=Bob,Name!=Bob_0".to_owned()),
        )];
        assert_eq!(
            render_query_string(&params),
            "filters=Name%40%3DBob%2CName%21%3DBob_0"
        );
    }

    #[test]
    fn test_numbers_are_plain() {
        let params = [
            (PAGE_PARAM, QueryParam::Number(2)),
            (PAGE_SIZE_PARAM, QueryParam::Number(50)),
        ];
        assert_eq!(render_query_string(&params), "page=2&pageSize=50");
        assert_eq!(render_query_string(&[]), "");
    }

    #[test]
    fn test_model_wire_shape() {
        let model = SieveModel {
            filters: Some("Name==Bob".to_owned()),
            sorts: None,
            page: Some(1),
            page_size: Some(20),
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"filters": "Name==Bob", "page": 1, "pageSize": 20})
        );

        let back: SieveModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_params_serialize_natively() {
        let params = vec![
            (SORTS_PARAM, QueryParam::Text("-Created".to_owned())),
            (PAGE_PARAM, QueryParam::Number(3)),
        ];
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"[["sorts","-Created"],["page",3]]"#
        );
    }
}
