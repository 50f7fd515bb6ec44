//! Wire format decoding.
//!
//! A delta arrives as JSON, either a bare array of insert ops or an object
//! with an `ops` array. Each op is normalised into an [`Op`]: attribute
//! values become strings so the rest of the renderer only has one value type
//! to deal with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::error::{DecodeError, RenderError};
use crate::op::{Op, TEXT_KIND, TRUE_SENTINEL};

/// An insert op exactly as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOp {
    #[serde(default)]
    pub insert: Option<Value>,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDelta {
    Ops(Vec<RawOp>),
    Document { ops: Vec<RawOp> },
}

impl RawOp {
    /// Normalises this record into an [`Op`]. `index` is only used for error reporting.
    pub fn into_op(self, index: usize) -> Result<Op, DecodeError> {
        let mut op = match self.insert {
            None | Some(Value::Null) => return Err(DecodeError::MissingInsert { index }),
            Some(Value::String(text)) => Op {
                data: text,
                kind: SmolStr::new_static(TEXT_KIND),
                ..Default::default()
            },
            Some(Value::Object(embed)) => {
                if embed.len() != 1 {
                    return Err(DecodeError::InvalidInsert {
                        index,
                        reason: format!("embed has {} keys", embed.len()),
                    });
                }
                let Some((kind, value)) = embed.into_iter().next() else {
                    return Err(DecodeError::MissingInsert { index });
                };
                let data = match value {
                    Value::Array(_) | Value::Object(_) => value.to_string(),
                    scalar => extract_string(&scalar),
                };
                Op {
                    data,
                    kind: SmolStr::from(kind),
                    ..Default::default()
                }
            }
            Some(other) => {
                return Err(DecodeError::InvalidInsert {
                    index,
                    reason: format!("expected a string or an embed object, found {other}"),
                });
            }
        };

        if let Some(attributes) = self.attributes {
            op.attrs = attributes
                .iter()
                .map(|(name, value)| (SmolStr::from(name.as_str()), extract_string(value)))
                .collect();
        }

        Ok(op)
    }
}

/// Flattens an attribute value into the renderer's string form.
///
/// `true` becomes the `"y"` sentinel; `false`, `null` and structured values
/// become `""`, which reads as "not set".
pub fn extract_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => TRUE_SENTINEL.to_owned(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        },
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Parses a JSON delta and decodes every op, stopping at the first bad record.
pub fn decode(json: &str) -> Result<Vec<Op>, RenderError> {
    let raw = match serde_json::from_str::<RawDelta>(json)? {
        RawDelta::Ops(ops) | RawDelta::Document { ops } => ops,
    };
    let ops = raw
        .into_iter()
        .enumerate()
        .map(|(index, raw)| raw.into_op(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawOp {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_insert_with_attributes() {
        let op = raw(json!({
            "insert": "string to insert.",
            "attributes": {
                "bold": true,
                "link": "https://widerwebs.com",
                "italic": false,
                "underline": null,
                "header": 2
            }
        }))
        .into_op(0)
        .unwrap();

        assert_eq!(op.kind, "text");
        assert_eq!(op.data, "string to insert.");
        assert_eq!(op.attr("bold"), "y");
        assert_eq!(op.attr("link"), "https://widerwebs.com");
        assert_eq!(op.attrs.get("italic").map(String::as_str), Some(""));
        assert_eq!(op.attrs.get("underline").map(String::as_str), Some(""));
        assert_eq!(op.attr("header"), "2");
    }

    #[test]
    fn test_embed_insert() {
        let op = raw(json!({
            "insert": { "image": "https://example.com/cat.png" },
            "attributes": { "alt": "a cat" }
        }))
        .into_op(3)
        .unwrap();

        assert_eq!(op.kind, "image");
        assert_eq!(op.data, "https://example.com/cat.png");
        assert_eq!(op.attr("alt"), "a cat");
    }

    #[test]
    fn test_missing_insert() {
        let err = raw(json!({ "attributes": { "bold": true } }))
            .into_op(4)
            .unwrap_err();
        assert_eq!(err, DecodeError::MissingInsert { index: 4 });

        let err = raw(json!({ "insert": null })).into_op(1).unwrap_err();
        assert_eq!(err, DecodeError::MissingInsert { index: 1 });
    }

    #[test]
    fn test_embed_with_several_keys_is_rejected() {
        let err = raw(json!({ "insert": { "image": "a", "video": "b" } }))
            .into_op(0)
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidInsert { index: 0, .. }));

        let err = raw(json!({ "insert": {} })).into_op(0).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidInsert { .. }));

        let err = raw(json!({ "insert": 12 })).into_op(2).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidInsert { index: 2, .. }));
    }

    #[test]
    fn test_extract_string() {
        assert_eq!(extract_string(&json!("random string")), "random string");
        assert_eq!(extract_string(&json!(true)), "y");
        assert_eq!(extract_string(&json!(false)), "");
        assert_eq!(extract_string(&json!(null)), "");
        assert_eq!(extract_string(&json!(3)), "3");
        assert_eq!(extract_string(&json!(2.0)), "2");
        assert_eq!(extract_string(&json!(1.5)), "1.5");
    }

    #[test]
    fn test_decode_accepts_both_shapes() {
        let bare = decode(r#"[{"insert":"hi\n"}]"#).unwrap();
        let wrapped = decode(r#"{"ops":[{"insert":"hi\n"}]}"#).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn test_decode_reports_first_bad_op() {
        let err = decode(r#"[{"insert":"ok"},{"attributes":{}},{"insert":{}}]"#).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Decode(DecodeError::MissingInsert { index: 1 })
        ));
    }
}
