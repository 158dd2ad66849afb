//! Print-job interpretation
//!
//! Turns an inbound job description into an ordered sequence of adapter
//! operations with exactly one flush at the end. However many text
//! appends, formats and cuts a job contains, the printer sees one
//! physical submission.

use crate::utils::AppError;
use bridge_printer::{Format, PrinterAdapter, latin1_to_string};
use serde::Deserialize;
use serde_json::Value;

/// Payload shape of a print request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    #[default]
    Text,
    Raw,
    /// Structured command sequence
    Escpos,
}

/// One structured command record
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum EscPosCommand {
    Text {
        #[serde(default)]
        data: String,
    },
    Cut,
    Set {
        #[serde(default)]
        attribute: String,
        #[serde(default)]
        value: String,
    },
}

/// Inbound print request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub printer_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: JobKind,
    /// Payload for text (string) and raw (hex string or byte array)
    pub data: Option<Value>,
    /// Payload for escpos jobs
    #[serde(default)]
    pub commands: Vec<EscPosCommand>,
    /// Append a paper cut before the final flush
    #[serde(default)]
    pub cut: bool,
}

/// Decode a raw payload: hex string or array of byte values
///
/// All three hex spellings - `"1B69"`, `"0x1B69"`, `"1B 69"` -
/// normalize to the same bytes: every `0x` marker is stripped, then all
/// whitespace, then the remainder is hex-decoded.
pub fn decode_raw_payload(data: &Value) -> Result<Vec<u8>, AppError> {
    match data {
        Value::String(s) => {
            let normalized: String = s.replace("0x", "").replace("0X", "");
            let normalized: String = normalized.split_whitespace().collect();
            hex::decode(&normalized)
                .map_err(|e| AppError::validation(format!("Invalid hex data: {}", e)))
        }
        Value::Array(items) => items
            .iter()
            .map(|v| {
                v.as_u64()
                    .filter(|&b| b <= 0xFF)
                    .map(|b| b as u8)
                    .ok_or_else(|| AppError::validation("Byte array values must be 0-255"))
            })
            .collect(),
        _ => Err(AppError::validation(
            "Raw data must be a hex string or byte array",
        )),
    }
}

/// Execute one job against a resolved adapter
///
/// Appends everything the payload describes, then the optional cut,
/// then issues the single terminal flush. Any transport failure aborts
/// the job; the adapter discards whatever had been buffered.
pub async fn execute_job(job: &PrintRequest, adapter: &mut PrinterAdapter) -> Result<(), AppError> {
    match job.kind {
        JobKind::Text => {
            let text = match &job.data {
                Some(Value::String(s)) => s.as_str(),
                None => "",
                Some(_) => return Err(AppError::validation("Text data must be a string")),
            };
            adapter.append_text(text);
        }
        JobKind::Raw => {
            let data = job
                .data
                .as_ref()
                .ok_or_else(|| AppError::validation("Raw job requires data"))?;
            let bytes = decode_raw_payload(data)?;
            if adapter.supports_raw() {
                adapter.append_raw(&bytes);
            } else {
                // Lossless for every byte value, unlike UTF-8
                adapter.append_text(&latin1_to_string(&bytes));
            }
        }
        JobKind::Escpos => {
            for cmd in &job.commands {
                match cmd {
                    EscPosCommand::Text { data } => adapter.append_text(data),
                    EscPosCommand::Cut => adapter.append_cut(),
                    EscPosCommand::Set { attribute, value } => {
                        // Unknown attributes are ignored, not errors
                        if let Some(format) = Format::parse(attribute, value) {
                            adapter.apply_format(format);
                        }
                    }
                }
            }
        }
    }

    if job.cut {
        adapter.append_cut();
    }

    adapter.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_printer::{ConnectionConfig, MockOp, TransportKind};
    use serde_json::json;

    async fn mock_adapter() -> PrinterAdapter {
        let config = ConnectionConfig::from_value(
            TransportKind::Network,
            json!({ "host": "127.0.0.1" }),
        )
        .unwrap();
        PrinterAdapter::connect(TransportKind::Network, &config, true)
            .await
            .unwrap()
    }

    fn parse(body: Value) -> PrintRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_hex_spellings_decode_identically() {
        let expected = vec![0x1B, 0x69];
        for s in ["1B69", "0x1B69", "1B 69", "0x1B 0x69"] {
            assert_eq!(decode_raw_payload(&json!(s)).unwrap(), expected, "{}", s);
        }
    }

    #[test]
    fn test_byte_array_payload() {
        assert_eq!(
            decode_raw_payload(&json!([27, 105, 255])).unwrap(),
            vec![0x1B, 0x69, 0xFF]
        );
        assert!(decode_raw_payload(&json!([300])).is_err());
    }

    #[test]
    fn test_invalid_hex_rejected() {
        for bad in ["zz", "1B6", "hello world"] {
            assert!(decode_raw_payload(&json!(bad)).is_err(), "{}", bad);
        }
    }

    #[tokio::test]
    async fn test_text_job_single_flush() {
        let mut adapter = mock_adapter().await;
        let ops = adapter.mock_ops().unwrap();

        let job = parse(json!({ "printerId": "a", "type": "text", "data": "Hello" }));
        execute_job(&job, &mut adapter).await.unwrap();

        let recorded = ops.lock().unwrap().clone();
        assert_eq!(
            recorded,
            vec![MockOp::Text("Hello".into()), MockOp::Flush]
        );
    }

    #[tokio::test]
    async fn test_cut_precedes_the_single_flush() {
        let mut adapter = mock_adapter().await;
        let ops = adapter.mock_ops().unwrap();

        let job = parse(json!({
            "printerId": "a", "type": "text", "data": "Hello", "cut": true
        }));
        execute_job(&job, &mut adapter).await.unwrap();

        let recorded = ops.lock().unwrap().clone();
        assert_eq!(
            recorded,
            vec![
                MockOp::Text("Hello".into()),
                MockOp::Cut,
                MockOp::Flush,
            ]
        );
    }

    #[tokio::test]
    async fn test_raw_falls_back_to_latin1_text() {
        let mut adapter = mock_adapter().await;
        let ops = adapter.mock_ops().unwrap();

        // 0xFF is not valid UTF-8; the fallback must not fail on it
        let job = parse(json!({ "printerId": "a", "type": "raw", "data": "1BFF" }));
        execute_job(&job, &mut adapter).await.unwrap();

        let recorded = ops.lock().unwrap().clone();
        assert_eq!(recorded.len(), 2);
        match &recorded[0] {
            MockOp::Text(s) => assert_eq!(s.chars().map(|c| c as u32).collect::<Vec<_>>(), [0x1B, 0xFF]),
            other => panic!("expected text fallback, got {:?}", other),
        }
        assert_eq!(recorded[1], MockOp::Flush);
    }

    #[tokio::test]
    async fn test_escpos_commands_run_in_order() {
        let mut adapter = mock_adapter().await;
        let ops = adapter.mock_ops().unwrap();

        let job = parse(json!({
            "printerId": "a",
            "type": "escpos",
            "commands": [
                { "action": "set", "attribute": "align", "value": "center" },
                { "action": "text", "data": "Receipt" },
                { "action": "set", "attribute": "sparkle", "value": "max" },
                { "action": "cut" }
            ]
        }));
        execute_job(&job, &mut adapter).await.unwrap();

        let recorded = ops.lock().unwrap().clone();
        // The unknown "sparkle" attribute is skipped without error
        assert_eq!(recorded.len(), 4);
        assert_eq!(recorded[1], MockOp::Text("Receipt".into()));
        assert_eq!(recorded[2], MockOp::Cut);
        assert_eq!(recorded[3], MockOp::Flush);
    }

    #[tokio::test]
    async fn test_empty_escpos_job_still_flushes_once() {
        let mut adapter = mock_adapter().await;
        let ops = adapter.mock_ops().unwrap();

        let job = parse(json!({ "printerId": "a", "type": "escpos", "commands": [] }));
        execute_job(&job, &mut adapter).await.unwrap();

        let recorded = ops.lock().unwrap().clone();
        assert_eq!(recorded, vec![MockOp::Flush]);
    }
}
