//! JSON renderer
//!
//! Emits one JSON object per record for machine processing:
//! `{"timestamp":"…","level":"INFO","message":"…","file":"main.rs","line":10,"fields":{…}}`.
//! Field order inside `fields` follows insertion order.

use super::error::Result;
use super::log_record::LogRecord;
use super::renderer::Renderer;
use super::timestamp::TimestampFormat;

#[derive(Debug, Clone)]
pub struct JsonRenderer {
    timestamp_format: TimestampFormat,
    include_thread: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::Iso8601,
            include_thread: false,
        }
    }
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_thread_info(mut self, include: bool) -> Self {
        self.include_thread = include;
        self
    }

    fn to_json(&self, record: &LogRecord) -> serde_json::Value {
        let mut json_obj = serde_json::Map::new();

        if let Some(timestamp) = self.timestamp_format.format(&record.timestamp) {
            let value = if self.timestamp_format.is_numeric() {
                timestamp
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .unwrap_or(serde_json::Value::String(timestamp))
            } else {
                serde_json::Value::String(timestamp)
            };
            json_obj.insert("timestamp".to_string(), value);
        }

        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(record.message.clone()),
        );

        if let Some(file) = record.file() {
            json_obj.insert("file".to_string(), serde_json::Value::String(file.to_string()));
        }
        if let Some(line) = record.line() {
            json_obj.insert("line".to_string(), serde_json::Value::Number(line.into()));
        }

        if self.include_thread {
            json_obj.insert(
                "thread_id".to_string(),
                serde_json::Value::String(record.thread_id.clone()),
            );
            if let Some(ref name) = record.thread_name {
                json_obj.insert(
                    "thread_name".to_string(),
                    serde_json::Value::String(name.clone()),
                );
            }
        }

        if !record.fields.is_empty() {
            let fields: serde_json::Map<String, serde_json::Value> = record
                .fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_json_value()))
                .collect();
            json_obj.insert("fields".to_string(), serde_json::Value::Object(fields));
        }

        serde_json::Value::Object(json_obj)
    }
}

impl Renderer for JsonRenderer {
    fn render(&mut self, record: &LogRecord) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json(record))?)
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::log_record::CallSite;
    use crate::core::log_value::Fields;

    #[test]
    fn test_json_output() {
        let record = LogRecord::new(LogLevel::Info, "User login")
            .with_call_site(CallSite::new("src/main.rs", 7))
            .with_fields(Fields::new().with("user_id", 12345).with("ip", "192.168.1.1"));

        let mut renderer = JsonRenderer::new().with_timestamp_format(TimestampFormat::None);
        let line = renderer.render(&record).unwrap();

        assert_eq!(
            line,
            r#"{"level":"INFO","message":"User login","file":"main.rs","line":7,"fields":{"user_id":12345,"ip":"192.168.1.1"}}"#
        );
    }

    #[test]
    fn test_json_field_order_is_preserved() {
        let record = LogRecord::new(LogLevel::Debug, "event")
            .with_fields(Fields::new().with("z", 1).with("a", 2));

        let mut renderer = JsonRenderer::new();
        let value: serde_json::Value =
            serde_json::from_str(&renderer.render(&record).unwrap()).unwrap();

        let keys: Vec<&String> = value["fields"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_numeric_timestamp() {
        let record = LogRecord::new(LogLevel::Error, "x");
        let mut renderer = JsonRenderer::new()
            .with_timestamp_format(TimestampFormat::Unix)
            .with_thread_info(true);
        let value: serde_json::Value =
            serde_json::from_str(&renderer.render(&record).unwrap()).unwrap();

        assert!(value["timestamp"].is_i64());
        assert!(value["thread_id"].is_string());
    }

    #[test]
    fn test_control_characters_round_trip() {
        let record = LogRecord::new(LogLevel::Warning, "a\nb\tc")
            .with_fields(Fields::new().with("path", "x\r\ny"));

        let mut renderer = JsonRenderer::new();
        let line = renderer.render(&record).unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["message"], "a\nb\tc");
        assert_eq!(value["fields"]["path"], "x\r\ny");
    }
}
