use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single work-log entry as handed over by a [RecordProvider](super::RecordProvider). Times are
/// kept as raw text, interpreting them is the job of the normalizer.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecord {
    pub id: i64,
    pub start_time: Arc<str>,
    #[serde(default)]
    pub end_time: Option<Arc<str>>,
    pub client: Arc<str>,
    #[serde(default)]
    pub ticket: Option<Arc<str>>,
    #[serde(default, rename = "type")]
    pub kind: Option<Arc<str>>,
    #[serde(default)]
    pub group: Option<Arc<str>>,
}

impl WorkRecord {
    pub fn new(id: i64, start_time: &str, end_time: Option<&str>, client: &str) -> Self {
        Self {
            id,
            start_time: start_time.into(),
            end_time: end_time.map(Into::into),
            client: client.into(),
            ticket: None,
            kind: None,
            group: None,
        }
    }

    pub fn with_ticket(self, ticket: &str) -> Self {
        Self {
            ticket: Some(ticket.into()),
            ..self
        }
    }

    pub fn with_kind(self, kind: &str) -> Self {
        Self {
            kind: Some(kind.into()),
            ..self
        }
    }

    pub fn with_group(self, group: &str) -> Self {
        Self {
            group: Some(group.into()),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WorkRecord;

    #[test]
    fn deserializes_provider_shape() -> anyhow::Result<()> {
        let record: WorkRecord = serde_json::from_str(
            r#"{"id":7,"startTime":"08:00","endTime":null,"client":"Acme","ticket":"T-1","type":"Dev","group":null}"#,
        )?;
        assert_eq!(
            record,
            WorkRecord::new(7, "08:00", None, "Acme")
                .with_ticket("T-1")
                .with_kind("Dev")
        );
        Ok(())
    }

    #[test]
    fn optional_fields_may_be_missing() -> anyhow::Result<()> {
        let record: WorkRecord =
            serde_json::from_str(r#"{"id":1,"startTime":"09:15","client":"Acme"}"#)?;
        assert_eq!(record.end_time, None);
        assert_eq!(record.group, None);
        Ok(())
    }
}
