//! Dataset IO for the batch pipeline.
//!
//! Input: a JSON array of journal records. Output: the same records in
//! tabular (CSV) form with five list-valued stage columns accumulating the
//! generated counterfactuals; lists are JSON-encoded inside their cells.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One journal record as stored in the input dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub user_id: String,
    pub daily_reflection: DailyReflection,
}

/// The five phase texts of one daily reflection, each possibly missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReflection {
    pub journal_id: String,
    #[serde(default)]
    pub text0: Option<String>,
    #[serde(default)]
    pub text1: Option<String>,
    #[serde(default)]
    pub text2: Option<String>,
    #[serde(default)]
    pub text3: Option<String>,
    #[serde(default)]
    pub text4: Option<String>,
}

/// One output row: the journal entry plus five stage lists accumulating
/// generated counterfactual strings.
#[derive(Debug, Clone)]
pub struct OutputRow {
    pub user_id: String,
    pub journal_id: String,
    texts: [Option<String>; 5],
    stages: Vec<Vec<String>>,
}

impl OutputRow {
    pub fn from_input(record: &InputRecord) -> Self {
        let r = &record.daily_reflection;
        OutputRow {
            user_id: record.user_id.clone(),
            journal_id: r.journal_id.clone(),
            texts: [
                r.text0.clone(),
                r.text1.clone(),
                r.text2.clone(),
                r.text3.clone(),
                r.text4.clone(),
            ],
            stages: vec![Vec::new(); 5],
        }
    }

    /// Composite key convention: `userId + "_" + journalId`.
    pub fn composite_id(&self) -> String {
        format!("{}_{}", self.user_id, self.journal_id)
    }

    pub fn texts(&self) -> &[Option<String>; 5] {
        &self.texts
    }

    pub fn stage(&self, index: usize) -> Option<&[String]> {
        self.stages.get(index).map(|v| v.as_slice())
    }

    pub fn stage_mut(&mut self, index: usize) -> Option<&mut Vec<String>> {
        self.stages.get_mut(index)
    }

    #[cfg(test)]
    pub fn truncate_stages(&mut self, len: usize) {
        self.stages.truncate(len);
    }
}

/// Reads the input dataset: a JSON array of journal records.
pub fn read_input(path: &Path) -> Result<Vec<InputRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input dataset {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("input dataset {} is not a JSON record array", path.display()))
}

fn stage_column(index: usize) -> String {
    format!("counterfactualResults.cfOutputs.stage{index}.generatedCfTexts")
}

/// Writes the updated dataset as CSV, one row per input record. Stage lists
/// are JSON-encoded so list-valued cells survive the tabular format.
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output dataset {}", path.display()))?;

    let mut header = vec![
        "userId".to_string(),
        "dailyReflection.journalId".to_string(),
    ];
    header.extend((0..5).map(|i| format!("dailyReflection.text{i}")));
    header.extend((0..5).map(stage_column));
    writer.write_record(&header)?;

    for row in rows {
        let mut fields = vec![row.user_id.clone(), row.journal_id.clone()];
        fields.extend(
            row.texts
                .iter()
                .map(|t| t.clone().unwrap_or_default()),
        );
        for index in 0..5 {
            let stage = row.stage(index).unwrap_or(&[]);
            fields.push(serde_json::to_string(stage)?);
        }
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INPUT_FIXTURE: &str = r#"[
        {
            "userId": "u_1",
            "dailyReflection": {
                "journalId": "j1",
                "text0": "I stayed home",
                "text2": "I watched my breath"
            }
        },
        {
            "userId": "u_2",
            "dailyReflection": {
                "journalId": "j9",
                "text0": "I went for a run",
                "text1": "I opened a window",
                "text2": "I listened to music",
                "text3": "I called it practice",
                "text4": "I slowed my breathing"
            }
        }
    ]"#;

    #[test]
    fn test_read_input_parses_partial_reflections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INPUT_FIXTURE.as_bytes()).unwrap();

        let records = read_input(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id, "u_1");
        assert_eq!(records[0].daily_reflection.journal_id, "j1");
        assert_eq!(records[0].daily_reflection.text1, None);
        assert_eq!(
            records[0].daily_reflection.text2.as_deref(),
            Some("I watched my breath")
        );
    }

    #[test]
    fn test_output_row_starts_with_empty_stages() {
        let records: Vec<InputRecord> = serde_json::from_str(INPUT_FIXTURE).unwrap();
        let row = OutputRow::from_input(&records[0]);
        assert_eq!(row.composite_id(), "u_1_j1");
        for index in 0..5 {
            assert_eq!(row.stage(index), Some(&[][..]));
        }
    }

    #[test]
    fn test_write_csv_emits_header_and_json_lists() {
        let records: Vec<InputRecord> = serde_json::from_str(INPUT_FIXTURE).unwrap();
        let mut rows: Vec<OutputRow> = records.iter().map(OutputRow::from_input).collect();
        rows[0]
            .stage_mut(3)
            .unwrap()
            .push("I could reframe it".to_string());

        let file = tempfile::NamedTempFile::new().unwrap();
        write_csv(file.path(), &rows).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = written.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("userId,dailyReflection.journalId,dailyReflection.text0"));
        assert!(header.contains("counterfactualResults.cfOutputs.stage3.generatedCfTexts"));

        assert_eq!(lines.clone().count(), 2);
        let first = lines.next().unwrap();
        assert!(first.contains(r#"[""I could reframe it""]"#));
    }
}
