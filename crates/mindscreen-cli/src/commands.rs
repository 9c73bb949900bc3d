use std::io::Read;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, eyre};
use mindscreen_core::models::response::RawResponse;
use mindscreen_core::models::user::UserContext;
use mindscreen_engine::config::{self, EngineSettings};
use mindscreen_engine::AssessmentEngine;
use mindscreen_instruments::InstrumentDefinition;
use serde::{Deserialize, Serialize};

use crate::OutputFormat;

pub enum AnswerSource {
    File(PathBuf),
    Values(Vec<u32>),
}

/// An answers file holds either full responses or bare values.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    Responses(Vec<RawResponse>),
    Values { values: Vec<u32> },
}

fn effective_settings(path: &Path) -> Result<EngineSettings> {
    Ok(config::load_or_default(path)?.overlay_env())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read answers from {}", path.display()))
    }
}

/// Bare values are matched to items in order, all stamped now.
fn responses_from_values(def: &InstrumentDefinition, values: &[u32]) -> Result<Vec<RawResponse>> {
    if values.len() > def.items.len() {
        return Err(eyre!(
            "{} has {} items but {} values were given",
            def.name,
            def.items.len(),
            values.len()
        ));
    }
    let now = jiff::Timestamp::now();
    Ok(def
        .items
        .iter()
        .zip(values)
        .map(|(item, &value)| RawResponse {
            question_id: item.id.clone(),
            value,
            question: item.name.clone(),
            label: value.to_string(),
            timestamp: now,
        })
        .collect())
}

fn load_responses(def: &InstrumentDefinition, source: AnswerSource) -> Result<Vec<RawResponse>> {
    match source {
        AnswerSource::Values(values) => responses_from_values(def, &values),
        AnswerSource::File(path) => {
            let raw = read_input(&path)?;
            match serde_json::from_str::<AnswersFile>(&raw)
                .wrap_err("answers must be a list of responses or {\"values\": [...]}")?
            {
                AnswersFile::Responses(responses) => Ok(responses),
                AnswersFile::Values { values } => responses_from_values(def, &values),
            }
        }
    }
}

pub async fn assess(
    config_path: &Path,
    instrument_id: &str,
    source: AnswerSource,
    ctx: UserContext,
    format: OutputFormat,
) -> Result<()> {
    let settings = effective_settings(config_path)?;
    let engine = AssessmentEngine::from_settings(&settings, instrument_id)?;
    let responses = load_responses(engine.instrument(), source)?;

    let result = engine.process_assessment(&responses, &ctx).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Markdown => {
            println!("{}", mindscreen_export::render_report(&result, engine.instrument())?)
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct InstrumentSummary<'a> {
    id: &'a str,
    name: &'a str,
    items: usize,
    max_score: u32,
}

pub fn list_instruments() -> Result<()> {
    let summaries: Vec<InstrumentSummary> = mindscreen_instruments::all_instruments()
        .into_iter()
        .map(|def| InstrumentSummary {
            id: &def.id,
            name: &def.name,
            items: def.items.len(),
            max_score: def.items.iter().map(|i| i.range.max).sum(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

pub fn show_config(path: &Path) -> Result<()> {
    let settings = effective_settings(path)?;
    println!("{}", serde_json::to_string_pretty(&settings.info())?);
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    let settings = effective_settings(path)?;
    config::save_settings(path, &settings)?;
    println!("{}", path.display());
    Ok(())
}

pub fn delete_config(path: &Path) -> Result<()> {
    config::delete_settings(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindscreen_instruments::instruments::phq9;

    #[test]
    fn values_map_to_items_in_order() {
        let responses = responses_from_values(phq9::definition(), &[3, 0, 1]).unwrap();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].question_id, "phq9_1");
        assert_eq!(responses[2].value, 1);
    }

    #[test]
    fn too_many_values_are_rejected() {
        assert!(responses_from_values(phq9::definition(), &[0; 10]).is_err());
    }

    #[test]
    fn answers_file_accepts_both_shapes() {
        let values: AnswersFile = serde_json::from_str(r#"{"values": [1, 2]}"#).unwrap();
        assert!(matches!(values, AnswersFile::Values { .. }));

        let full: AnswersFile = serde_json::from_str(
            r#"[{"question_id": "phq9_1", "value": 2, "question": "q", "label": "l",
                 "timestamp": "2025-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
        assert!(matches!(full, AnswersFile::Responses(r) if r.len() == 1));
    }
}
