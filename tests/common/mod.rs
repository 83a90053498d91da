use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

use formchat::error::{FormchatError, Result};
use formchat::providers::{CompletionProvider, CompletionResponse};
use formchat::weather::{ConditionsRecord, WeatherProvider};

/// Completion provider that replays scripted outcomes and records prompts
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(script: Vec<std::result::Result<&str, &str>>) -> Self {
        let script = script
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::new(text)),
            Some(Err(message)) => Err(FormchatError::Provider(message).into()),
            None => panic!("provider called more times than scripted"),
        }
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

/// Weather provider with a fixed outcome
#[allow(dead_code)]
pub struct FixedWeather(pub std::result::Result<ConditionsRecord, String>);

#[async_trait]
impl WeatherProvider for FixedWeather {
    async fn current_conditions(&self, _place: &str) -> Result<ConditionsRecord> {
        self.0
            .clone()
            .map_err(|message| FormchatError::Weather(message).into())
    }
}

#[allow(dead_code)]
pub fn goa_conditions() -> ConditionsRecord {
    ConditionsRecord {
        country: "IN".to_string(),
        description: "clear sky".to_string(),
        wind_speed: 3.1,
        wind_direction_degrees: 200,
        humidity_percent: 60,
        temp_current_c: 30.0,
        temp_max_c: 32.0,
        temp_min_c: 28.0,
        cloud_cover_percent: 10,
    }
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
