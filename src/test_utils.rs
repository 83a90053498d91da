//! Test utilities for Formchat
//!
//! Scripted stand-ins for the completion and weather providers, plus a few
//! small helpers for temporary files and error assertions.

use crate::error::{FormchatError, Result};
use crate::providers::{CompletionProvider, CompletionResponse};
use crate::weather::{ConditionsRecord, WeatherProvider};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Completion provider that replays a script of responses
///
/// Every prompt it receives is recorded. When the script runs out it
/// answers with an error so unexpected calls show up in assertions.
#[derive(Debug, Default)]
pub struct StubCompletionProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl StubCompletionProvider {
    /// Stub that answers once with `text`
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Ok(text.to_string())])
    }

    /// Stub that fails once with `message`
    pub fn failing(message: &str) -> Self {
        Self::scripted(vec![Err(message.to_string())])
    }

    /// Stub that plays back `script` in order
    pub fn scripted(script: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of calls made
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for StubCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::new(text)),
            Some(Err(message)) => Err(FormchatError::Provider(message).into()),
            None => Err(FormchatError::Provider("stub script exhausted".to_string()).into()),
        }
    }

    fn model(&self) -> String {
        "stub-model".to_string()
    }
}

/// Weather provider with one fixed outcome
#[derive(Debug)]
pub struct StubWeatherProvider {
    outcome: std::result::Result<ConditionsRecord, String>,
    places: Mutex<Vec<String>>,
}

impl StubWeatherProvider {
    /// Stub that always returns `record`
    pub fn returning(record: ConditionsRecord) -> Self {
        Self {
            outcome: Ok(record),
            places: Mutex::new(Vec::new()),
        }
    }

    /// Stub that always fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            places: Mutex::new(Vec::new()),
        }
    }

    /// Places looked up so far
    pub fn places(&self) -> Vec<String> {
        self.places.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for StubWeatherProvider {
    async fn current_conditions(&self, place: &str) -> Result<ConditionsRecord> {
        self.places.lock().unwrap().push(place.to_string());
        self.outcome
            .clone()
            .map_err(|message| FormchatError::Weather(message).into())
    }
}

/// Conditions used by the weather scenarios
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

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error's display contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T, E: std::fmt::Display>(
    result: std::result::Result<T, E>,
    expected: &str,
) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_completion_replays_script() {
        let stub = StubCompletionProvider::scripted(vec![Ok("a".into()), Err("down".into())]);
        assert_eq!(stub.complete("p1").await.unwrap().text, "a");
        assert_eq!(stub.complete("p2").await.unwrap_err().to_string(), "down");
        assert!(stub.complete("p3").await.is_err());
        assert_eq!(stub.prompts(), vec!["p1", "p2", "p3"]);
        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn test_stub_weather_records_places() {
        let stub = StubWeatherProvider::returning(goa_conditions());
        let record = stub.current_conditions("Goa").await.unwrap();
        assert_eq!(record.country, "IN");
        assert_eq!(stub.places(), vec!["Goa"]);

        let failing = StubWeatherProvider::failing("city not found");
        assert_error_contains(failing.current_conditions("Atlantis").await, "city not found");
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: std::result::Result<(), FormchatError> = Ok(());
        assert_error_contains(result, "error");
    }
}
