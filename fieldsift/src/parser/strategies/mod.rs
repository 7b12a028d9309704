//! JSON stages for recovering a structured object from a model response.

mod direct_json;
mod embedded;
mod json_fixer;
mod key_matcher;
mod markdown;

pub use direct_json::DirectJsonStrategy;
pub use embedded::{embedded_span, EmbeddedObjectStrategy};
pub use json_fixer::{JsonFix, JsonFixerStrategy};
pub use key_matcher::{map_fields, render_value};
pub use markdown::FenceStripStrategy;

use serde_json::{Map, Value};
use tracing::debug;

use crate::{error::StageFailure, result::JsonStage};

/// A parsed JSON object, keys in serialized order.
pub type JsonObject = Map<String, Value>;

/// Trait for stages that try to read the response as a JSON object.
///
/// Each stage is a different way of finding and parsing an object in a
/// possibly messy response. A stage that does not apply returns a
/// [`StageFailure`] rather than an error.
pub trait JsonStrategy: Send + Sync + std::fmt::Debug {
    /// Returns the name of this stage for logging.
    fn name(&self) -> &'static str;

    /// Returns the stage tag reported on the extraction path.
    fn stage(&self) -> JsonStage;

    /// Attempts to read a JSON object from the input.
    fn parse(&self, input: &str) -> Result<JsonObject, StageFailure>;

    /// Returns the priority of this stage. Lower values are tried first.
    fn priority(&self) -> u8;
}

/// Parses `input` and accepts it only if it is a JSON object.
pub(crate) fn parse_object(stage: &'static str, input: &str) -> Result<JsonObject, StageFailure> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(StageFailure::new(
            stage,
            format!("parsed a {} instead of an object", value_kind(&other)),
        )),
        Err(e) => Err(StageFailure::new(stage, e.to_string())),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An object recovered by one of the stages.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonMatch {
    /// The stage that succeeded.
    pub stage: JsonStage,
    /// The recovered object.
    pub object: JsonObject,
}

/// Runs the JSON stages in priority order, stopping at the first success.
///
/// Default stages:
/// 1. DirectJsonStrategy - the whole response is an object
/// 2. EmbeddedObjectStrategy - first `{` through last `}`
/// 3. JsonFixerStrategy - the embedded span after syntax repair
/// 4. FenceStripStrategy - the response without markdown fences
#[derive(Debug)]
pub struct JsonExtractor {
    strategies: Vec<Box<dyn JsonStrategy>>,
}

impl Default for JsonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExtractor {
    /// Creates an extractor with the default stages.
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(DirectJsonStrategy),
            Box::new(EmbeddedObjectStrategy),
            Box::new(JsonFixerStrategy),
            Box::new(FenceStripStrategy::default()),
        ])
    }

    /// Creates an extractor with custom stages, sorted by priority.
    pub fn with_strategies(mut strategies: Vec<Box<dyn JsonStrategy>>) -> Self {
        strategies.sort_by_key(|s| s.priority());
        Self { strategies }
    }

    /// Tries each stage in order and returns the first object found.
    pub fn extract(&self, input: &str) -> Option<JsonMatch> {
        self.extract_with_failures(input).0
    }

    /// Like [`JsonExtractor::extract`], also returning the stages that failed.
    pub fn extract_with_failures(&self, input: &str) -> (Option<JsonMatch>, Vec<StageFailure>) {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match strategy.parse(input) {
                Ok(object) => {
                    debug!(stage = strategy.name(), keys = object.len(), "JSON stage succeeded");
                    return (
                        Some(JsonMatch {
                            stage: strategy.stage(),
                            object,
                        }),
                        failures,
                    );
                }
                Err(failure) => {
                    debug!(stage = failure.stage, reason = %failure.reason, "JSON stage failed");
                    failures.push(failure);
                }
            }
        }

        (None, failures)
    }

    /// Returns the names of all stages in priority order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}
