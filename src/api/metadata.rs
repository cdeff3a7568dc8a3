//! Describes the tool and its externally settable parameters.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<&'static str>>,
    pub default: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub app_version: &'static str,
    pub app_license: &'static str,
    pub parameters: Vec<ParameterSpec>,
}

pub fn app_metadata() -> AppMetadata {
    AppMetadata {
        name: "Chyron Recognition",
        description: "Detects chyrons and generates time segments with transcriptions.",
        app_version: env!("CARGO_PKG_VERSION"),
        app_license: "MIT",
        parameters: vec![
            ParameterSpec {
                name: "timeUnit",
                param_type: "string",
                choices: Some(vec!["frames", "milliseconds"]),
                default: "frames",
                description: "Unit for output time frames.",
            },
            ParameterSpec {
                name: "sampleRatio",
                param_type: "integer",
                choices: None,
                default: "5",
                description: "Frequency to sample frames.",
            },
            ParameterSpec {
                name: "minFrameCount",
                param_type: "integer",
                choices: None,
                default: "10",
                description: "Minimum number of frames a segment must span to be included.",
            },
            ParameterSpec {
                name: "threshold",
                param_type: "number",
                choices: None,
                default: "0.5",
                description: "Threshold from 0-1; lower accepts more potential chyrons.",
            },
        ],
    }
}
