use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target stack the generated component is written for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Framework {
    /// Baseline used by the proxy when a request names no framework
    #[default]
    #[serde(rename = "html-css")]
    HtmlCss,
    #[serde(rename = "html-css-bootstrap")]
    HtmlCssBootstrap,
    #[serde(rename = "html-tailwind-js")]
    HtmlTailwindJs,
    #[serde(rename = "html-css-js")]
    HtmlCssJs,
    #[serde(rename = "react-css")]
    ReactCss,
}

impl Framework {
    /// Stacks offered by the prompt form, in display order.
    pub const SELECTABLE: [Self; 4] = [
        Self::HtmlCssBootstrap,
        Self::HtmlTailwindJs,
        Self::HtmlCssJs,
        Self::ReactCss,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::HtmlCss => "html-css",
            Self::HtmlCssBootstrap => "html-css-bootstrap",
            Self::HtmlTailwindJs => "html-tailwind-js",
            Self::HtmlCssJs => "html-css-js",
            Self::ReactCss => "react-css",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HtmlCss => "HTML + CSS",
            Self::HtmlCssBootstrap => "HTML + CSS + Bootstrap",
            Self::HtmlTailwindJs => "HTML + Tailwind CSS + JS",
            Self::HtmlCssJs => "HTML + CSS + JS",
            Self::ReactCss => "React JS + CSS",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported framework: {0}")]
pub struct UnknownFramework(pub String);

impl FromStr for Framework {
    type Err = UnknownFramework;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "html-css" => Ok(Self::HtmlCss),
            "html-css-bootstrap" => Ok(Self::HtmlCssBootstrap),
            "html-tailwind-js" => Ok(Self::HtmlTailwindJs),
            "html-css-js" => Ok(Self::HtmlCssJs),
            "react-css" => Ok(Self::ReactCss),
            other => Err(UnknownFramework(other.to_string())),
        }
    }
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub framework: Framework,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, framework: Framework) -> Self {
        Self {
            prompt: prompt.into(),
            framework,
        }
    }
}

/// Raw provider text, fenced or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationResponse {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub generation_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,
    #[serde(default = "default_framework")]
    pub default_framework: Framework,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

const fn default_timeout() -> u64 {
    600
}

const fn default_framework() -> Framework {
    Framework::HtmlCssJs
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            request_timeout: default_timeout(),
            default_framework: default_framework(),
            theme: ThemeConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeConfig {
    pub accent_color: String,
    pub border_color: String,
    pub error_color: String,
    pub success_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent_color: "lightblue".to_string(),
            border_color: "cyan".to_string(),
            error_color: "red".to_string(),
            success_color: "green".to_string(),
        }
    }
}

/// Timing of the cosmetic progress bar, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressConfig {
    pub tick_interval_ms: u64,
    pub reset_delay_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            reset_delay_ms: 1000,
        }
    }
}
