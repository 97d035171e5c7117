pub mod extract;
pub mod interpret;
pub mod keywords;
pub mod shape;
pub mod synth;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use interpret::interpret;
pub use shape::{shape_for, ContentShape, FieldSpec, LengthBand, MetricSpec};

// ── Platform ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    GoogleAds,
    Facebook,
    Instagram,
    Seo,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::GoogleAds,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Seo,
    ];

    /// Accepts the wire id (`google_ads`) as well as the form label (`Google Ads`).
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "google_ads" | "google" => Some(Self::GoogleAds),
            "facebook" => Some(Self::Facebook),
            "instagram" => Some(Self::Instagram),
            "seo" | "seo_content" => Some(Self::Seo),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::GoogleAds => "google_ads",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Seo => "seo",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GoogleAds => "Google Ads",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Seo => "SEO Content",
        }
    }

    pub fn shape(&self) -> &'static ContentShape {
        shape_for(*self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ── Tone ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Professional,
    Emotional,
    Exciting,
    Urgent,
    Friendly,
    Luxury,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Emotional,
        Tone::Exciting,
        Tone::Urgent,
        Tone::Friendly,
        Tone::Luxury,
    ];

    /// Unknown or empty tones map to `Professional`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "emotional" => Self::Emotional,
            "exciting" => Self::Exciting,
            "urgent" => Self::Urgent,
            "friendly" => Self::Friendly,
            "luxury" => Self::Luxury,
            _ => Self::Professional,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Emotional => "Emotional",
            Self::Exciting => "Exciting",
            Self::Urgent => "Urgent",
            Self::Friendly => "Friendly",
            Self::Luxury => "Luxury",
        }
    }
}

// ── Request ───────────────────────────────────────────

/// One user-initiated generation: what the business sells, to whom, and where.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub business_name: String,
    pub business_type: String,
    pub product: String,
    pub audience: String,
    #[serde(default)]
    pub offer: String,
    /// Blank means "use the configured default tone".
    #[serde(default)]
    pub tone: String,
    pub platform: Platform,
}

impl GenerationRequest {
    pub fn tone(&self) -> Tone {
        Tone::parse(&self.tone)
    }

    /// Names of required inputs that are blank.
    pub fn missing_inputs(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.business_type.trim().is_empty() {
            missing.push("business_type");
        }
        if self.product.trim().is_empty() {
            missing.push("product");
        }
        if self.audience.trim().is_empty() {
            missing.push("audience");
        }
        missing
    }

    /// Text the keyword extractor runs over.
    pub fn keyword_text(&self) -> String {
        format!("{} {} {}", self.product, self.audience, self.offer)
    }

    /// Same request aimed at another platform.
    pub fn for_platform(&self, platform: Platform) -> Self {
        Self {
            platform,
            ..self.clone()
        }
    }
}

// ── Result ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Api,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Fallback => "fallback",
        }
    }
}

/// Why a reply was replaced by synthesized copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No reply text: no provider enabled, or every provider failed.
    Unavailable,
    /// Reply had no `{ ... }` span.
    NoObject,
    /// The `{ ... }` span was not valid JSON.
    Malformed,
    /// Valid JSON that lacks at least one declared field.
    Incomplete,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::NoObject => "no_object",
            Self::Malformed => "malformed",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ad copy for one platform. `fields` always holds exactly the shape's field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResult {
    pub platform: Platform,
    pub fields: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
    pub source: Source,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
}

impl ContentResult {
    #[cfg(test)]
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(|s| s.as_str()).unwrap_or("")
    }
}
