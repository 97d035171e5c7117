use serde::Serialize;

use super::Platform;

/// Advisory character-length range for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthBand {
    pub min: usize,
    pub max: usize,
}

impl LengthBand {
    pub const fn up_to(max: usize) -> Self {
        Self { min: 0, max }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, text: &str) -> bool {
        let len = text.chars().count();
        len >= self.min && len <= self.max
    }

    pub fn describe(&self) -> String {
        if self.min == 0 {
            format!("max {} characters", self.max)
        } else {
            format!("{}-{} characters", self.min, self.max)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub band: Option<LengthBand>,
    /// Alternative keys models commonly answer with, usually list-valued plurals.
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

/// Cosmetic numeric estimate shown next to the copy.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize)]
pub struct ContentShape {
    pub platform: Platform,
    pub fields: &'static [FieldSpec],
    pub metrics: &'static [MetricSpec],
}

impl ContentShape {
    #[cfg(test)]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

const fn field(
    name: &'static str,
    band: Option<LengthBand>,
    aliases: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        band,
        aliases,
    }
}

// ── Shape Table ───────────────────────────────────────

static GOOGLE_ADS: ContentShape = ContentShape {
    platform: Platform::GoogleAds,
    fields: &[
        field("headline", Some(LengthBand::up_to(30)), &["headlines"]),
        field("description", Some(LengthBand::up_to(90)), &["descriptions"]),
        field("cta", Some(LengthBand::up_to(20)), &["cta_suggestions", "ctas"]),
        field("keywords", None, &["keyword"]),
    ],
    metrics: &[MetricSpec {
        name: "estimated_ctr",
        min: 2.0,
        max: 8.0,
    }],
};

static FACEBOOK: ContentShape = ContentShape {
    platform: Platform::Facebook,
    fields: &[
        field(
            "primary_text",
            Some(LengthBand::between(125, 500)),
            &["primary_texts"],
        ),
        field("headline", Some(LengthBand::up_to(40)), &["headlines"]),
        field("description", Some(LengthBand::up_to(30)), &["descriptions"]),
        field("cta", Some(LengthBand::up_to(20)), &["cta_button", "cta_buttons"]),
    ],
    metrics: &[MetricSpec {
        name: "estimated_engagement",
        min: 1.5,
        max: 6.5,
    }],
};

static INSTAGRAM: ContentShape = ContentShape {
    platform: Platform::Instagram,
    fields: &[
        field("caption", Some(LengthBand::up_to(2200)), &["captions"]),
        field("story_text", Some(LengthBand::up_to(100)), &["story_texts"]),
        field("hashtags", None, &["hashtag"]),
        field("cta", Some(LengthBand::up_to(30)), &["bio_link_cta"]),
    ],
    metrics: &[MetricSpec {
        name: "estimated_engagement",
        min: 2.0,
        max: 9.0,
    }],
};

static SEO: ContentShape = ContentShape {
    platform: Platform::Seo,
    fields: &[
        field("seo_title", Some(LengthBand::between(50, 60)), &["seo_titles", "titles"]),
        field(
            "meta_description",
            Some(LengthBand::between(150, 160)),
            &["meta_descriptions"],
        ),
        field("h1", Some(LengthBand::up_to(70)), &["h1_headings"]),
        field("keywords", None, &["primary_keywords"]),
    ],
    metrics: &[MetricSpec {
        name: "estimated_ranking_score",
        min: 40.0,
        max: 95.0,
    }],
};

pub fn shape_for(platform: Platform) -> &'static ContentShape {
    match platform {
        Platform::GoogleAds => &GOOGLE_ADS,
        Platform::Facebook => &FACEBOOK,
        Platform::Instagram => &INSTAGRAM,
        Platform::Seo => &SEO,
    }
}
