//! Deterministic stand-in copy for when no usable model reply exists.
//!
//! Every value is a pure function of the [`GenerationRequest`]: template
//! variants and cosmetic metrics are picked from a SHA-256 digest of stable
//! request attributes, so repeated fallbacks for the same request render the
//! same copy.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::keywords::{extract_keywords, generate_hashtags};
use super::{
    ContentResult, ContentShape, FallbackReason, FieldSpec, GenerationRequest, LengthBand,
    MetricSpec, Platform, Source, Tone,
};

const KEYWORD_LIMIT: usize = 8;

struct Voice {
    adjective: &'static str,
    verb: &'static str,
    hook: &'static str,
    ctas: [&'static str; 3],
    closer: &'static str,
    emoji: &'static str,
}

fn voice(tone: Tone) -> Voice {
    match tone {
        Tone::Professional => Voice {
            adjective: "Trusted",
            verb: "Discover",
            hook: "Looking for dependable results?",
            ctas: ["Learn More", "Get a Quote", "Contact Us"],
            closer: "Trusted by customers who value quality.",
            emoji: "✅",
        },
        Tone::Emotional => Voice {
            adjective: "Heartfelt",
            verb: "Fall in love with",
            hook: "You deserve something special.",
            ctas: ["Feel the Difference", "Start Today", "Join Us"],
            closer: "Because the people you love deserve the best.",
            emoji: "💖",
        },
        Tone::Exciting => Voice {
            adjective: "Amazing",
            verb: "Unlock",
            hook: "Get ready for something big!",
            ctas: ["Shop Now", "Grab Yours", "Try It Today"],
            closer: "Thousands are already loving it!",
            emoji: "🚀",
        },
        Tone::Urgent => Voice {
            adjective: "Limited",
            verb: "Claim",
            hook: "Hurry, time is running out!",
            ctas: ["Buy Now", "Claim Offer", "Order Today"],
            closer: "Offer ends soon, so act now.",
            emoji: "⏰",
        },
        Tone::Friendly => Voice {
            adjective: "Friendly",
            verb: "Say hello to",
            hook: "Hey there, friend!",
            ctas: ["Get Started", "Say Hi", "Join the Fun"],
            closer: "We cannot wait to meet you.",
            emoji: "👋",
        },
        Tone::Luxury => Voice {
            adjective: "Exclusive",
            verb: "Experience",
            hook: "Crafted for the discerning few.",
            ctas: ["Reserve Now", "Request Access", "Discover More"],
            closer: "Luxury that speaks for itself.",
            emoji: "✨",
        },
    }
}

struct Context {
    platform: Platform,
    voice: Voice,
    variant: usize,
    product: String,
    audience: String,
    business: String,
    offer: String,
    keywords: Vec<String>,
}

/// Input with whitespace runs collapsed to single spaces, or `default` when blank.
fn squash(value: &str, default: &str) -> String {
    let words: Vec<&str> = value.split_whitespace().collect();
    if words.is_empty() {
        default.to_string()
    } else {
        words.join(" ")
    }
}

impl Context {
    fn new(platform: Platform, request: &GenerationRequest) -> Self {
        let voice = voice(request.tone());
        let product = squash(&request.product, "our products");
        let business = squash(
            &request.business_name,
            &squash(&request.business_type, "our business"),
        );

        let mut keywords = extract_keywords(&request.keyword_text(), KEYWORD_LIMIT);
        if keywords.is_empty() {
            keywords.push(product.to_lowercase());
        }

        let offer = match squash(&request.offer, "") {
            o if o.is_empty() => voice.closer.to_string(),
            o if o.ends_with(['.', '!', '?']) => o,
            o => format!("{}.", o),
        };

        let variant = seed(&[
            request.business_type.as_str(),
            request.product.as_str(),
            request.audience.as_str(),
            request.tone().name(),
        ]) as usize;

        Self {
            platform,
            voice,
            variant,
            product,
            audience: squash(&request.audience, "everyone"),
            business,
            offer,
            keywords,
        }
    }

    fn cta(&self) -> &'static str {
        self.voice.ctas[self.variant % self.voice.ctas.len()]
    }
}

/// Fallback result for `shape`, tagged with the reason the reply was rejected.
pub fn synthesize(
    shape: &ContentShape,
    request: &GenerationRequest,
    reason: FallbackReason,
    now: DateTime<Utc>,
) -> ContentResult {
    ContentResult {
        platform: shape.platform,
        fields: synthesize_fields(shape, request),
        metrics: metrics(shape, request),
        source: Source::Fallback,
        generated_at: now,
        fallback_reason: Some(reason),
    }
}

pub fn synthesize_fields(shape: &ContentShape, request: &GenerationRequest) -> BTreeMap<String, String> {
    let ctx = Context::new(shape.platform, request);
    shape
        .fields
        .iter()
        .map(|spec| (spec.name.to_string(), compose(spec, &ctx)))
        .collect()
}

/// Cosmetic estimates keyed off the product name, each inside its declared range.
pub fn metrics(shape: &ContentShape, request: &GenerationRequest) -> BTreeMap<String, f64> {
    shape
        .metrics
        .iter()
        .map(|spec| {
            let s = seed(&[request.product.as_str(), spec.name]);
            (spec.name.to_string(), scale(s, spec))
        })
        .collect()
}

fn compose(spec: &FieldSpec, ctx: &Context) -> String {
    let v = &ctx.voice;
    let raw = match spec.name {
        "headline" => match ctx.variant % 3 {
            0 => format!("{} {}", v.adjective, ctx.product),
            1 => format!("{} {}", v.verb, ctx.product),
            _ => format!("{} for {}", ctx.product, ctx.audience),
        },
        "description" => format!(
            "{} {} for {}. {}",
            v.adjective, ctx.product, ctx.audience, ctx.offer
        ),
        "cta" => ctx.cta().to_string(),
        "keywords" => ctx.keywords.join(", "),
        "hashtags" => generate_hashtags(&ctx.keywords, ctx.platform).join(" "),
        "primary_text" => format!(
            "{} {} from {} is made for {}. {} {}!",
            v.hook,
            ctx.product,
            ctx.business,
            ctx.audience,
            ctx.offer,
            ctx.cta()
        ),
        "caption" => format!(
            "{} {} {}!\n\n{} from {} is made for {}. {}\n\n{} 👉 link in bio\n\n{}",
            v.emoji,
            v.verb,
            ctx.product,
            ctx.product,
            ctx.business,
            ctx.audience,
            ctx.offer,
            ctx.cta(),
            generate_hashtags(&ctx.keywords, ctx.platform).join(" ")
        ),
        "story_text" => format!("{} {} {}", v.emoji, v.verb, ctx.product),
        "seo_title" => format!("{} for {} | {}", ctx.product, ctx.audience, ctx.business),
        "meta_description" => format!(
            "{} {} for {}. {}",
            v.verb, ctx.product, ctx.audience, ctx.offer
        ),
        "h1" => format!("{} {} for {}", v.adjective, ctx.product, ctx.audience),
        other => format!("{} {} {}", v.adjective, ctx.product, other.replace('_', " ")),
    };

    match spec.band {
        Some(band) => {
            let filler = if spec.name == "seo_title" {
                "Official Site"
            } else {
                v.closer
            };
            fit_to_band(&raw, band, filler)
        }
        None => raw,
    }
}

/// Pad with `filler` up to the band's minimum, then cut to its maximum,
/// preferring a word boundary that still satisfies the minimum.
fn fit_to_band(text: &str, band: LengthBand, filler: &str) -> String {
    let mut out = text.trim().to_string();
    while out.chars().count() < band.min {
        out.push(' ');
        out.push_str(filler);
    }

    if band.contains(&out) {
        return out;
    }
    let chars: Vec<char> = out.chars().collect();

    let head: String = chars[..band.max].iter().collect();
    if chars[band.max].is_whitespace() && head.trim_end().chars().count() >= band.min {
        return head.trim_end().to_string();
    }

    if let Some(idx) = head.rfind(char::is_whitespace) {
        let cut = head[..idx]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '|'));
        let len = cut.chars().count();
        if len >= band.min && len > 0 {
            return cut.to_string();
        }
    }
    // A hard cut may end inside a whitespace run; keep it only if it still fits.
    let hard = head.trim_end();
    if hard.chars().count() >= band.min {
        hard.to_string()
    } else {
        head
    }
}

fn seed(parts: &[&str]) -> u64 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.trim().to_lowercase().as_bytes());
        hasher.update([0x1f_u8]);
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn scale(seed: u64, spec: &MetricSpec) -> f64 {
    let unit = (seed % 10_001) as f64 / 10_000.0;
    let value = spec.min + unit * (spec.max - spec.min);
    ((value * 10.0).round() / 10.0).clamp(spec.min, spec.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::shape_for;

    fn request(platform: Platform, tone: &str) -> GenerationRequest {
        GenerationRequest {
            business_name: "Acme Supply".into(),
            business_type: "hardware store".into(),
            product: "Widgets".into(),
            audience: "busy contractors".into(),
            offer: "Free shipping this week".into(),
            tone: tone.into(),
            platform,
        }
    }

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn fields_match_shape_exactly() {
        for platform in Platform::ALL {
            let shape = shape_for(platform);
            let fields = synthesize_fields(shape, &request(platform, "Friendly"));
            let names: Vec<&str> = fields.keys().map(|k| k.as_str()).collect();
            let mut expected = shape.field_names();
            expected.sort();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn synthesis_is_deterministic() {
        for platform in Platform::ALL {
            let shape = shape_for(platform);
            let req = request(platform, "Urgent");
            let a = synthesize(shape, &req, FallbackReason::Unavailable, at());
            let b = synthesize(shape, &req, FallbackReason::Unavailable, at());
            assert_eq!(a.fields, b.fields);
            assert_eq!(a.metrics, b.metrics);
        }
    }

    #[test]
    fn synthesized_values_respect_length_bands() {
        let tones = ["Professional", "Emotional", "Exciting", "Urgent", "Friendly", "Luxury"];
        for platform in Platform::ALL {
            let shape = shape_for(platform);
            for tone in tones {
                let fields = synthesize_fields(shape, &request(platform, tone));
                for spec in shape.fields {
                    let value = &fields[spec.name];
                    assert!(!value.trim().is_empty(), "{} is blank", spec.name);
                    if let Some(band) = spec.band {
                        assert!(
                            band.contains(value),
                            "{}/{} ({} chars) outside {:?}: {:?}",
                            platform,
                            spec.name,
                            value.chars().count(),
                            band,
                            value
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn templates_reference_request_inputs() {
        let shape = shape_for(Platform::GoogleAds);
        let fields = synthesize_fields(shape, &request(Platform::GoogleAds, "Luxury"));
        assert!(fields["headline"].contains("Widgets"));
        assert!(fields["description"].contains("busy contractors"));
        assert!(fields["keywords"].contains("widgets"));
        assert!(voice(Tone::Luxury).ctas.contains(&fields["cta"].as_str()));

        let fb = synthesize_fields(shape_for(Platform::Facebook), &request(Platform::Facebook, "Luxury"));
        assert!(fb["primary_text"].contains("Acme Supply"));
    }

    #[test]
    fn metrics_stay_in_range_for_many_products() {
        for platform in Platform::ALL {
            let shape = shape_for(platform);
            for i in 0..200 {
                let mut req = request(platform, "Exciting");
                req.product = format!("product number {}", i);
                for spec in shape.metrics {
                    let value = metrics(shape, &req)[spec.name];
                    assert!(value >= spec.min && value <= spec.max, "{} = {}", spec.name, value);
                }
            }
        }
    }

    #[test]
    fn metrics_depend_on_product_not_tone() {
        let shape = shape_for(Platform::Instagram);
        let a = metrics(shape, &request(Platform::Instagram, "Friendly"));
        let b = metrics(shape, &request(Platform::Instagram, "Luxury"));
        assert_eq!(a, b);
    }

    #[test]
    fn blank_inputs_still_produce_copy() {
        let req = GenerationRequest {
            business_name: String::new(),
            business_type: String::new(),
            product: String::new(),
            audience: String::new(),
            offer: String::new(),
            tone: String::new(),
            platform: Platform::Seo,
        };
        let fields = synthesize_fields(shape_for(Platform::Seo), &req);
        assert!(fields.values().all(|v| !v.trim().is_empty()));
    }

    #[test]
    fn fit_to_band_cuts_on_word_boundary() {
        let out = fit_to_band("alpha beta gamma delta", LengthBand::up_to(12), "x");
        assert_eq!(out, "alpha beta");
    }

    #[test]
    fn fit_to_band_pads_to_minimum() {
        let out = fit_to_band("short", LengthBand::between(20, 40), "filler text");
        assert!(LengthBand::between(20, 40).contains(&out), "{:?}", out);
        assert!(out.starts_with("short filler text"));
    }

    #[test]
    fn fit_to_band_hard_cuts_single_long_word() {
        let out = fit_to_band("Supercalifragilistic", LengthBand::up_to(5), "x");
        assert_eq!(out, "Super");
    }

    #[test]
    fn fit_to_band_never_drops_below_minimum() {
        let band = LengthBand::between(50, 60);
        let text = format!("{} for a{}b | Acme Supply", "X".repeat(40), " ".repeat(30));
        let out = fit_to_band(&text, band, "Official Site");
        assert!(band.contains(&out), "{} chars: {:?}", out.chars().count(), out);
    }

    #[test]
    fn whitespace_padded_inputs_stay_in_band() {
        let mut req = request(Platform::Seo, "Professional");
        req.product = "X".repeat(40);
        req.audience = format!("a{}b", " ".repeat(30));
        let shape = shape_for(Platform::Seo);
        let fields = synthesize_fields(shape, &req);
        for spec in shape.fields {
            if let Some(band) = spec.band {
                assert!(band.contains(&fields[spec.name]), "{}: {:?}", spec.name, fields[spec.name]);
            }
        }
        assert!(fields["h1"].contains("a b"));
    }
}
