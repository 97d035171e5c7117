use crate::content::{ContentShape, GenerationRequest, Platform, Tone};

/// System prompt for every generation call
pub fn system() -> String {
    "You are an expert marketing copywriter who writes high-converting ad copy. \
     Always respond with valid JSON only. No markdown, no code fences, no explanations."
        .to_string()
}

/// Writing instruction for a tone
pub fn tone_modifier(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "Use formal, business-appropriate language. Be authoritative and trustworthy. Focus on value propositions and credibility.",
        Tone::Emotional => "Connect emotionally with the reader. Use storytelling elements. Appeal to feelings, desires and aspirations.",
        Tone::Exciting => "Use energetic, dynamic language. Create enthusiasm and anticipation with strong action words.",
        Tone::Urgent => "Create a sense of urgency and scarcity. Use time-sensitive language such as NOW, TODAY, LIMITED.",
        Tone::Friendly => "Use a warm, conversational tone. Be approachable and relatable, as if talking to a friend.",
        Tone::Luxury => "Use sophisticated, premium language. Emphasize exclusivity and quality with words like EXCLUSIVE and PREMIUM.",
    }
}

fn platform_guidance(platform: Platform) -> &'static str {
    match platform {
        Platform::GoogleAds => "You write Google Search ads. Headline formulas that work: \
             [Number] + [Benefit] + [Timeframe], [Action Verb] + [Desire], \
             [Pain Point] + [Solution], [Urgency] + [Benefit]. \
             Keywords are high-intent search terms, comma separated.",
        Platform::Facebook => "You write Facebook feed ads. The primary text must open with a \
             scroll-stopping hook, include social proof or urgency, and end with a clear call to action. \
             The CTA is a button label such as Shop Now or Learn More.",
        Platform::Instagram => "You write Instagram posts. The caption uses a hook on the first line, \
             short paragraphs and a few emojis, and ends with a call to action. \
             Hashtags are a space separated mix of popular, niche and branded tags.",
        Platform::Seo => "You write on-page SEO copy. Title formulas: \
             [Primary Keyword] - [Benefit] | [Brand], or How to [Result] with [Solution]. \
             The meta description includes a call to action. Keywords are comma separated.",
    }
}

fn field_hint(name: &str) -> &'static str {
    match name {
        "headline" => "attention-grabbing headline",
        "description" => "benefit-focused description",
        "cta" => "call to action",
        "keywords" => "comma separated keywords",
        "primary_text" => "primary ad text with a hook",
        "caption" => "post caption",
        "story_text" => "story overlay text",
        "hashtags" => "space separated hashtags",
        "seo_title" => "SEO page title",
        "meta_description" => "meta description",
        "h1" => "H1 heading with the primary keyword",
        _ => "text",
    }
}

/// The exact JSON object the model must return for `shape`.
pub fn response_format(shape: &ContentShape) -> String {
    let lines: Vec<String> = shape
        .fields
        .iter()
        .map(|spec| {
            let hint = match spec.band {
                Some(band) => format!("{} ({})", field_hint(spec.name), band.describe()),
                None => field_hint(spec.name).to_string(),
            };
            format!("  \"{}\": \"{}\"", spec.name, hint)
        })
        .collect();
    format!("{{\n{}\n}}", lines.join(",\n"))
}

/// Full user prompt for one platform
pub fn for_platform(request: &GenerationRequest, shape: &ContentShape) -> String {
    let business_name = if request.business_name.trim().is_empty() {
        "(not given)"
    } else {
        request.business_name.trim()
    };
    let offer = if request.offer.trim().is_empty() {
        "(none)"
    } else {
        request.offer.trim()
    };

    format!(
        "{}\n\n\
         BUSINESS DETAILS:\n\
         - Business Name: {}\n\
         - Business Type: {}\n\
         - Product/Service: {}\n\
         - Target Audience: {}\n\
         - Offer: {}\n\
         - Tone: {}\n\n\
         TONE INSTRUCTIONS: {}\n\n\
         Respond with exactly this JSON object, every value a single string:\n\
         {}\n\n\
         Count characters carefully and return ONLY valid JSON.",
        platform_guidance(shape.platform),
        business_name,
        request.business_type.trim(),
        request.product.trim(),
        request.audience.trim(),
        offer,
        request.tone().name(),
        tone_modifier(request.tone()),
        response_format(shape)
    )
}
