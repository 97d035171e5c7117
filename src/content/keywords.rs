use std::collections::{HashMap, HashSet};

use super::Platform;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "me", "more",
    "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
    "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Filler verbs and adjectives that carry no marketing signal.
const MARKETING_STOP_WORDS: &[&str] = &[
    "will", "can", "get", "make", "use", "new", "one", "also", "like", "just", "know", "take",
    "come", "see", "want", "look", "give", "think", "good", "best", "way", "need", "feel", "try",
];

const SOCIAL_TAGS: &[&str] = &["#marketing", "#business", "#entrepreneur"];

const MAX_KEYWORD_TAGS: usize = 10;
const MAX_HASHTAGS: usize = 15;

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word) || MARKETING_STOP_WORDS.contains(&word)
}

/// Most frequent meaningful words in `text`; ties keep first-appearance order.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 2 && !is_stop_word(t))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for token in tokens {
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    // Stable sort preserves first appearance among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(limit)
        .map(|s| s.to_string())
        .collect()
}

/// Hashtags for the first ten keywords, plus generic reach tags on social platforms.
pub fn generate_hashtags(keywords: &[String], platform: Platform) -> Vec<String> {
    let mut tags: Vec<String> = keywords
        .iter()
        .take(MAX_KEYWORD_TAGS)
        .map(|k| k.replace([' ', '-'], "").to_lowercase())
        .filter(|k| !k.is_empty())
        .map(|k| format!("#{}", k))
        .collect();

    if matches!(platform, Platform::Instagram | Platform::Facebook) {
        tags.extend(SOCIAL_TAGS.iter().map(|t| t.to_string()));
    }

    let mut seen = HashSet::new();
    tags.retain(|t| seen.insert(t.clone()));
    tags.truncate(MAX_HASHTAGS);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_frequency_then_first_appearance() {
        let kws = extract_keywords("Organic coffee beans. Fresh coffee for busy parents, fresh daily.", 3);
        assert_eq!(kws, vec!["coffee", "fresh", "organic"]);
    }

    #[test]
    fn drops_stop_words_and_short_tokens() {
        let kws = extract_keywords("We will get you the best of it, ok?", 10);
        assert!(kws.is_empty(), "unexpected keywords: {:?}", kws);
    }

    #[test]
    fn respects_limit() {
        let kws = extract_keywords("alpha bravo charlie delta echo foxtrot", 4);
        assert_eq!(kws.len(), 4);
    }

    #[test]
    fn hashtags_for_search_have_no_social_tags() {
        let kws = vec!["running shoes".to_string(), "trail-run".to_string()];
        let tags = generate_hashtags(&kws, Platform::GoogleAds);
        assert_eq!(tags, vec!["#runningshoes", "#trailrun"]);
    }

    #[test]
    fn hashtags_for_instagram_add_reach_tags_once() {
        let kws = vec!["marketing".to_string(), "yoga".to_string()];
        let tags = generate_hashtags(&kws, Platform::Instagram);
        assert_eq!(
            tags,
            vec!["#marketing", "#yoga", "#business", "#entrepreneur"]
        );
    }

    #[test]
    fn hashtags_are_capped() {
        let kws: Vec<String> = (0..30).map(|i| format!("word{}", i)).collect();
        let tags = generate_hashtags(&kws, Platform::Facebook);
        assert_eq!(tags.len(), 13);
        assert!(tags.len() <= MAX_HASHTAGS);
    }
}
