//! LLM prompts for the moderation pipeline.
//!
//! The moderation prompt asks for a strict JSON verdict, but the
//! extraction ladder never assumes the model obeyed it.

/// Base prompt for moderating a post against platform policy.
pub const MODERATION_PROMPT: &str = r#"Platform Overview: an educational technology platform that helps students become computer engineers and tech scientists, with structured programs, mentoring, and progress tracking.

Task:

Analyze the given post (image and text). Use the provided post summary to determine whether the post aligns with the platform's educational and technological purpose. If the content is irrelevant, inappropriate, or non-educational, flag it for removal.

Evaluation Steps:

1. Check Educational Relevance:
   - A post is relevant if it falls under at least one of: computer science and programming, emerging technologies, engineering and innovation, career guidance, ethics of technology, industry trends and research, mathematics, cybersecurity, robotics, software development and IT infrastructure, networking, cloud computing, tech entrepreneurship, physics and electronics, technical writing, open source.
   - Removal Condition: if the image or text does not align with the above categories, flag it for removal.

2. Assess Content Safety:
   - Toxicity Score (0-100): level of harmful or inappropriate elements. Content highly irrelevant to the platform's educational goals should score high (75 or above).
   - Nudity: flag explicit, sexual, or suggestive content.
   - Violence: detect aggressive, threatening, or intimidating content.
   - War/Conflict: identify distressing war-related themes (unless educational).
   - Discrimination: flag hate speech, bias, or discriminatory remarks.
   - Removal Condition: explicit content, extreme violence, discrimination, or excessive profanity.

3. Handling of Edge Cases:
   - Gray areas with both educational and mildly inappropriate content score in the middle rather than being flagged outright.
   - Historical references discussed in an educational context are acceptable."#;

/// JSON contract appended to the moderation prompt, with the post_id
/// filled in so the model can echo it back.
const JSON_CONTRACT: &str = r#"You are a JSON extractor. Return a structured JSON in this exact format:
{
    "post_id": "{post_id}",
    "is_remove": <true/false>,
    "summary": "<brief summary of content safety, including specific assessments for nudity, violence, war, and discrimination>",
    "toxicity_score": <numeric_value between 0-100>
}
Ensure that "toxicity_score" is a valid integer between 0-100."#;

/// Prompt for a short post summary considering caption and attachment.
pub const POST_SUMMARY_PROMPT: &str = r#"Generate a concise 50-word summary of the post's content. Consider the caption: "{caption}" and the attached image at {image_url}. Focus on the main idea and key details."#;

/// Build the full moderation prompt for one unit.
pub fn format_moderation_prompt(base: &str, post_id: &str, post_summary: &str) -> String {
    let contract = JSON_CONTRACT.replace("{post_id}", post_id);
    if post_summary.trim().is_empty() {
        format!("{base}\n\n{contract}")
    } else {
        format!("{base}\n\nPost Summary: {post_summary}\n\n{contract}")
    }
}

/// Build the post-summary prompt for one unit.
pub fn format_post_summary_prompt(caption: &str, image_url: &str) -> String {
    POST_SUMMARY_PROMPT
        .replace("{caption}", caption)
        .replace("{image_url}", image_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_prompt_includes_post_id() {
        let prompt = format_moderation_prompt(MODERATION_PROMPT, "p42", "a cat photo");
        assert!(prompt.contains(r#""post_id": "p42""#));
        assert!(prompt.contains("Post Summary: a cat photo"));
    }

    #[test]
    fn test_empty_summary_omits_section() {
        let prompt = format_moderation_prompt(MODERATION_PROMPT, "p1", "");
        assert!(!prompt.contains("Post Summary:"));
    }

    #[test]
    fn test_summary_prompt_substitution() {
        let prompt = format_post_summary_prompt("my caption", "https://img.example/x.png");
        assert!(prompt.contains(r#"caption: "my caption""#));
        assert!(prompt.contains("https://img.example/x.png"));
    }
}
