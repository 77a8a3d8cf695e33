//! Plan request builder
//!
//! Turns `Preferences` into the instruction parts and the strict output
//! schema sent to the model.

use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{ItemType, Preferences, Weekday};
use crate::llm::{GenerateRequest, Part};
use crate::prompts::{PlanPromptContext, PromptError, PromptLoader};

/// Fill the plan template slots from the preferences
pub fn plan_prompt_context(prefs: &Preferences) -> PlanPromptContext {
    debug!(college_days = prefs.college_days.len(), "plan_prompt_context: called");
    PlanPromptContext {
        gender: prefs.gender.label().to_string(),
        college_days: join_days(prefs.college_days.iter().copied()),
        off_days: join_days(prefs.off_days()),
        start_time: prefs.start_time.to_string(),
        end_time: prefs.end_time.to_string(),
        season: prefs.season.label().to_string(),
        style: prefs.style.label().to_string(),
        notes: prefs.additional_instructions.trim().to_string(),
    }
}

fn join_days(days: impl IntoIterator<Item = Weekday>) -> String {
    days.into_iter().map(|d| d.name()).collect::<Vec<_>>().join(", ")
}

/// JSON schema the reply must follow: an array of day objects
pub fn plan_response_schema() -> Value {
    let days: Vec<&str> = Weekday::ALL.iter().map(|d| d.name()).collect();
    let item_types: Vec<&str> = ItemType::ALL.iter().map(|t| t.as_str()).collect();

    json!({
        "type": "ARRAY",
        "minItems": 7,
        "maxItems": 7,
        "items": {
            "type": "OBJECT",
            "properties": {
                "day": { "type": "STRING", "enum": days },
                "hasCollege": { "type": "BOOLEAN" },
                "outfitItems": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "id": { "type": "STRING" },
                            "name": { "type": "STRING" },
                            "type": { "type": "STRING", "enum": item_types },
                            "color": { "type": "STRING" },
                        },
                        "required": ["id", "name", "type"],
                    },
                },
                "reasoning": { "type": "STRING" },
                "weatherTip": { "type": "STRING" },
            },
            "required": ["day", "hasCollege", "outfitItems", "reasoning", "weatherTip"],
        },
    })
}

/// Build the plan generation request
///
/// With a photo, the image goes right after the instructions, followed by
/// the photo analysis addendum. Only fails if a template override is broken.
pub fn build_plan_request(prompts: &PromptLoader, prefs: &Preferences) -> Result<GenerateRequest, PromptError> {
    debug!(has_photo = prefs.photo.is_some(), "build_plan_request: called");
    let instructions = prompts.weekly_plan(&plan_prompt_context(prefs))?;
    let mut parts = vec![Part::text(instructions)];

    if let Some(photo) = &prefs.photo {
        debug!(mime_type = %photo.mime_type(), "build_plan_request: attaching photo");
        parts.push(Part::inline_data(photo.mime_type(), photo.to_base64()));
        parts.push(Part::text(prompts.photo_analysis()?));
    }

    Ok(GenerateRequest::new(parts).with_json_schema(plan_response_schema()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Photo, Season, StylePreference};
    use proptest::prelude::*;

    fn college_line(text: &str) -> &str {
        text.lines()
            .find(|l| l.trim_start().starts_with("- College Days:"))
            .expect("instructions have a college days line")
    }

    #[test]
    fn test_request_without_photo() {
        let prefs = Preferences::default();
        let request = build_plan_request(&PromptLoader::embedded_only(), &prefs).unwrap();

        assert_eq!(request.parts.len(), 1);
        assert!(!request.has_inline_data());
        assert!(request.tools.is_empty());
        assert_eq!(request.response_schema, Some(plan_response_schema()));

        let text = request.text();
        assert!(text.contains("- Gender: Female"));
        assert!(text.contains("- College Hours: 09:00 to 16:00"));
        assert!(text.contains("- Season: Spring"));
        assert!(text.contains("- Style Preference: Casual & Comfy"));
        assert!(text.contains("Days Without College: Saturday, Sunday"));
        assert!(!text.contains("photo"));
    }

    #[test]
    fn test_request_with_photo() {
        let prefs = Preferences {
            photo: Some(Photo::new("image/png", b"pixels".to_vec())),
            ..Default::default()
        };
        let request = build_plan_request(&PromptLoader::embedded_only(), &prefs).unwrap();

        assert_eq!(request.parts.len(), 3);
        match &request.parts[1] {
            Part::InlineData { mime_type, data } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(data, "cGl4ZWxz");
            }
            other => panic!("Expected inline data, got {:?}", other),
        }
        assert!(request.parts[2].as_text().unwrap().contains("skin tone"));
    }

    #[test]
    fn test_request_includes_notes() {
        let prefs = Preferences {
            season: Season::Winter,
            style: StylePreference::Streetwear,
            additional_instructions: "  I cycle to campus  ".to_string(),
            ..Default::default()
        };
        let text = build_plan_request(&PromptLoader::embedded_only(), &prefs).unwrap().text();
        assert!(text.contains("- Additional Notes: I cycle to campus\n"));
        assert!(text.contains("- Season: Winter"));
        assert!(text.contains("- Style Preference: Streetwear"));
    }

    #[test]
    fn test_schema_requires_fields() {
        let schema = plan_response_schema();
        let items = &schema["items"];
        assert_eq!(
            items["required"],
            json!(["day", "hasCollege", "outfitItems", "reasoning", "weatherTip"])
        );
        assert_eq!(items["properties"]["outfitItems"]["items"]["required"], json!(["id", "name", "type"]));
        assert_eq!(items["properties"]["day"]["enum"].as_array().map(|a| a.len()), Some(7));
        assert_eq!(
            items["properties"]["outfitItems"]["items"]["properties"]["type"]["enum"],
            json!(["top", "bottom", "outerwear", "shoes", "accessory", "other"])
        );
    }

    proptest! {
        #[test]
        fn prop_college_line_lists_exactly_selected_days(mask in 0u8..128) {
            let mut prefs = Preferences::default();
            prefs.college_days = Weekday::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, d)| d)
                .collect();

            let request = build_plan_request(&PromptLoader::embedded_only(), &prefs).unwrap();
            let text = request.text();
            let line = college_line(&text);

            for day in Weekday::ALL {
                if prefs.has_college(day) {
                    prop_assert!(line.contains(day.name()));
                } else {
                    prop_assert!(!line.contains(day.name()));
                }
            }
        }
    }
}
