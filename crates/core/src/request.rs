use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::preferences::SubmittableSelection;
use crate::knowledge::KnowledgeStore;

const ROLE_INSTRUCTIONS: &str = "You are a material scientist that is an expert in outdoor gear.";

const INPUT_INSTRUCTIONS: &str = "Based on the user's input of:\n\
- intended activity\n\
- weather conditions\n\
- material preferences\n\
- sustainability preferences\n\
- activity description\n\n\
Return EXACTLY 3 suggested outdoor brands.";

const OUTPUT_FORMAT: &str = r#"STRICT OUTPUT FORMAT (must be valid JSON with an object at the root):
{
  "suggestions": [
    {
      "brand": "string",
      "brand_eco_score": 0.0,
      "avg_price": 0.0,
      "materials": ["material 1", "material 2"],
      "material_eco_scores": {"material 1": 0.0, "material 2": 0.0},
      "alternative_materials": ["alt material 1", "alt material 2"],
      "reasoning": "why this brand was chosen"
    }
  ]
}
"#;

/// Everything the model needs for one recommendation: fixed instructions
/// with the reference knowledge embedded, plus the user's preferences.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationRequest {
    pub system_instructions: String,
    pub user_payload: Value,
}

pub struct RequestBuilder<'a> {
    knowledge: &'a KnowledgeStore,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(knowledge: &'a KnowledgeStore) -> Self {
        Self { knowledge }
    }

    pub fn system_instructions(&self) -> String {
        format!(
            "{ROLE_INSTRUCTIONS}\n\n\
             Knowledge sources:\n\
             1. brand_profiles.json = {}\n\
             2. materials_profiles.json = {}\n\n\
             {INPUT_INSTRUCTIONS}\n\n\
             {OUTPUT_FORMAT}",
            self.knowledge.brand_profiles(),
            self.knowledge.materials_profiles(),
        )
    }

    pub fn build(&self, selection: &SubmittableSelection) -> RecommendationRequest {
        let selection = selection.selection();
        RecommendationRequest {
            system_instructions: self.system_instructions(),
            user_payload: json!({
                "activity": selection.activities(),
                "weather": selection.weather_conditions(),
                "materials": selection.material_preferences(),
                "sustainability": selection.sustainability_preferences(),
                "description": selection.free_text().unwrap_or(""),
            }),
        }
    }
}
