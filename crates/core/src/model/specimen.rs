use serde::{Deserialize, Serialize};

/// An animal the Nature Lab can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specimen {
    pub title: String,
    /// Common name used for the facts lookup; usually equal to `title`.
    pub api_name: String,
    /// Absolute image path (already resolved against the site base).
    pub image_path: String,
}

impl Specimen {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        api_name: Option<String>,
        image_path: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let api_name = api_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| title.clone());
        Self {
            title,
            api_name,
            image_path: image_path.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    pub kingdom: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristics {
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub top_speed: Option<String>,
    #[serde(default)]
    pub lifespan: Option<String>,
    #[serde(default)]
    pub slogan: Option<String>,
}

/// Facts record as returned by the animals proxy. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalFacts {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub characteristics: Characteristics,
    #[serde(default)]
    pub locations: Vec<String>,
}

impl AnimalFacts {
    /// Display lines in fixed order; blank fields are skipped.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let ch = &self.characteristics;
        let mut lines = Vec::new();

        let mut push = |label: &str, value: Option<&String>| {
            if let Some(value) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
                lines.push(format!("{label}: {value}."));
            }
        };

        push("Fun fact", ch.slogan.as_ref());
        push("Habitat", ch.habitat.as_ref());
        push("Diet", ch.diet.as_ref());

        let locations = self
            .locations
            .iter()
            .map(|loc| loc.trim())
            .filter(|loc| !loc.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if !locations.is_empty() {
            push("Where", Some(&locations));
        }

        push("Top speed", ch.top_speed.as_ref());
        push("Lifespan", ch.lifespan.as_ref());
        push("Scientific name", self.taxonomy.scientific_name.as_ref());

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_name_defaults_to_title() {
        let specimen = Specimen::new("Red Fox", None, "/img/fox.jpg");
        assert_eq!(specimen.api_name, "Red Fox");

        let blank = Specimen::new("Red Fox", Some("  ".into()), "/img/fox.jpg");
        assert_eq!(blank.api_name, "Red Fox");

        let explicit = Specimen::new("Red Fox", Some("fox".into()), "/img/fox.jpg");
        assert_eq!(explicit.api_name, "fox");
    }

    #[test]
    fn facts_lines_follow_display_order() {
        let facts: AnimalFacts = serde_json::from_str(
            r#"{
                "name": "Cheetah",
                "taxonomy": { "scientific_name": "Acinonyx jubatus" },
                "characteristics": {
                    "habitat": "Open grassland",
                    "diet": "Carnivore",
                    "top_speed": "120 km/h",
                    "slogan": "The fastest land mammal"
                },
                "locations": ["Africa", " Asia "]
            }"#,
        )
        .unwrap();

        assert_eq!(
            facts.summary_lines(),
            vec![
                "Fun fact: The fastest land mammal.",
                "Habitat: Open grassland.",
                "Diet: Carnivore.",
                "Where: Africa, Asia.",
                "Top speed: 120 km/h.",
                "Scientific name: Acinonyx jubatus.",
            ]
        );
    }

    #[test]
    fn empty_facts_have_no_lines() {
        let facts: AnimalFacts = serde_json::from_str("{}").unwrap();
        assert!(facts.summary_lines().is_empty());
    }
}
