use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Listing groups for technologies, derived from the technology name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Engineering,
    Textile,
    Agriculture,
    Specialized,
}

const ENGINEERING_KEYWORDS: &[&str] = &[
    "civil",
    "electrical",
    "mechanical",
    "computer",
    "electronics",
    "architecture",
    "automobile",
    "chemical",
    "food",
    "power",
    "rac",
    "mechatronics",
    "environmental",
    "telecommunication",
    "surveying",
    "construction",
    "electromedical",
];

const TEXTILE_KEYWORDS: &[&str] = &[
    "fabric",
    "fashion",
    "wet",
    "yarn",
    "apparel",
    "jute",
    "merchandising",
    "textile",
];

const AGRICULTURE_KEYWORDS: &[&str] = &["agriculture", "fisheries", "forestry"];

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Engineering,
        Category::Textile,
        Category::Agriculture,
        Category::Specialized,
    ];

    /// Classify by keyword, checking engineering, textile and agriculture
    /// in that order; anything else is specialized.
    pub fn classify(technology_name: &str) -> Self {
        let name = technology_name.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

        if matches(ENGINEERING_KEYWORDS) {
            Category::Engineering
        } else if matches(TEXTILE_KEYWORDS) {
            Category::Textile
        } else if matches(AGRICULTURE_KEYWORDS) {
            Category::Agriculture
        } else {
            Category::Specialized
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Engineering => "Engineering",
            Category::Textile => "Textile",
            Category::Agriculture => "Agriculture",
            Category::Specialized => "Specialized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "engineering" => Ok(Category::Engineering),
            "textile" => Ok(Category::Textile),
            "agriculture" => Ok(Category::Agriculture),
            "specialized" => Ok(Category::Specialized),
            other => Err(format!(
                "unknown category '{other}', expected engineering, textile, agriculture or specialized"
            )),
        }
    }
}
