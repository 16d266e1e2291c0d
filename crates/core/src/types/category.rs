//! Item categories.
//!
//! The service labels every item with one of five categories. Labels are
//! sent as the Russian display strings and are shown verbatim on cards; the
//! card styling uses a short latin modifier looked up from [`Category::modifier`].

use serde::{Deserialize, Serialize};

/// Error returned when a category label is not one of the known five.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

/// Item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "другое")]
    Other,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "кнопка")]
    Button,
    #[serde(rename = "хард-скил")]
    HardSkill,
}

/// Category to CSS modifier lookup table.
const MODIFIERS: [(Category, &str); 5] = [
    (Category::SoftSkill, "soft"),
    (Category::Other, "other"),
    (Category::Additional, "additional"),
    (Category::Button, "button"),
    (Category::HardSkill, "hard"),
];

impl Category {
    /// All categories, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::SoftSkill,
        Self::Other,
        Self::Additional,
        Self::Button,
        Self::HardSkill,
    ];

    /// The label used by the service and displayed on cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoftSkill => "софт-скил",
            Self::Other => "другое",
            Self::Additional => "дополнительное",
            Self::Button => "кнопка",
            Self::HardSkill => "хард-скил",
        }
    }

    /// CSS modifier appended to `<block>__category_` for this category.
    #[must_use]
    pub fn modifier(self) -> &'static str {
        MODIFIERS
            .iter()
            .find(|(category, _)| *category == self)
            .map_or("other", |(_, modifier)| modifier)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}
