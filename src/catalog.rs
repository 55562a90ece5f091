//! Static reference data consumed by the form flows: the brand list and the
//! gender-partitioned size chart. Loaded once as immutable configuration;
//! nothing in the client ever writes it.

use serde::{Deserialize, Serialize};

use crate::models::Gender;

/// One selectable brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: u32,
    pub value: String,
}

/// One selectable size, identified by its US size value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeOption {
    pub id: u32,
    pub us: f64,
}

/// Size options partitioned by gender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeChart {
    pub men_sizes: Vec<SizeOption>,
    pub women_sizes: Vec<SizeOption>,
}

impl SizeChart {
    /// Options offerable for the chosen gender. `None` until a gender is
    /// chosen: size selection is unavailable, not merely unvalidated.
    pub fn options_for(&self, gender: Option<Gender>) -> Option<&[SizeOption]> {
        match gender? {
            Gender::Male => Some(&self.men_sizes),
            Gender::Female => Some(&self.women_sizes),
        }
    }

    pub fn contains(&self, gender: Gender, size: f64) -> bool {
        self.options_for(Some(gender))
            .map(|options| options.iter().any(|option| option.us == size))
            .unwrap_or(false)
    }
}

/// The full immutable lookup set handed to form surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub brands: Vec<Brand>,
    pub sizes: SizeChart,
}

impl ReferenceData {
    /// Built-in catalog matching the store's stocked brands and US size
    /// ranges (men 7-13, women 5-11, half sizes included).
    pub fn builtin() -> Self {
        Self {
            brands: brand_list(&["Nike", "Adidas", "Puma", "Reebok", "New Balance"]),
            sizes: SizeChart {
                men_sizes: size_range(7.0, 13.0),
                women_sizes: size_range(5.0, 11.0),
            },
        }
    }

    /// Load a catalog from its JSON representation, e.g. a bundled
    /// `brands`/`sizes` document.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

fn brand_list(names: &[&str]) -> Vec<Brand> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| Brand {
            id: index as u32 + 1,
            value: (*name).to_string(),
        })
        .collect()
}

fn size_range(from: f64, to: f64) -> Vec<SizeOption> {
    let steps = ((to - from) * 2.0) as u32;
    (0..=steps)
        .map(|step| SizeOption {
            id: step + 1,
            us: from + f64::from(step) * 0.5,
        })
        .collect()
}
