//! # Pasted-Text Ingredient Parsing
//!
//! Local, offline fallback for the recipe scan: turns pasted ingredient
//! lines ("200 grams flour", "2 eggs") into model ingredients without
//! calling the extraction service. Lines that do not look like a quantity
//! followed by a name are reported back as unparsed rather than dropped, so
//! the form can show the user what needs manual entry.
//!
//! Unit synonyms map onto the six model units; anything the pattern cannot
//! name (cups, tablespoons) is out of scope here and left to the external
//! service.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::pantry_model::{Ingredient, Unit};

/// Result of parsing a block of pasted text
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedScan {
    /// Successfully parsed ingredients, in input order
    pub ingredients: Vec<Ingredient>,
    /// Lines the pattern could not interpret
    pub unparsed_lines: Vec<String>,
}

impl ParsedScan {
    /// Fraction of non-empty lines that parsed (1.0 for empty input)
    pub fn success_rate(&self) -> f32 {
        let total = self.ingredients.len() + self.unparsed_lines.len();
        if total == 0 {
            return 1.0;
        }
        self.ingredients.len() as f32 / total as f32
    }
}

// Quantity, optional unit word, then the ingredient name. A missing unit
// word means a count measurement ("4 eggs" -> 4 units).
const LINE_PATTERN: &str = r"(?i)^\s*(\d+(?:[.,]\d+)?)\s*(grams?|gr|g|kilograms?|kilos?|kg|liters?|litres?|l|units?|pieces?|pcs|cans?|tins?|packs?|packets?|pkg)?\.?\s+(.+?)\s*$";

lazy_static! {
    static ref LINE_REGEX: Regex =
        Regex::new(LINE_PATTERN).expect("Ingredient line pattern should be valid");
}

/// Line-oriented parser for pasted ingredient text
pub struct IngredientLineParser;

impl IngredientLineParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a block of text, one candidate ingredient per line.
    ///
    /// Blank lines are skipped entirely; lines with a recognizable
    /// `quantity [unit] name` shape become ingredients, the rest land in
    /// `unparsed_lines`.
    pub fn parse(&self, text: &str) -> ParsedScan {
        let mut result = ParsedScan {
            ingredients: Vec::new(),
            unparsed_lines: Vec::new(),
        };

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match self.parse_line(line) {
                Some(ingredient) => result.ingredients.push(ingredient),
                None => {
                    debug!("Could not parse ingredient line: {line}");
                    result.unparsed_lines.push(line.to_string());
                }
            }
        }

        result
    }

    fn parse_line(&self, line: &str) -> Option<Ingredient> {
        let caps = LINE_REGEX.captures(line)?;

        let quantity: f64 = caps[1].replace(',', ".").parse().ok()?;
        if quantity <= 0.0 {
            return None;
        }
        let unit = caps
            .get(2)
            .map_or(Unit::Units, |m| normalize_unit(m.as_str()));
        let name = clean_name(&caps[3]);
        if name.is_empty() {
            return None;
        }

        Some(Ingredient::new(&name, quantity, unit))
    }
}

impl Default for IngredientLineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a matched unit word onto a model unit
fn normalize_unit(word: &str) -> Unit {
    match word.to_lowercase().as_str() {
        "g" | "gr" | "gram" | "grams" => Unit::Grams,
        "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" => Unit::Kg,
        "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liters,
        "can" | "cans" | "tin" | "tins" => Unit::Cans,
        "pack" | "packs" | "packet" | "packets" | "pkg" => Unit::Packs,
        _ => Unit::Units,
    }
}

/// Strip list markers and connective words off the ingredient name
fn clean_name(raw: &str) -> String {
    let name = raw.trim().trim_start_matches(&['-', '*', '•'][..]).trim();
    let lowered = name.to_lowercase();
    for prefix in ["of ", "de "] {
        if lowered.starts_with(prefix) {
            return name[prefix.len()..].trim().to_string();
        }
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedScan {
        IngredientLineParser::new().parse(text)
    }

    #[test]
    fn test_basic_lines_parse() {
        let result = parse("200 grams flour\n2 kg potatoes\n1.5 liters milk");

        assert_eq!(result.ingredients.len(), 3);
        assert_eq!(
            result.ingredients[0],
            Ingredient::new("flour", 200.0, Unit::Grams)
        );
        assert_eq!(
            result.ingredients[1],
            Ingredient::new("potatoes", 2.0, Unit::Kg)
        );
        assert_eq!(
            result.ingredients[2],
            Ingredient::new("milk", 1.5, Unit::Liters)
        );
    }

    #[test]
    fn test_unit_synonyms() {
        let result = parse("500g flour\n2 tins tomatoes\n1 pkg yeast\n3 pcs carrots");

        assert_eq!(result.ingredients[0].unit, Unit::Grams);
        assert_eq!(result.ingredients[1].unit, Unit::Cans);
        assert_eq!(result.ingredients[2].unit, Unit::Packs);
        assert_eq!(result.ingredients[3].unit, Unit::Units);
    }

    #[test]
    fn test_count_only_lines_become_units() {
        let result = parse("4 eggs");
        assert_eq!(result.ingredients[0], Ingredient::new("eggs", 4.0, Unit::Units));
    }

    #[test]
    fn test_decimal_comma_quantities() {
        let result = parse("1,5 kg chicken");
        assert_eq!(result.ingredients[0].quantity, 1.5);
    }

    #[test]
    fn test_connective_words_stripped() {
        let result = parse("200 grams of flour\n500 g de beurre");
        assert_eq!(result.ingredients[0].name, "flour");
        assert_eq!(result.ingredients[1].name, "beurre");
    }

    #[test]
    fn test_list_markers_stripped() {
        let result = parse("2 cans - crushed tomatoes");
        assert_eq!(result.ingredients[0].name, "crushed tomatoes");
    }

    #[test]
    fn test_unparseable_lines_are_reported() {
        let result = parse("200 grams flour\nsalt to taste\na pinch of love");

        assert_eq!(result.ingredients.len(), 1);
        assert_eq!(
            result.unparsed_lines,
            vec!["salt to taste".to_string(), "a pinch of love".to_string()]
        );
        assert!(result.success_rate() < 0.5);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let result = parse("\n\n200 grams flour\n\n");
        assert_eq!(result.ingredients.len(), 1);
        assert!(result.unparsed_lines.is_empty());
        assert_eq!(result.success_rate(), 1.0);
    }

    #[test]
    fn test_empty_input_has_full_success_rate() {
        assert_eq!(parse("").success_rate(), 1.0);
    }
}
