//! Ordered role rules. The first predicate that holds decides the role.

use crate::config::AnalysisConfig;
use crate::dataset::SemanticType;
use crate::types::MlRole;
use crate::utils::ratio;

/// Column facts the role rules look at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleInput {
    pub semantic_type: SemanticType,
    pub distinct: usize,
    pub rows: usize,
}

pub(crate) type RulePredicate = fn(&RuleInput, &AnalysisConfig) -> bool;

/// Role rules in priority order. `Unknown` is the catch-all.
pub(crate) const ROLE_RULES: &[(MlRole, RulePredicate)] = &[
    (MlRole::Identifier, is_identifier),
    (MlRole::BinaryCategorical, is_binary_categorical),
    (MlRole::LowCardinalityCategorical, is_low_cardinality),
    (MlRole::Numerical, is_numerical),
    (MlRole::Datetime, is_datetime),
    (MlRole::Unknown, |_, _| true),
];

pub(crate) fn classify(input: &RuleInput, config: &AnalysisConfig) -> MlRole {
    ROLE_RULES
        .iter()
        .find(|(_, predicate)| predicate(input, config))
        .map(|(role, _)| *role)
        .unwrap_or(MlRole::Unknown)
}

fn is_identifier(input: &RuleInput, config: &AnalysisConfig) -> bool {
    input.rows > 0
        && (input.distinct == input.rows
            || (input.semantic_type.is_textual()
                && ratio(input.distinct, input.rows) > config.identifier_ratio))
}

/// Text, booleans, and integers with few distinct values.
fn passes_categorical_gate(input: &RuleInput, config: &AnalysisConfig) -> bool {
    input.semantic_type.is_textual()
        || (input.semantic_type == SemanticType::Integer
            && input.distinct < config.categorical_max_distinct)
}

fn is_binary_categorical(input: &RuleInput, config: &AnalysisConfig) -> bool {
    passes_categorical_gate(input, config) && input.distinct == 2
}

fn is_low_cardinality(input: &RuleInput, config: &AnalysisConfig) -> bool {
    passes_categorical_gate(input, config)
        && (3..config.categorical_max_distinct).contains(&input.distinct)
}

fn is_numerical(input: &RuleInput, _config: &AnalysisConfig) -> bool {
    input.semantic_type.is_numeric()
}

fn is_datetime(input: &RuleInput, _config: &AnalysisConfig) -> bool {
    input.semantic_type.is_temporal()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(semantic_type: SemanticType, distinct: usize, rows: usize) -> MlRole {
        classify(
            &RuleInput {
                semantic_type,
                distinct,
                rows,
            },
            &AnalysisConfig::default(),
        )
    }

    #[test]
    fn test_all_distinct_is_identifier_for_any_type() {
        assert_eq!(role(SemanticType::Text, 10, 10), MlRole::Identifier);
        assert_eq!(role(SemanticType::Integer, 10, 10), MlRole::Identifier);
        assert_eq!(role(SemanticType::Float, 10, 10), MlRole::Identifier);
        assert_eq!(role(SemanticType::Temporal, 10, 10), MlRole::Identifier);
    }

    #[test]
    fn test_near_unique_text_is_identifier() {
        assert_eq!(role(SemanticType::Text, 97, 100), MlRole::Identifier);
        // Numeric near-unique columns stay numerical
        assert_eq!(role(SemanticType::Float, 97, 100), MlRole::Numerical);
    }

    #[test]
    fn test_identifier_wins_over_binary() {
        // Two rows with two values: all distinct
        assert_eq!(role(SemanticType::Text, 2, 2), MlRole::Identifier);
    }

    #[test]
    fn test_binary() {
        assert_eq!(role(SemanticType::Text, 2, 100), MlRole::BinaryCategorical);
        assert_eq!(role(SemanticType::Boolean, 2, 100), MlRole::BinaryCategorical);
        assert_eq!(role(SemanticType::Integer, 2, 100), MlRole::BinaryCategorical);
        // Float with two values is not categorical
        assert_eq!(role(SemanticType::Float, 2, 100), MlRole::Numerical);
    }

    #[test]
    fn test_low_cardinality_bounds() {
        assert_eq!(
            role(SemanticType::Text, 3, 100),
            MlRole::LowCardinalityCategorical
        );
        assert_eq!(
            role(SemanticType::Integer, 24, 100),
            MlRole::LowCardinalityCategorical
        );
        assert_eq!(role(SemanticType::Integer, 25, 100), MlRole::Numerical);
    }

    #[test]
    fn test_datetime() {
        assert_eq!(role(SemanticType::Temporal, 40, 100), MlRole::Datetime);
    }

    #[test]
    fn test_unknown_fallthrough() {
        assert_eq!(role(SemanticType::Unknown, 5, 100), MlRole::Unknown);
        // Free text with many repeated values matches no rule
        assert_eq!(role(SemanticType::Text, 60, 100), MlRole::Unknown);
        // All-missing text column
        assert_eq!(role(SemanticType::Text, 0, 100), MlRole::Unknown);
    }

    #[test]
    fn test_empty_dataset_is_never_identifier() {
        assert_eq!(role(SemanticType::Text, 0, 0), MlRole::Unknown);
        assert_eq!(role(SemanticType::Float, 0, 0), MlRole::Numerical);
    }

    #[test]
    fn test_rule_order() {
        let order: Vec<MlRole> = ROLE_RULES.iter().map(|(role, _)| *role).collect();
        assert_eq!(
            order,
            vec![
                MlRole::Identifier,
                MlRole::BinaryCategorical,
                MlRole::LowCardinalityCategorical,
                MlRole::Numerical,
                MlRole::Datetime,
                MlRole::Unknown,
            ]
        );
    }
}
