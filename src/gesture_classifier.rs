use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::finger_state::FingerStates;
use crate::types::{FingerId, FingerState, GestureLabel};

/// Regla de la tabla de gestos: dedos que deben estar estirados y dedos que
/// deben estar doblados. Un dedo que no aparece en ninguna lista vale
/// cualquiera de los dos estados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureRule {
    pub label: GestureLabel,
    #[serde(default)]
    pub straight: BTreeSet<FingerId>,
    #[serde(default)]
    pub bent: BTreeSet<FingerId>,
}

impl GestureRule {
    /// Regla con los cinco dedos fijados: los de `straight` estirados, el resto doblados
    pub fn exact(label: GestureLabel, straight: &[FingerId]) -> Self {
        let straight: BTreeSet<FingerId> = straight.iter().copied().collect();
        let bent = FingerId::DIGITS
            .iter()
            .copied()
            .filter(|f| !straight.contains(f))
            .collect();
        Self {
            label,
            straight,
            bent,
        }
    }

    pub fn matches(&self, states: &FingerStates) -> bool {
        let all_in = |fingers: &BTreeSet<FingerId>, want: FingerState| {
            fingers.iter().all(|f| states.get(*f) == Some(want))
        };
        all_in(&self.straight, FingerState::Straight) && all_in(&self.bent, FingerState::Bent)
    }
}

/// Tabla por defecto, evaluada en orden
pub fn default_rules() -> Vec<GestureRule> {
    use FingerId::*;
    use GestureLabel as G;

    vec![
        GestureRule::exact(G::OpenPalm, &[Thumb, Index, Middle, Ring, Pinky]),
        GestureRule::exact(G::Fist, &[]),
        GestureRule::exact(G::Point, &[Index]),
        GestureRule::exact(G::Peace, &[Index, Middle]),
        GestureRule::exact(G::Three, &[Index, Middle, Ring]),
        GestureRule::exact(G::Three, &[Thumb, Index, Middle]),
        GestureRule::exact(G::Four, &[Index, Middle, Ring, Pinky]),
        GestureRule::exact(G::ThumbsUp, &[Thumb]),
        GestureRule::exact(G::Call, &[Thumb, Pinky]),
        GestureRule::exact(G::Rock, &[Index, Pinky]),
        GestureRule::exact(G::Love, &[Thumb, Index, Pinky]),
    ]
}

/// Traduce el estado de los dedos a una etiqueta de gesto.
/// Gana la primera regla que encaja; si ninguna encaja devuelve `fallback`.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    rules: Vec<GestureRule>,
    fallback: GestureLabel,
}

impl GestureClassifier {
    pub fn new(rules: Vec<GestureRule>, fallback: GestureLabel) -> Self {
        Self { rules, fallback }
    }

    pub fn classify(&self, states: &FingerStates) -> GestureLabel {
        self.rules
            .iter()
            .find(|rule| rule.matches(states))
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }

    /// Etiquetas distintas que puede devolver, incluida la de respaldo
    pub fn get_labels(&self) -> Vec<GestureLabel> {
        let mut labels: Vec<GestureLabel> = self.rules.iter().map(|r| r.label).collect();
        labels.push(self.fallback);
        labels.sort();
        labels.dedup();
        labels
    }

    pub fn rules(&self) -> &[GestureRule] {
        &self.rules
    }

    pub fn fallback(&self) -> GestureLabel {
        self.fallback
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(default_rules(), GestureLabel::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn states(straight: [bool; 5]) -> FingerStates {
        FingerStates::new(straight.map(|s| {
            if s {
                FingerState::Straight
            } else {
                FingerState::Bent
            }
        }))
    }

    #[test]
    fn test_default_vocabulary() {
        let c = GestureClassifier::default();
        let cases = [
            ([true, true, true, true, true], GestureLabel::OpenPalm),
            ([false, false, false, false, false], GestureLabel::Fist),
            ([false, true, false, false, false], GestureLabel::Point),
            ([false, true, true, false, false], GestureLabel::Peace),
            ([false, true, true, true, false], GestureLabel::Three),
            ([true, true, true, false, false], GestureLabel::Three),
            ([false, true, true, true, true], GestureLabel::Four),
            ([true, false, false, false, false], GestureLabel::ThumbsUp),
            ([true, false, false, false, true], GestureLabel::Call),
            ([false, true, false, false, true], GestureLabel::Rock),
            ([true, true, false, false, true], GestureLabel::Love),
        ];
        for (pattern, expected) in cases {
            assert_eq!(c.classify(&states(pattern)), expected, "{:?}", pattern);
        }
    }

    #[test]
    fn test_unmapped_combination_falls_back() {
        let c = GestureClassifier::default();
        // solo el anular estirado
        assert_eq!(
            c.classify(&states([false, false, false, true, false])),
            GestureLabel::Unknown
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            GestureRule {
                label: GestureLabel::Point,
                straight: [FingerId::Index].into_iter().collect(),
                bent: BTreeSet::new(),
            },
            GestureRule::exact(GestureLabel::Peace, &[FingerId::Index, FingerId::Middle]),
        ];
        let c = GestureClassifier::new(rules, GestureLabel::Unknown);
        // Peace también encaja, pero la regla de Point va primero
        assert_eq!(
            c.classify(&states([false, true, true, false, false])),
            GestureLabel::Point
        );
    }

    #[test]
    fn test_empty_table_always_falls_back() {
        let c = GestureClassifier::new(Vec::new(), GestureLabel::Unknown);
        assert_eq!(c.classify(&states([true; 5])), GestureLabel::Unknown);
    }

    #[test]
    fn test_get_labels_includes_fallback_once() {
        let labels = GestureClassifier::default().get_labels();
        let threes = labels.iter().filter(|l| **l == GestureLabel::Three);
        assert_eq!(threes.count(), 1);
        assert!(labels.contains(&GestureLabel::Unknown));
        assert!(!labels.contains(&GestureLabel::None));
    }

    #[test]
    fn test_rule_parses_from_json() {
        let json = r#"{"label": "rock", "straight": ["index", "pinky"]}"#;
        let rule: GestureRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.label, GestureLabel::Rock);
        assert!(rule.bent.is_empty());
        assert!(rule.matches(&states([true, true, false, false, true])));
    }

    proptest! {
        #[test]
        fn prop_every_partition_resolves(pattern in prop::array::uniform5(any::<bool>())) {
            let c = GestureClassifier::default();
            let s = states(pattern);
            let label = c.classify(&s);
            prop_assert_ne!(label, GestureLabel::None);
            prop_assert_eq!(label, c.classify(&s));
        }
    }
}
