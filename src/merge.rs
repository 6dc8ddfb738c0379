use crate::model::{ClassificationDocument, EntityMap, Style, Tone};

/// Fold one chunk's classification into the running aggregate.
///
/// Rules:
/// - entity lists: ordered union, first-seen order, no duplicates
/// - tone and style: the sub-record with the highest confidence wins;
///   ties keep the earlier one
/// - safety flags: `requires_review` is OR-accumulated, sensitive
///   domains are an ordered union, severity takes the maximum
///
/// Associative, and deterministic for a fixed chunk order; the tie-break
/// makes it non-commutative, which is what keeps output reproducible.
pub fn merge_document(aggregate: &mut ClassificationDocument, doc: &ClassificationDocument) {
    merge_entities(&mut aggregate.entities, &doc.entities);

    // An aggregate still holding the identity tone/style must yield to the
    // incoming document even at equal (zero) confidence, so merging into
    // the identity always reproduces the input exactly.
    if doc.tone.confidence > aggregate.tone.confidence || aggregate.tone == Tone::default() {
        aggregate.tone = doc.tone.clone();
    }
    if doc.style.confidence > aggregate.style.confidence || aggregate.style == Style::default() {
        aggregate.style = doc.style.clone();
    }

    extend_unique(
        &mut aggregate.safety_flags.sensitive_domains,
        &doc.safety_flags.sensitive_domains,
    );
    aggregate.safety_flags.severity = aggregate
        .safety_flags
        .severity
        .max(doc.safety_flags.severity);
    aggregate.safety_flags.requires_review |= doc.safety_flags.requires_review;
}

fn merge_entities(aggregate: &mut EntityMap, incoming: &EntityMap) {
    extend_unique(&mut aggregate.people, &incoming.people);
    extend_unique(&mut aggregate.tools, &incoming.tools);
    extend_unique(&mut aggregate.brands, &incoming.brands);
    extend_unique(&mut aggregate.products, &incoming.products);
    extend_unique(&mut aggregate.organizations, &incoming.organizations);
}

fn extend_unique(dst: &mut Vec<String>, src: &[String]) {
    for value in src {
        if !dst.contains(value) {
            dst.push(value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SafetyFlags, Severity};

    fn doc(tone_primary: &str, tone_conf: f64, people: &[&str]) -> ClassificationDocument {
        ClassificationDocument {
            entities: EntityMap {
                people: people.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            tone: Tone {
                primary: tone_primary.to_string(),
                secondary: vec![],
                confidence: tone_conf,
            },
            style: Style {
                primary: "conversational".to_string(),
                confidence: tone_conf,
            },
            safety_flags: SafetyFlags::default(),
        }
    }

    #[test]
    fn test_identity_law() {
        let input = ClassificationDocument {
            safety_flags: SafetyFlags {
                sensitive_domains: vec!["medical".to_string()],
                severity: Severity::High,
                requires_review: true,
            },
            ..doc("excited", 0.7, &["Ada"])
        };

        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &input);
        assert_eq!(aggregate, input);
    }

    #[test]
    fn test_identity_law_zero_confidence() {
        let input = doc("calm", 0.0, &[]);
        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &input);
        assert_eq!(aggregate, input);
    }

    #[test]
    fn test_higher_confidence_wins() {
        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &doc("calm", 0.4, &[]));
        merge_document(&mut aggregate, &doc("excited", 0.9, &[]));

        assert_eq!(aggregate.tone.primary, "excited");
        assert_eq!(aggregate.tone.confidence, 0.9);
    }

    #[test]
    fn test_equal_confidence_keeps_first() {
        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &doc("calm", 0.5, &[]));
        merge_document(&mut aggregate, &doc("excited", 0.5, &[]));

        assert_eq!(aggregate.tone.primary, "calm");
    }

    #[test]
    fn test_lower_confidence_does_not_replace() {
        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &doc("excited", 0.9, &[]));
        merge_document(&mut aggregate, &doc("calm", 0.4, &[]));

        assert_eq!(aggregate.tone.primary, "excited");
    }

    #[test]
    fn test_entity_dedup_preserves_first_seen_order() {
        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &doc("", 0.0, &["Ada"]));
        merge_document(&mut aggregate, &doc("", 0.0, &["Ada", "Grace"]));

        assert_eq!(aggregate.entities.people, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_requires_review_or_is_idempotent() {
        let flagged = ClassificationDocument {
            safety_flags: SafetyFlags {
                requires_review: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &flagged);
        let after_first = aggregate.clone();
        merge_document(&mut aggregate, &flagged);

        assert_eq!(aggregate, after_first);
        assert!(aggregate.safety_flags.requires_review);
    }

    #[test]
    fn test_requires_review_is_monotonic() {
        let mut aggregate = ClassificationDocument::default();
        merge_document(
            &mut aggregate,
            &ClassificationDocument {
                safety_flags: SafetyFlags {
                    requires_review: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        merge_document(&mut aggregate, &ClassificationDocument::default());

        assert!(aggregate.safety_flags.requires_review);
    }

    #[test]
    fn test_severity_takes_maximum() {
        let severities = [Severity::Low, Severity::High, Severity::Medium];
        let mut aggregate = ClassificationDocument::default();
        for severity in severities {
            merge_document(
                &mut aggregate,
                &ClassificationDocument {
                    safety_flags: SafetyFlags {
                        severity,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            );
        }

        assert_eq!(aggregate.safety_flags.severity, Severity::High);
    }

    #[test]
    fn test_sensitive_domains_union() {
        let flags = |domains: &[&str]| ClassificationDocument {
            safety_flags: SafetyFlags {
                sensitive_domains: domains.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut aggregate = ClassificationDocument::default();
        merge_document(&mut aggregate, &flags(&["medical"]));
        merge_document(&mut aggregate, &flags(&["medical", "financial"]));

        assert_eq!(
            aggregate.safety_flags.sensitive_domains,
            vec!["medical", "financial"]
        );
    }
}
