//! End-to-end pair scoring scenarios.
//!
//! These pin the point table: any change to a weight, cut-off or reason
//! format shows up here first.

use person_dedupe::matching::{PairScorer, ScoringConfig, Signal, SignalPoints};
use person_dedupe::model::PersonRecord;
use person_dedupe::score_pair;

fn robert() -> PersonRecord {
    PersonRecord::new(1)
        .with_name("Robert", "Smith")
        .with_email("rsmith@uga.edu")
        .with_phone("706-555-1212")
}

fn bob() -> PersonRecord {
    PersonRecord::new(2)
        .with_name("Bob", "Smith")
        .with_email("rsmith@uga.edu")
        .with_phone("(706) 555-1212")
}

mod scenarios {
    use super::*;

    #[test]
    fn nickname_with_shared_contact_details() {
        let found = score_pair(&robert(), &bob(), 40).expect("should match");

        // last name 20 + email 25 + phone 20 + nickname 12
        assert_eq!(found.confidence, 77);
        assert!(found.reasons.iter().any(|r| r.starts_with("EXACT email match")));
        assert!(found.reasons.iter().any(|r| r.starts_with("EXACT phone match")));

        insta::assert_snapshot!(found.reasons.join("\n"), @r"
        Last name high match: Smith vs Smith (100%)
        EXACT email match: rsmith@uga.edu vs rsmith@uga.edu
        EXACT phone match: 706-555-1212 vs (706) 555-1212
        Possible nickname match: Robert vs Bob
        ");
    }

    #[test]
    fn unrelated_people_do_not_match() {
        let jane = PersonRecord::new(1).with_name("Jane", "Doe");
        let john = PersonRecord::new(2).with_name("John", "Smith");
        assert!(score_pair(&jane, &john, 40).is_none());
    }

    #[test]
    fn swapped_first_and_last_name() {
        let a = PersonRecord::new(1).with_name("Smith", "John");
        let b = PersonRecord::new(2).with_name("John", "Smith");

        let explanation = PairScorer::with_threshold(1).explain(&a, &b);
        assert!(explanation.first_name.edit_distance_pct < 30.0);
        assert!(explanation.last_name.edit_distance_pct < 30.0);

        let signals: Vec<Signal> = explanation.hits.iter().map(|h| h.signal).collect();
        assert_eq!(signals, vec![Signal::NameInversion]);
        assert_eq!(explanation.confidence, 15);
        assert!(explanation.is_match());
    }

    #[test]
    fn identical_records_saturate() {
        let a = robert().with_display_name("Bob Smith");
        let b = robert().with_display_name("Bob Smith");
        let found = score_pair(&a, &b, 100).expect("identical records always match");
        assert_eq!(found.confidence, 100);

        let explanation = PairScorer::with_threshold(100).explain(&a, &b);
        // 50 + 15 + 20 + 10 + 25 + 20
        assert_eq!(explanation.raw_total, 140);
    }
}

mod placeholders {
    use super::*;

    #[test]
    fn placeholder_emails_never_count() {
        for email in ["jdoe@placeholder.uga.edu", "jdoe@uga.edu.spoofed"] {
            let a = PersonRecord::new(1).with_email(email);
            let b = PersonRecord::new(2).with_email(email);
            let explanation = PairScorer::with_threshold(0).explain(&a, &b);
            assert!(
                explanation.hits.is_empty(),
                "{email} fired {:?}",
                explanation.hits
            );
        }
    }

    #[test]
    fn phone_needs_digits() {
        let a = PersonRecord::new(1).with_phone("n/a");
        let b = PersonRecord::new(2).with_phone("n/a");
        assert_eq!(PairScorer::with_threshold(0).explain(&a, &b).raw_total, 0);
    }
}

mod thresholds {
    use super::*;

    #[test]
    fn presets_gate_the_same_pair_differently() {
        let a = PersonRecord::new(1)
            .with_name("Catherine", "Nguyen")
            .with_email("cnguyen@uga.edu");
        let b = PersonRecord::new(2)
            .with_name("Kathryn", "Nguyen")
            .with_email("cnguyen@uga.edu");

        // first name phonetic 8 + last name 20 + email 25
        let permissive = PairScorer::new(ScoringConfig::permissive()).score(&a, &b);
        assert_eq!(permissive.map(|m| m.confidence), Some(53));
        assert!(PairScorer::new(ScoringConfig::balanced()).score(&a, &b).is_some());
        assert!(PairScorer::new(ScoringConfig::strict()).score(&a, &b).is_none());
    }

    #[test]
    fn custom_point_table() {
        let points = SignalPoints {
            nickname: 40,
            ..SignalPoints::default()
        };
        let config = ScoringConfig::strict().with_points(points);
        let a = PersonRecord::new(1).with_name("William", "Jones");
        let b = PersonRecord::new(2).with_name("Bill", "Jones");

        // last name 20 + nickname 40
        let explanation = PairScorer::new(config).explain(&a, &b);
        assert_eq!(explanation.raw_total, 60);
        assert!(!explanation.is_match());
    }
}
