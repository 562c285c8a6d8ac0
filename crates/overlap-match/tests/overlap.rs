use overlap_match::{
    AssignmentPolicy, GoldPair, MatchOptions, OverlapMatcher, ProgressCounter, normalize_drug_name,
    sweep,
};
use overlap_model::{MatchType, SourceDrug, TargetDrug};

fn source(name: &str, indication: &str) -> SourceDrug {
    SourceDrug {
        name: name.to_string(),
        normalized_name: normalize_drug_name(name),
        indication: indication.to_string(),
        approval_date: "2001-05-17".to_string(),
    }
}

fn target(generic: &str, trade: &str, indication: &str) -> TargetDrug {
    TargetDrug {
        generic_name: generic.to_string(),
        trade_name: trade.to_string(),
        generic_normalized: normalize_drug_name(generic),
        trade_normalized: normalize_drug_name(trade),
        indication: indication.to_string(),
        approval_date: "03/19/1987".to_string(),
        sponsor: None,
    }
}

const HIV: &str = "Treatment of HIV-1 infection";
const OTITIS: &str = "Acute otitis media caused by susceptible bacteria";
const HYPERTENSION: &str = "Management of hypertension";

fn known_targets() -> Vec<TargetDrug> {
    vec![
        target("zidovudine", "Retrovir", HIV),
        target("amoxicillin", "Amoxil", OTITIS),
        target("atenolol and chlorthalidone", "Tenoretic", HYPERTENSION),
        target("placebo", "Placebox", "No therapeutic use"),
    ]
}

#[test]
fn known_pairs_match_and_novel_name_does_not() {
    let sources = vec![
        source("zidovudine", HIV),
        source("amoxicillin trihydrate", OTITIS),
        source("atenolol & chlorthalidone", HYPERTENSION),
        source("randomnovel", "Unrelated condition"),
    ];

    let counter = ProgressCounter::new();
    let matches = OverlapMatcher::new(85)
        .find_overlaps_with_progress(&sources, &known_targets(), &counter)
        .expect("prepared inputs");

    assert_eq!(counter.processed(), 4);
    let summary: Vec<_> = matches
        .iter()
        .map(|m| (m.source_name.as_str(), m.target_generic.as_str(), m.match_type))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("zidovudine", "zidovudine", MatchType::Generic),
            ("amoxicillin trihydrate", "amoxicillin", MatchType::SaltVariant),
            (
                "atenolol & chlorthalidone",
                "atenolol and chlorthalidone",
                MatchType::Generic
            ),
        ]
    );
    assert_eq!(matches[0].score, 100.0);
    assert_eq!(matches[1].score, 100.0);
    assert!(matches[2].score >= 95.0 && matches[2].score < 100.0);
}

#[test]
fn typo_name_with_unrelated_indication_is_rejected() {
    let sources = [source("pembrolisumab", "seasonal allergic rhinitis")];
    let targets = [target("pembrolizumab", "Keytruda", "metastatic melanoma")];
    let matcher = OverlapMatcher::new(85);

    let candidate = matcher
        .direct_match(&sources[0], &targets)
        .expect("candidate");
    assert!(candidate.score >= 85.0 && candidate.score < 98.0);

    let matches = matcher.find_overlaps(&sources, &targets).expect("prepared inputs");
    assert!(matches.is_empty());
}

#[test]
fn missing_indication_requires_near_certain_name() {
    let targets = [target("lamivudine", "Epivir", "")];

    let exact = OverlapMatcher::new(85)
        .find_overlaps(&[source("lamivudine", HIV)], &targets)
        .expect("prepared inputs");
    assert_eq!(exact.len(), 1);

    let typo = OverlapMatcher::new(85)
        .find_overlaps(&[source("lamivudin", HIV)], &targets)
        .expect("prepared inputs");
    assert!(typo.is_empty());
}

#[test]
fn first_claim_wins_over_later_higher_score() {
    let sources = [source("zidovudin", HIV), source("zidovudine", HIV)];
    let targets = known_targets();

    let first = OverlapMatcher::new(85)
        .find_overlaps(&sources, &targets)
        .expect("prepared inputs");
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].source_index, 0);
    assert!(first[0].score < 100.0);

    let best = OverlapMatcher::with_options(&MatchOptions {
        base_threshold: 85,
        assignment: AssignmentPolicy::HighestScore,
    })
    .find_overlaps(&sources, &targets)
    .expect("prepared inputs");
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].source_index, 1);
    assert_eq!(best[0].score, 100.0);
}

#[test]
fn looser_threshold_never_loses_recall() {
    let sources = vec![
        source("zidovudine", HIV),
        source("lamivudin", HIV),
        source("amoxicillin trihydrate", OTITIS),
        source("atenolol & chlorthalidone", HYPERTENSION),
        source("randomnovel", "Unrelated condition"),
    ];
    let mut targets = known_targets();
    targets.push(target("lamivudine", "Epivir", HIV));
    let gold = [
        GoldPair::new("zidovudine", "zidovudine"),
        GoldPair::new("lamivudin", "lamivudine"),
        GoldPair::new("amoxicillin trihydrate", "amoxicillin"),
        GoldPair::new("atenolol & chlorthalidone", "atenolol and chlorthalidone"),
    ];

    let results = sweep(&sources, &targets, &gold, &[75, 95], &MatchOptions::default())
        .expect("prepared inputs");
    let (loose, strict) = (&results[0], &results[1]);

    assert_eq!(loose.threshold, 75);
    assert_eq!(loose.recall, 1.0);
    assert_eq!(loose.precision, 1.0);
    assert_eq!(strict.recall, 0.75);
    assert_eq!(strict.precision, 1.0);
    assert!(loose.recall >= strict.recall);
}

#[test]
fn long_salt_suffix_still_matches_through_salt_normalized_names() {
    let matches = OverlapMatcher::new(85)
        .find_overlaps(
            &[source("Metformin", "Type 2 diabetes mellitus")],
            &[target("metformin hydrochloride", "Glucophage", "Type 2 diabetes mellitus")],
        )
        .expect("valid inputs");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].target_generic, "metformin hydrochloride");
    assert_eq!(matches[0].score, 100.0);
}
