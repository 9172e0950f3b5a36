// End-to-end analysis scenarios
// Requests enter as JSON, exactly as the CLI and upstream callers send them.

use std::io::Write;

use dialectic_engine::tracing::init_test_tracing;
use dialectic_engine::{AnalysisPool, AttackPolicy, CancellationToken, Engine, EngineConfig};
use dialectic_types::{
    AnalysisReport, AnalysisRequest, BiasSeverity, BiasType, PatternType, PropositionId, Satisfiability,
    Severity, WarningKind,
};
use pretty_assertions::assert_eq;

fn request(json: &str) -> AnalysisRequest {
    serde_json::from_str(json).expect("request json")
}

fn analyze(json: &str) -> AnalysisReport {
    init_test_tracing();
    Engine::new(EngineConfig::default()).unwrap().analyze(&request(json))
}

fn ids(list: &[&str]) -> Vec<PropositionId> {
    list.iter().map(|&id| id.into()).collect()
}

const DAIRY: &str = r#"{
    "propositions": [
        {"id": "P1", "statement": "I love cow milk", "formalExpression": "loves(user, cow_milk)", "type": "claim", "confidence": "high"},
        {"id": "P2", "statement": "I hate all cow products", "formalExpression": "cow_product(cow_milk) → hates(user, cow_milk)", "type": "claim", "confidence": "high"},
        {"id": "P3", "statement": "Milk is a cow product", "formalExpression": "cow_product(cow_milk)", "type": "evidence", "confidence": "high"}
    ],
    "relationships": [
        {"id": "r1", "fromId": "P1", "toId": "P2", "type": "contradicts", "strength": "strong"}
    ]
}"#;

#[test]
fn test_scenario_a_contradiction_with_proof() {
    let report = analyze(DAIRY);

    assert_eq!(report.satisfiability, Satisfiability::Unsat);
    assert_eq!(report.contradictions.len(), 1);
    let contradiction = &report.contradictions[0];
    assert_eq!(contradiction.id, "contradiction-1");
    assert_eq!(contradiction.minimal_core, ids(&["P1", "P2", "P3"]));
    assert_eq!(contradiction.proposition_ids, ids(&["P1", "P2", "P3"]));
    assert_eq!(contradiction.severity, Severity::Critical);
    assert!(contradiction.formal_proof.concludes_bottom());
    assert!(contradiction.human_explanation.contains("\"I love cow milk\""));
    assert!(!report.degraded);

    let annotation = &report.annotations[0];
    assert_eq!(annotation.contradiction_count, 1);
}

#[test]
fn test_scenario_b_circular_support() {
    let report = analyze(
        r#"{
        "propositions": [
            {"id": "A", "formalExpression": "a", "type": "claim", "confidence": "medium"},
            {"id": "B", "formalExpression": "b", "type": "claim", "confidence": "medium"},
            {"id": "C", "formalExpression": "c", "type": "claim", "confidence": "medium"}
        ],
        "relationships": [
            {"id": "r1", "fromId": "A", "toId": "B", "type": "supports"},
            {"id": "r2", "fromId": "B", "toId": "C", "type": "supports"},
            {"id": "r3", "fromId": "C", "toId": "A", "type": "supports"}
        ]
    }"#,
    );

    let circular: Vec<_> = report.fallacies_of(PatternType::Circular).collect();
    assert_eq!(circular.len(), 1);
    assert_eq!(circular[0].cycle_path, Some(ids(&["A", "B", "C", "A"])));
    assert_eq!(report.satisfiability, Satisfiability::Sat);
}

#[test]
fn test_scenario_c_hasty_generalization() {
    let report = analyze(
        r#"{
        "propositions": [
            {"id": "c1", "statement": "Every startup fails", "type": "claim", "confidence": "high"},
            {"id": "a1", "statement": "Markets are hard", "type": "assumption", "confidence": "medium"}
        ],
        "relationships": [
            {"id": "r1", "fromId": "a1", "toId": "c1", "type": "supports"}
        ]
    }"#,
    );

    let hasty: Vec<_> = report.fallacies_of(PatternType::HastyGeneralization).collect();
    assert_eq!(hasty.len(), 1);
    assert_eq!(hasty[0].affected_node_ids, ids(&["c1"]));
}

#[test]
fn test_hasty_generalization_requires_high_confidence() {
    let report = analyze(
        r#"{
        "propositions": [
            {"id": "c1", "statement": "Nobody reads manuals", "type": "claim", "confidence": "unstated_as_absolute"},
            {"id": "e1", "statement": "My team skips them", "type": "evidence", "confidence": "medium"}
        ],
        "relationships": [
            {"id": "r1", "fromId": "e1", "toId": "c1", "type": "supports"}
        ]
    }"#,
    );

    assert_eq!(report.fallacies_of(PatternType::HastyGeneralization).count(), 0);
}

#[test]
fn test_structural_biases_are_reported() {
    let report = analyze(
        r#"{
        "propositions": [
            {"id": "a1", "statement": "Bigger deals are better", "type": "assumption", "confidence": "unstated_as_absolute"},
            {"id": "c1", "statement": "We should chase enterprise", "type": "claim", "confidence": "medium"},
            {"id": "e1", "type": "evidence"},
            {"id": "e2", "type": "evidence"}
        ],
        "relationships": [
            {"id": "r1", "fromId": "e1", "toId": "c1", "type": "supports"},
            {"id": "r2", "fromId": "e2", "toId": "c1", "type": "supports"}
        ]
    }"#,
    );

    let anchoring: Vec<_> = report.biases_of(BiasType::Anchoring).collect();
    assert_eq!(anchoring.len(), 1);
    assert_eq!(anchoring[0].affected_node_ids, ids(&["a1"]));

    let confirmation: Vec<_> = report.biases_of(BiasType::Confirmation).collect();
    assert_eq!(confirmation.len(), 1);
    assert_eq!(confirmation[0].id, "bias-confirmation-1");
    assert_eq!(confirmation[0].affected_node_ids, ids(&["c1", "e1", "e2"]));
    // c1 sits on the only shortest path between e1 and e2
    assert_eq!(confirmation[0].severity, BiasSeverity::High);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["biases"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_scenario_d_consistent_independent_set() {
    let report = analyze(
        r#"{
        "propositions": [
            {"id": "p1", "formalExpression": "rain → wet_streets", "type": "claim", "confidence": "medium"},
            {"id": "p2", "formalExpression": "rain", "type": "evidence", "confidence": "high"},
            {"id": "p3", "formalExpression": "¬snow ∧ cold", "type": "evidence", "confidence": "low"}
        ]
    }"#,
    );

    assert_eq!(report.satisfiability, Satisfiability::Sat);
    assert!(report.contradictions.is_empty());
    assert!(report.fallacies.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.dependency_order, ids(&["p1", "p2", "p3"]));
}

#[test]
fn test_scenario_e_dangling_reference() {
    let report = analyze(
        r#"{
        "propositions": [
            {"id": "p1", "formalExpression": "x", "type": "claim", "confidence": "medium"},
            {"id": "p2", "formalExpression": "¬x", "type": "claim", "confidence": "medium"}
        ],
        "relationships": [
            {"id": "r1", "fromId": "p1", "toId": "ghost", "type": "supports"}
        ]
    }"#,
    );

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::DanglingReference);
    assert_eq!(report.satisfiability, Satisfiability::Unsat);
    assert_eq!(report.contradictions[0].minimal_core, ids(&["p1", "p2"]));
    assert_eq!(report.contradictions[0].severity, Severity::Major);
}

#[test]
fn test_malformed_expression_is_reported_and_asserted() {
    let report = analyze(
        r#"{
        "propositions": [
            {"id": "p1", "formalExpression": "a ∧ (b", "type": "claim", "confidence": "medium"},
            {"id": "p2", "formalExpression": "a", "type": "claim", "confidence": "medium"}
        ]
    }"#,
    );
    assert_eq!(report.satisfiability, Satisfiability::Sat);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::ParseFailure);
}

#[test]
fn test_deeply_nested_expression_degrades_to_parse_failure() {
    let nested = format!("{}A", "¬".repeat(200_000));
    let json = serde_json::json!({
        "propositions": [
            {"id": "p1", "formalExpression": nested, "type": "claim", "confidence": "medium"},
            {"id": "p2", "formalExpression": "b", "type": "claim", "confidence": "medium"}
        ]
    });
    let report = analyze(&json.to_string());

    assert_eq!(report.satisfiability, Satisfiability::Sat);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::ParseFailure);
    assert!(report.warnings[0].message.contains("nests deeper than"));
}

#[test]
fn test_empty_request() {
    let report = analyze("{}");
    assert_eq!(report, AnalysisReport::empty(vec![]));
}

#[test]
fn test_attack_policy_is_configurable() {
    let json = r#"{
        "propositions": [
            {"id": "p1", "formalExpression": "x", "type": "claim", "confidence": "medium"},
            {"id": "p2", "formalExpression": "y", "type": "claim", "confidence": "medium"}
        ],
        "relationships": [
            {"id": "r1", "fromId": "p1", "toId": "p2", "type": "attacks"}
        ]
    }"#;
    assert_eq!(analyze(json).satisfiability, Satisfiability::Sat);

    let engine = Engine::new(EngineConfig::new().with_attack_policy(AttackPolicy::Contradicts)).unwrap();
    let report = engine.analyze(&request(json));
    assert_eq!(report.satisfiability, Satisfiability::Unsat);
    assert_eq!(report.contradictions.len(), 1);
}

#[test]
fn test_exhausted_step_budget_is_unknown_and_degraded() {
    let json = r#"{
        "propositions": [
            {"id": "p1", "formalExpression": "a ∨ b", "type": "claim"},
            {"id": "p2", "formalExpression": "a ∨ ¬b", "type": "claim"},
            {"id": "p3", "formalExpression": "¬a ∨ b", "type": "claim"},
            {"id": "p4", "formalExpression": "¬a ∨ ¬b", "type": "claim"}
        ]
    }"#;
    init_test_tracing();
    let engine = Engine::new(EngineConfig::new().with_max_steps(1)).unwrap();
    let report = engine.analyze(&request(json));
    assert_eq!(report.satisfiability, Satisfiability::Unknown);
    assert!(report.degraded);
    assert!(report.warnings.iter().any(|w| w.kind == WarningKind::SolverTimeout));
}

#[test]
fn test_step_budget_only_bounds_the_contradiction_half() {
    let json = r#"{
        "propositions": [
            {"id": "p1", "formalExpression": "a ∨ b", "type": "claim"},
            {"id": "p2", "formalExpression": "a ∨ ¬b", "type": "claim"},
            {"id": "p3", "formalExpression": "¬a ∨ b", "type": "claim"},
            {"id": "p4", "formalExpression": "¬a ∨ ¬b", "type": "claim"}
        ],
        "relationships": [
            {"id": "r1", "fromId": "p1", "toId": "p2", "type": "depends_on"},
            {"id": "r2", "fromId": "p2", "toId": "p1", "type": "depends_on"}
        ]
    }"#;
    init_test_tracing();
    let engine = Engine::new(EngineConfig::new().with_max_steps(1)).unwrap();
    let report = engine.analyze(&request(json));
    assert_eq!(report.satisfiability, Satisfiability::Unknown);
    assert_eq!(report.fallacies_of(PatternType::Circular).count(), 1);
    assert!(!report
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::CycleBudgetExhausted));
}

#[test]
fn test_cancelled_request_is_degraded() {
    init_test_tracing();
    let token = CancellationToken::new();
    token.cancel();
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let report = engine.analyze_with_token(&request(DAIRY), &token);
    assert_eq!(report.satisfiability, Satisfiability::Unknown);
    assert!(report.degraded);
    assert!(report.contradictions.is_empty());
    assert!(report.warnings.iter().any(|w| w.kind == WarningKind::Cancelled));
}

#[test]
fn test_reports_are_deterministic() {
    let first = analyze(DAIRY);
    let second = analyze(DAIRY);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_pool_preserves_request_order() {
    init_test_tracing();
    let pool = AnalysisPool::new(EngineConfig::new().with_worker_threads(2)).unwrap();
    let requests = vec![request(DAIRY), request("{}"), request(DAIRY)];
    let reports = pool.analyze_batch(&requests);
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].satisfiability, Satisfiability::Unsat);
    assert_eq!(reports[1].satisfiability, Satisfiability::Sat);
    assert_eq!(reports[0], reports[2]);
}

#[test]
fn test_engine_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[solver]\nmax_contradictions = 1\n\n[graph]\nmax_cycle_length = 3").unwrap();
    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.solver.max_contradictions, 1);
    assert_eq!(config.graph.max_cycle_length, 3);

    let report = Engine::new(config).unwrap().analyze(&request(
        r#"{
        "propositions": [
            {"id": "a", "formalExpression": "x", "type": "claim"},
            {"id": "b", "formalExpression": "¬x", "type": "claim"},
            {"id": "c", "formalExpression": "y", "type": "claim"},
            {"id": "d", "formalExpression": "¬y", "type": "claim"}
        ]
    }"#,
    ));
    assert_eq!(report.contradictions.len(), 1);

    assert!(EngineConfig::from_file(file.path().with_extension("missing")).is_err());
}
