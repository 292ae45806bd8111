//! Prints the canonical form of three configurations that fall outside
//! family R: a per-prompt reference, a score-dependent weight, and a gated
//! penalty. Each carries a witness explaining the violation.

use gkpo_canonical::canonicalize_and_hash;
use serde_json::{json, Value};

fn shift() -> Value {
    json!({
        "score": {"type": "logpi"},
        "weight": {"form": "constant", "constant": 1.0},
        "reference": {"form": "per_prompt"},
        "penalties": [],
        "provenance": {"method": "DPO-like (shift)", "citations": ["yang2023orpo"]},
        "reducibility": {
            "witness": {"raw_gap": 0.20, "delta_ref_prompt1": 0.50, "delta_ref_prompt2": -0.50}
        }
    })
}

fn score() -> Value {
    json!({
        "score": {"type": "logpi"},
        "weight": {"form": "score_dependent", "score_fn": "psi_piecewise"},
        "reference": {"form": "fixed_zero", "value": 0.0},
        "penalties": [],
        "provenance": {"method": "SCORE"}
    })
}

fn gate() -> Value {
    json!({
        "score": {"type": "logpi"},
        "weight": {"form": "constant", "constant": 1.0},
        "reference": {"form": "fixed_zero", "value": 0.0},
        "penalties": [
            {"name": "phi1", "lambda": 1.0, "meta": {"gate": false}},
            {"name": "phi2_gate_on_phi1_zero", "lambda": 1.0, "meta": {"gate": true}}
        ],
        "provenance": {"method": "GATED"},
        "reducibility": {"witness": {"phi_pairs": [[1, 10], [0, 1]], "phi_value_equal": 1.0}}
    })
}

fn main() {
    for (label, raw) in [("shift", shift()), ("score", score()), ("gate", gate())] {
        let doc = canonicalize_and_hash(&raw);
        let projection = serde_json::to_string_pretty(doc.projection.as_value())
            .unwrap_or_else(|_| "{}".to_string());
        let reasons: Vec<&str> = doc.reducibility.reasons.iter().map(|r| r.as_str()).collect();

        println!("== {label}");
        println!("{projection}");
        println!("opal_hash: {}", doc.opal_hash);
        println!("inside_R: {} reasons: {:?}", doc.inside_r(), reasons);
        println!("witness: {}", doc.reducibility.witness);
    }
}
