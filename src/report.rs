//! Collection reports
//!
//! Folds per-question analyses into counts, a rule family distribution
//! and the list of questions that need attention.

use crate::engine::{Engine, QuestionAnalysis};
use crate::question::Question;
use crate::rule::RuleType;
use crate::validate::Verdict;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Analyze every question of a collection
pub fn analyze_collection(engine: &Engine, questions: &[Question]) -> CollectionReport {
    let analyses: Vec<QuestionAnalysis> = questions.iter().map(|q| engine.analyze(q)).collect();
    let report = CollectionReport::from_analyses(&analyses);
    info!(
        total = report.total,
        valid = report.valid_count,
        invalid = report.invalid_count,
        success_rate = report.success_rate,
        "collection analyzed"
    );
    report
}

/// Summary of a collection of questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    /// RFC 3339 UTC timestamp
    pub generated_at: String,
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Questions with at least one warning
    pub warning_count: usize,
    pub rule_type_distribution: BTreeMap<RuleType, usize>,
    /// Invalid questions, in input order
    pub issues: Vec<ReportIssue>,
    /// Percentage of valid questions, 0 for an empty collection
    pub success_rate: f64,
}

/// A question that did not pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub rule_type: RuleType,
    pub verdict: Verdict,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CollectionReport {
    pub fn from_analyses(analyses: &[QuestionAnalysis]) -> Self {
        let mut report = CollectionReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total: analyses.len(),
            valid_count: 0,
            invalid_count: 0,
            warning_count: 0,
            rule_type_distribution: BTreeMap::new(),
            issues: Vec::new(),
            success_rate: 0.0,
        };

        for analysis in analyses {
            *report
                .rule_type_distribution
                .entry(analysis.rule_type)
                .or_insert(0) += 1;

            if analysis.valid {
                report.valid_count += 1;
            } else {
                report.invalid_count += 1;
                report.issues.push(ReportIssue {
                    question_id: analysis.question_id.clone(),
                    rule_type: analysis.rule_type,
                    verdict: analysis.verdict,
                    errors: analysis.errors.clone(),
                    warnings: analysis.warnings.clone(),
                });
            }

            if !analysis.warnings.is_empty() {
                report.warning_count += 1;
            }
        }

        if report.total > 0 {
            report.success_rate = report.valid_count as f64 / report.total as f64 * 100.0;
        }
        report
    }

    /// Whether the success rate reaches `min_success_rate` percent
    pub fn meets_threshold(&self, min_success_rate: f64) -> bool {
        self.total > 0 && self.success_rate >= min_success_rate
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();

        out.push_str("COLLECTION REPORT\n");
        out.push_str("═══════════════════════════════════════════════════════════════\n\n");

        out.push_str(&format!("Generated: {}\n", self.generated_at));
        out.push_str(&format!("  Questions: {}\n", self.total));
        out.push_str(&format!("  Valid: {}\n", self.valid_count));
        out.push_str(&format!("  Invalid: {}\n", self.invalid_count));
        out.push_str(&format!("  With warnings: {}\n", self.warning_count));
        out.push_str(&format!("  Success rate: {:.1}%\n\n", self.success_rate));

        if !self.rule_type_distribution.is_empty() {
            out.push_str("Rule types:\n");
            for (rule_type, count) in &self.rule_type_distribution {
                out.push_str(&format!("  {:<22} {}\n", rule_type.as_str(), count));
            }
            out.push('\n');
        }

        if !self.issues.is_empty() {
            out.push_str("Issues:\n");
            for issue in &self.issues {
                out.push_str(&format!(
                    "  {} [{}] {}\n",
                    issue.question_id.as_deref().unwrap_or("(no id)"),
                    issue.rule_type,
                    issue.verdict
                ));
                for error in &issue.errors {
                    out.push_str(&format!("    ✗ {}\n", error));
                }
                for warning in &issue.warnings {
                    out.push_str(&format!("    ⚠ {}\n", warning));
                }
            }
        }

        out
    }
}
