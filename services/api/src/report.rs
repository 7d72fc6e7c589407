use clap::Args;
use statin_advisor::config::AppConfig;
use statin_advisor::error::AppError;
use statin_advisor::evaluation::{
    classification_summary, evaluate, format, rule_guidance, AssessmentError, ClinicalMeasurement,
    EvaluationResponse, PolicySource, RuleId, ThresholdPolicy,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Creatine kinase (U/L)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) ck_value: f64,
    /// Transaminase, ALT/AST (U/L)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) transaminase: f64,
    /// Total bilirubin (mg/dL)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) bilirubin: f64,
    /// Patient reports muscle pain or weakness
    #[arg(long)]
    pub(crate) muscle_symptoms: bool,
    /// Threshold policy JSON file (overrides STATIN_POLICY_PATH)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the HTTP response body instead of the readable report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let source = match args.policy.clone() {
        Some(path) => PolicySource::File(path),
        None => AppConfig::load()?.policy,
    };
    let policy = source.load()?;

    let response = match assess_args(&args, &policy) {
        Ok(response) => response,
        Err(AssessmentError::Validation(err)) => {
            for violation in &err.errors {
                eprintln!("- {}: {}", violation.field, violation.message);
            }
            return Err(AssessmentError::Validation(err).into());
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        match serde_json::to_string_pretty(&response) {
            Ok(body) => println!("{body}"),
            Err(err) => return Err(AppError::Io(err.into())),
        }
    } else {
        print!("{}", render_report(&args, &response));
    }

    Ok(())
}

/// Build the measurement straight from parsed flags so NaN and infinities keep their own message.
fn assess_args(
    args: &EvaluateArgs,
    policy: &ThresholdPolicy,
) -> Result<EvaluationResponse, AssessmentError> {
    let measurement = ClinicalMeasurement::new(
        args.ck_value,
        args.transaminase,
        args.bilirubin,
        args.muscle_symptoms,
    )?;
    let recommendation = evaluate(&measurement, policy)?;
    Ok(format(&recommendation, &policy.version))
}

fn render_report(args: &EvaluateArgs, response: &EvaluationResponse) -> String {
    let mut lines = vec![
        "Statin recommendation".to_string(),
        format!(
            "Measurements: CK {} U/L, transaminase {} U/L, bilirubin {} mg/dL, muscle symptoms: {}",
            args.ck_value,
            args.transaminase,
            args.bilirubin,
            if args.muscle_symptoms { "yes" } else { "no" }
        ),
        format!("Policy version: {}", response.policy_version),
        format!(
            "Recommendation: {} (risk level {}) - {}",
            response.recommendation,
            response.risk_level,
            classification_summary(response.recommendation)
        ),
        String::new(),
    ];

    if response.rationale.is_empty() {
        lines.push("Rationale: no rule thresholds exceeded".to_string());
        lines.push(format!("- {}", rule_guidance(RuleId::R4)));
    } else {
        lines.push("Rationale".to_string());
        for rule in &response.rationale {
            lines.push(format!("- {}: {}", rule, rule_guidance(*rule)));
        }
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}
