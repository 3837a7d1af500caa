#![allow(clippy::uninlined_format_args)]

use phishguard::analyzer::HeuristicAnalyzer;
use phishguard::verdict::Status;

/// Reference messages with the tier each one is expected to land in.
const SAMPLES: &[(&str, &str, Status)] = &[
    (
        "Friendly check-in",
        "Hello, just checking in about dinner tonight.",
        Status::Safe,
    ),
    (
        "Bank credential lure",
        "URGENT: Your bank account has been suspended. Verify your password immediately at http://secure-login.tk/verify",
        Status::Phishing,
    ),
    (
        "Newsletter link",
        "Check out our new blog post at https://example.com/blog",
        Status::Safe,
    ),
    (
        "Lookalike refund",
        "Your paypa1 account needs attention. Claim your refund today.",
        Status::Suspicious,
    ),
    (
        "Shouting prize",
        "CONGRATULATIONS!!!! You have been selected, claim your prize now at http://bit.ly/win-big",
        Status::Phishing,
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Running reference messages through the heuristic analyzer...");

    let analyzer = HeuristicAnalyzer::new();
    let mut mismatches = 0;

    for (name, text, expected) in SAMPLES {
        let report = analyzer.explain(text);
        let output = &report.output;

        println!("\n=== {} ===", name);
        println!("Text: {}", text);
        println!(
            "{} {} (risk score {})",
            output.status.icon(),
            output.status,
            output.risk_score
        );
        for reason in &output.reasons {
            println!("  • {}", reason);
        }
        for link in &report.links {
            println!(
                "  🔗 {} host={:?} suspicious={}",
                link.url, link.host, link.is_suspicious
            );
        }

        if output.status == *expected {
            println!("✅ Expected {}", expected);
        } else {
            println!("❌ Expected {}, got {}", expected, output.status);
            mismatches += 1;
        }
    }

    println!();
    if mismatches == 0 {
        println!("✅ All {} reference messages classified as expected", SAMPLES.len());
        Ok(())
    } else {
        anyhow::bail!("{} of {} reference messages misclassified", mismatches, SAMPLES.len())
    }
}
