//! Pretrained artifact inspection

use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::forecast::{PretrainedArtifact, PretrainedCategoryModel};

use super::truncate;

pub fn cmd_artifact(file: &Path) -> Result<()> {
    // Unlike forecasting, inspection reports why an artifact is unusable
    let artifact = PretrainedArtifact::read(file)
        .with_context(|| format!("Failed to read artifact {}", file.display()))?;

    print!("{}", render_artifact(&artifact));
    Ok(())
}

pub fn render_artifact(artifact: &PretrainedArtifact) -> String {
    let mut out = String::new();
    out.push_str("\n🧠 Pretrained Artifact\n");
    out.push_str(&format!("   Version:    {}\n", artifact.version));
    out.push_str(&format!(
        "   Trained at: {}\n",
        artifact.trained_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str("   ─────────────────────────────────────────────────────\n");
    out.push_str(&format!(
        "   {:25} │ {:>10} │ {:>4} │ {}\n",
        "Model", "Intercept", "Lags", "Coefficients"
    ));
    out.push_str("   ──────────────────────────┼────────────┼──────┼─────────\n");

    let row = |name: &str, model: &PretrainedCategoryModel| {
        let coefficients = model
            .lags
            .iter()
            .map(|c| format!("{:.3}", c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "   {:25} │ {:>10.2} │ {:>4} │ {}\n",
            truncate(name, 25),
            model.intercept,
            model.lag_order(),
            coefficients
        )
    };

    for (category, model) in &artifact.categories {
        out.push_str(&row(category, model));
    }
    match &artifact.default {
        Some(model) => out.push_str(&row("(default)", model)),
        None => out.push_str("   (no default model)\n"),
    }
    out
}
