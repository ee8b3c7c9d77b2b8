//! `medirec model ...`

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use medirec_engine::EngineConfig;
use medirec_model::{Classifier, ModelArtifact, ModelExport};

pub fn pack(config: &EngineConfig, export_path: &Path, out: &Path) -> Result<()> {
    let (symptoms, labels) = config.load_indices()?;
    let export = ModelExport::from_json_file(export_path)?;
    let artifact = ModelArtifact::pack(export, &symptoms, &labels)
        .with_context(|| format!("packing {}", export_path.display()))?;
    artifact.save(out)?;

    println!(
        "{} {} ({}, {} classes, {} features) → {}",
        "Packed".green().bold(),
        artifact.name,
        artifact.model.kind_name(),
        artifact.model.classes().len(),
        artifact.feature_count,
        out.display()
    );
    Ok(())
}

pub fn inspect(config: &EngineConfig, path: &Path, check_indices: bool) -> Result<()> {
    let (artifact, header) =
        ModelArtifact::load(path).with_context(|| format!("reading {}", path.display()))?;

    println!("{}", "Artifact".bold());
    println!("  path:            {}", path.display());
    println!("  format version:  {:#010x}", header.version);
    println!("  schema version:  {}", header.schema_version);
    println!("  flags:           {:#x}", header.flags);
    println!("  content bytes:   {}", header.content_length);
    println!("  sha256:          {}", header.content_checksum_hex());
    println!("{}", "Manifest".bold());
    println!("  name:            {}", artifact.name);
    println!("  created (unix):  {}", artifact.created_at_unix_secs);
    println!("  model:           {}", artifact.model.kind_name());
    println!("  classes:         {}", artifact.model.classes().len());
    println!("  features:        {}", artifact.feature_count);
    println!("  symptom digest:  {}", artifact.symptom_index_digest);
    println!("  label digest:    {}", artifact.label_index_digest);

    if check_indices {
        let (symptoms, labels) = config.load_indices()?;
        artifact
            .check_compatible(&symptoms, &labels)
            .context("artifact does not match the configured indices")?;
        println!("{}", "Indices match".green());
    }
    Ok(())
}
