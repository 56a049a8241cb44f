//! One generation run, from a validated plan to the written artifact.

use chrono::Datelike;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::PopulationError;
use crate::generator::PopulationGenerator;
use crate::locality::{Locality, LocalityRegistry};
use crate::reference::ReferenceData;
use crate::settings::GenerationPlan;
use crate::sink::{OutputTarget, WriteSummary, output_file_name, write_population};

/// Runs a plan: resolves the locality, loads the reference data, then
/// streams generated records into the output artifact.
///
/// The locality is resolved before any file is read or written, so an
/// unknown code leaves the output directory untouched. Without a seed a
/// random one is drawn and logged so the run can be repeated.
///
/// # Errors
///
/// Returns [`PopulationError`] if the registry or locality is invalid, the
/// reference data cannot be loaded, a record cannot be generated, or the
/// artifact cannot be written.
pub fn run(plan: &GenerationPlan) -> Result<WriteSummary, PopulationError> {
    let registry = plan
        .locality_registry
        .as_deref()
        .map_or_else(|| Ok(LocalityRegistry::builtin()), LocalityRegistry::from_file)?;
    let locality = registry.find_locality(&plan.locality_code)?;
    info!(
        locality = locality.code(),
        display_name = locality.display_name(),
        count = plan.count,
        min_age = plan.ages.min(),
        max_age = plan.ages.max(),
        format = %plan.format,
        "resolved locality"
    );

    let reference = ReferenceData::load(&plan.data_dir, locality, plan.allow_empty_postcode)?;

    let seed = plan.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "seeding record generator");
    let mut generator = PopulationGenerator::new(
        &reference,
        generator_config(plan, locality),
        ChaCha8Rng::seed_from_u64(seed),
    )?;

    let target = output_target(plan, locality);
    let summary = write_population(&target, generator.records(plan.count))?;
    Ok(summary)
}

fn generator_config(plan: &GenerationPlan, locality: &Locality) -> GeneratorConfig {
    GeneratorConfig {
        male_chance: plan.male_chance,
        trans_chance: plan.trans_chance,
        ages: plan.ages,
        reference_date: plan.reference_date,
        phone_prefix: locality.phone_prefix().to_owned(),
        province: locality.province().to_owned(),
    }
}

fn output_target(plan: &GenerationPlan, locality: &Locality) -> OutputTarget {
    OutputTarget {
        directory: plan.output_dir.clone(),
        file_name: output_file_name(locality.code(), plan.reference_date.year(), plan.format),
        format: plan.format,
        table_name: plan.table_name.clone(),
    }
}
