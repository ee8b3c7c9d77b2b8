//! Shared fixtures: a small knowledge base on disk and a linear model over the
//! built-in catalogue with a few hand-set symptom weights.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use medirec_engine::EngineConfig;
use medirec_index::{ClassId, DiseaseLabelIndex, SymptomIndex};
use medirec_model::{LinearModel, LinearOneVsRest, ModelArtifact, ModelExport};

pub const FUNGAL_INFECTION: ClassId = 15;
pub const ALLERGY: ClassId = 4;
pub const GERD: ClassId = 16;
pub const COMMON_COLD: ClassId = 10;

/// Each listed class scores 1.0 per matching symptom; Common Cold carries a
/// small intercept so the all-zero vector lands there.
pub fn fixture_classifier() -> LinearOneVsRest {
    let symptoms = SymptomIndex::builtin();
    let labels = DiseaseLabelIndex::builtin();
    let classes: Vec<ClassId> = labels.iter().map(|(id, _)| id).collect();

    let mut weights = vec![vec![0.0; symptoms.len()]; classes.len()];
    let mut intercepts = vec![0.0; classes.len()];
    let profile: [(ClassId, &[&str]); 3] = [
        (FUNGAL_INFECTION, &["itching", "skin_rash", "nodal_skin_eruptions"]),
        (ALLERGY, &["continuous_sneezing", "shivering", "chills"]),
        (GERD, &["stomach_pain", "acidity", "ulcers_on_tongue"]),
    ];
    for (class_id, names) in profile {
        let row = classes.iter().position(|c| *c == class_id).unwrap();
        for name in names {
            weights[row][symptoms.position(name).unwrap()] = 1.0;
        }
    }
    let cold = classes.iter().position(|c| *c == COMMON_COLD).unwrap();
    intercepts[cold] = 0.1;

    LinearOneVsRest {
        classes,
        weights,
        intercepts,
    }
}

pub fn write_tables(dir: &Path) {
    fs::write(
        dir.join("description.csv"),
        "Disease,Description\n\
         Fungal infection,Fungal infection is a common skin condition caused by fungi.\n\
         Allergy,Allergy is an immune system reaction to a substance in the environment.\n\
         Common Cold,Common Cold is a viral infection of the upper respiratory tract.\n",
    )
    .unwrap();
    fs::write(
        dir.join("precautions_df.csv"),
        ",Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4\n\
         0,Fungal infection,bath twice,use detol or neem in bathing water,keep infected area dry,use clean cloths\n\
         1,Allergy,apply calamine,cover area with bandage,,use ice to compress itching\n\
         2,GERD,avoid fatty spicy food,avoid lying down after eating,maintain healthy weight,exercise\n",
    )
    .unwrap();
    fs::write(
        dir.join("medications.csv"),
        "Disease,Medication\n\
         Fungal infection,\"['Antifungal Cream', 'Fluconazole', 'Terbinafine', 'Clotrimazole', 'Ketoconazole']\"\n\
         Allergy,\"['Antihistamines', 'Decongestants', 'Epinephrine', 'Corticosteroids', 'Immunotherapy']\"\n\
         GERD,\"['Proton Pump Inhibitors (PPIs)', 'H2 Blockers', 'Antacids', 'Prokinetics', 'Antibiotics']\"\n",
    )
    .unwrap();
    fs::write(
        dir.join("diets.csv"),
        "Disease,Diet\n\
         Fungal infection,\"['Antifungal Diet', 'Probiotics', 'Garlic', 'Coconut oil', 'Turmeric']\"\n\
         Allergy,\"['Elimination Diet', 'Omega-3-rich foods', 'Vitamin C-rich foods', 'Quercetin-rich foods', 'Probiotics']\"\n",
    )
    .unwrap();
    fs::write(
        dir.join("workout_df.csv"),
        ",disease,workout\n\
         0,Fungal infection,Avoid sugary foods\n\
         1,Fungal infection,Consume probiotics\n\
         2,Fungal infection,Increase intake of garlic\n\
         3,Allergy,Avoid allergenic foods\n",
    )
    .unwrap();
}

/// Write tables and a packed artifact under `dir` and return a config pointing at them.
pub fn write_fixture(dir: &Path) -> EngineConfig {
    let data_dir = dir.join("dataset");
    fs::create_dir_all(&data_dir).unwrap();
    write_tables(&data_dir);

    let model_path = dir.join("svc.mrxa");
    let artifact = ModelArtifact::pack(
        ModelExport {
            name: "fixture-ovr".to_string(),
            model: LinearModel::OneVsRest(fixture_classifier()),
        },
        &SymptomIndex::builtin(),
        &DiseaseLabelIndex::builtin(),
    )
    .unwrap();
    artifact.save(&model_path).unwrap();

    EngineConfig {
        data_dir,
        model_path,
        ..EngineConfig::default()
    }
}
