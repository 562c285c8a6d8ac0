use std::fs;
use std::path::PathBuf;

use overlap_ingest::{
    IngestError, load_gold_pairs, load_source_registry, load_target_registry,
};
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn loads_source_registry_with_normalized_names() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(
        &dir,
        "source.csv",
        "Drug Name,Indication,Date of Approval\n\
         Metformin Hydrochloride (Glucophage), Type 2 diabetes ,1995-03-03\n\
         Zidovudine,,\n",
    );

    let drugs = load_source_registry(&path).expect("load source");
    assert_eq!(drugs.len(), 2);
    assert_eq!(drugs[0].name, "Metformin Hydrochloride (Glucophage)");
    assert_eq!(drugs[0].normalized_name, "metformin");
    assert_eq!(drugs[0].indication, "Type 2 diabetes");
    assert_eq!(drugs[1].normalized_name, "zidovudine");
    assert_eq!(drugs[1].indication, "");
    assert_eq!(drugs[1].approval_date, "");
}

#[test]
fn loads_target_registry_with_optional_sponsor() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(
        &dir,
        "target.csv",
        "Generic Name,Trade Name,Approved Labeled Indication,Marketing Approval Date,Sponsor Company,Sponsor Country\n\
         zidovudine,Retrovir,HIV infection,03/19/1987,ViiV Healthcare,USA\n\
         imiglucerase,Cerezyme,Gaucher disease,05/23/1994,,\n",
    );

    let drugs = load_target_registry(&path).expect("load target");
    assert_eq!(drugs.len(), 2);
    assert_eq!(drugs[0].trade_normalized, "retrovir");
    let sponsor = drugs[0].sponsor.as_ref().expect("sponsor");
    assert_eq!(sponsor.company, "ViiV Healthcare");
    assert_eq!(sponsor.state, "");
    assert_eq!(sponsor.country, "USA");
    assert!(drugs[1].sponsor.is_none());
}

#[test]
fn target_without_sponsor_columns_loads() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(
        &dir,
        "target.csv",
        "Generic Name,Trade Name,Approved Labeled Indication,Marketing Approval Date\n\
         amoxicillin,Amoxil,Otitis media,1974-01-01\n",
    );
    let drugs = load_target_registry(&path).expect("load target");
    assert_eq!(drugs[0].generic_normalized, "amoxicillin");
    assert!(drugs[0].sponsor.is_none());
}

#[test]
fn missing_required_column_fails_the_load() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(&dir, "target.csv", "Generic Name,Trade Name\nzidovudine,Retrovir\n");
    let err = load_target_registry(&path).expect_err("missing columns");
    match err {
        IngestError::MissingColumn { column, .. } => {
            assert_eq!(column, "Approved Labeled Indication");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let err = load_source_registry(&dir.path().join("absent.csv")).expect_err("no file");
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn loads_gold_pairs() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_csv(
        &dir,
        "gold.csv",
        "Source Name,Target Generic Name,Notes\nlamivudin,lamivudine,typo\n,,\n",
    );
    let gold = load_gold_pairs(&path).expect("load gold");
    assert_eq!(gold.len(), 1);
    assert_eq!(gold[0].target_generic, "lamivudine");
}
