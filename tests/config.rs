use assert_matches::assert_matches;

use kira_interactome::config::{Config, ConfigLoader, SourceEntry, SourceEntryObject};
use kira_interactome::domain::SourceKind;
use kira_interactome::error::InteractomeError;
use kira_interactome::output::OutputSchema;

fn empty_config() -> Config {
    Config {
        schema_version: None,
        data_dir: None,
        output_dir: None,
        protein_catalog: None,
        gene_catalog: None,
        sources: Vec::new(),
        blacklist: None,
        curated: None,
        complexes: None,
        source_precedence: Vec::new(),
        float_precision: None,
        write_intermediates: None,
    }
}

#[test]
fn parse_config_sources() {
    let config = Config {
        sources: vec![
            SourceEntry::Shorthand("imex:imex_interactions.txt".to_string()),
            SourceEntry::Detailed(SourceEntryObject {
                kind: SourceKind::Innatedb,
                path: Some("innatedb.txt".to_string()),
                output: Some("innate.csv".to_string()),
                schema: Some(OutputSchema::Interactions),
            }),
        ],
        ..empty_config()
    };

    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.data_dir, "data");
    assert_eq!(resolved.output_dir, "out");
    assert_eq!(resolved.sources[0].schema, OutputSchema::Interactions);
    assert_eq!(resolved.sources[0].output, "interactions_imex.csv");
    assert_eq!(resolved.sources[1].output, "innate.csv");
    assert_eq!(resolved.sources[1].schema, OutputSchema::Interactions);
}

#[test]
fn innatedb_defaults_to_pair_schema() {
    let config = Config {
        sources: vec![SourceEntry::Shorthand("innatedb:innate.txt".to_string())],
        ..empty_config()
    };
    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.sources[0].schema, OutputSchema::Pairs);
}

#[test]
fn rejects_unknown_source_and_missing_path() {
    let config = Config {
        sources: vec![SourceEntry::Shorthand("biogrid:b.txt".to_string())],
        ..empty_config()
    };
    assert_matches!(
        ConfigLoader::resolve_config(config),
        Err(InteractomeError::UnknownSource(_))
    );

    let config = Config {
        sources: vec![SourceEntry::Detailed(SourceEntryObject {
            kind: SourceKind::Imex,
            path: None,
            output: None,
            schema: None,
        })],
        ..empty_config()
    };
    assert_matches!(
        ConfigLoader::resolve_config(config),
        Err(InteractomeError::ConfigParse(_))
    );
}

#[test]
fn locate_prefers_data_dir_then_output_dir() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().to_str().unwrap().to_string();
    std::fs::create_dir_all(temp.path().join("data")).unwrap();
    std::fs::write(temp.path().join("data").join("protein.csv"), "uniprot\n").unwrap();

    let config = Config {
        data_dir: Some(format!("{root}/data")),
        output_dir: Some(format!("{root}/out")),
        ..empty_config()
    };
    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert!(resolved.locate("protein.csv").starts_with(&resolved.data_dir));
    assert!(
        resolved
            .locate("interactions_imex.csv")
            .starts_with(&resolved.output_dir)
    );
}

#[test]
fn resolve_reads_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("kira-im.json");
    std::fs::write(
        &path,
        r#"{ "sources": ["inweb:core.psimitab"], "float_precision": 2, "source_precedence": ["intact"] }"#,
    )
    .unwrap();
    let resolved = ConfigLoader::resolve(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(resolved.float_precision, 2);
    assert_eq!(resolved.source_precedence, vec!["intact".to_string()]);

    std::fs::write(&path, "{ not json").unwrap();
    assert_matches!(
        ConfigLoader::resolve(Some(path.to_str().unwrap())),
        Err(InteractomeError::ConfigParse(_))
    );
}
