//! Loading templates, instances and configuration from disk

use std::fs;

use ottr::{write_statements, DiagnosticCode, OttrConfig, OttrGenerator, OutputFormat};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_expand_files_to_ntriples() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        &dir,
        "ottr.yaml",
        "prefixes:\n  ex: \"http://example.org#\"\nstandard_library: false\n",
    );
    let library = write(
        &dir,
        "library.stottr",
        "ex:Named[ ottr:IRI ?x, ?name ] :: { ottr:Triple(?x, ex:name, ?name) } .\n",
    );
    let instances = write(
        &dir,
        "instances.stottr",
        "ex:Named(ex:a, \"A\") .\nex:Named(ex:b, \"B\"@en) .\n",
    );

    let config = OttrConfig::load(Some(config.as_path())).unwrap();
    assert!(!config.standard_library);
    let mut generator = OttrGenerator::new(&config).unwrap();
    assert_eq!(generator.load_template_file(&library).unwrap(), 1);

    let parsed = generator.instantiate_file(&instances).unwrap();
    let mut out = Vec::new();
    for outcome in parsed.execute() {
        write_statements(&mut out, outcome.statements(), OutputFormat::NTriples).unwrap();
    }
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<http://example.org#a> <http://example.org#name> \"A\" .\n\
         <http://example.org#b> <http://example.org#name> \"B\"@en .\n"
    );
}

#[test]
fn test_missing_template_file_has_context() {
    let dir = tempfile::tempdir().unwrap();
    let mut generator = OttrGenerator::new(&OttrConfig::default()).unwrap();
    let err = generator
        .load_template_file(dir.path().join("absent.stottr"))
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read template file"));
}

#[test]
fn test_template_syntax_errors_are_located_in_their_file() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write(
        &dir,
        "broken.stottr",
        "@prefix ex: <http://example.org#> .\nex:Bad[ ?x ] :: { ottr:Triple(?x, ex:p, ?y) } .\n",
    );
    let mut generator = OttrGenerator::new(&OttrConfig::default()).unwrap();
    assert_eq!(generator.load_template_file(&broken).unwrap(), 0);

    let diagnostics = generator.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::UndeclaredVariable);
    let location = diagnostics[0].location.as_ref().unwrap();
    assert_eq!(location.line, 2);
    assert_eq!(
        location.source_name.as_deref(),
        Some(broken.display().to_string().as_str())
    );

    let instances = write(&dir, "instances.stottr", "ottr:Triple(ex:a, ex:b, ex:c) .\n");
    let err = generator.instantiate_file(&instances).err().unwrap();
    assert!(format!("{:#}", err).contains("refusing to instantiate"));
}
