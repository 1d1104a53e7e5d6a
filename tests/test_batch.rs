use std::fs;
use std::path::Path;

use teifix::batch::{discover, run_batch, BatchOptions, Mode, Outcome};
use teifix::{Config, Error, Registry};

const BROKEN: &str = "<TEI><teiHeader><textclass/></teiHeader></TEI>\n";
const FIXED: &str = "<TEI><teiHeader><textClass/></teiHeader></TEI>\n";
const CLEAN: &str = "<TEI><text/></TEI>\n";

fn corpus(dir: &Path) {
    fs::create_dir_all(dir.join("sub")).unwrap();
    fs::write(dir.join("broken.xml"), BROKEN).unwrap();
    fs::write(dir.join("clean.xml"), CLEAN).unwrap();
    fs::write(dir.join("sub/nested.xml"), BROKEN).unwrap();
    fs::write(dir.join("sub/invalid.xml"), "<TEI><p></TEI>").unwrap();
    fs::write(dir.join("readme.txt"), "<textclass/>").unwrap();
}

#[test]
fn test_in_place() {
    let dir = tempfile::tempdir().unwrap();
    corpus(dir.path());
    let sources = discover(&[dir.path()], &["xml".to_string()]).unwrap();
    assert_eq!(sources.len(), 4);

    let summary = run_batch(sources, &Registry::all(), &BatchOptions::default()).unwrap();
    assert_eq!(summary.repaired(), 2);
    assert_eq!(summary.unchanged(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.fixes(), 2);
    assert_eq!(summary.exit_code(&Mode::InPlace), 1);

    assert_eq!(fs::read_to_string(dir.path().join("broken.xml")).unwrap(), FIXED);
    assert_eq!(fs::read_to_string(dir.path().join("sub/nested.xml")).unwrap(), FIXED);
    assert_eq!(fs::read_to_string(dir.path().join("clean.xml")).unwrap(), CLEAN);
    // a failed file is left as it was
    assert_eq!(
        fs::read_to_string(dir.path().join("sub/invalid.xml")).unwrap(),
        "<TEI><p></TEI>"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("readme.txt")).unwrap(),
        "<textclass/>"
    );
}

#[test]
fn test_output_dir_keeps_relative_paths() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    corpus(input.path());
    fs::remove_file(input.path().join("sub/invalid.xml")).unwrap();

    let sources = discover(&[input.path()], &["xml".to_string()]).unwrap();
    let options = BatchOptions {
        mode: Mode::OutputDir(output.path().to_path_buf()),
        ..BatchOptions::default()
    };
    let summary = run_batch(sources, &Registry::all(), &options).unwrap();
    assert_eq!(summary.exit_code(&options.mode), 0);

    assert_eq!(fs::read_to_string(output.path().join("broken.xml")).unwrap(), FIXED);
    assert_eq!(fs::read_to_string(output.path().join("sub/nested.xml")).unwrap(), FIXED);
    assert_eq!(fs::read_to_string(output.path().join("clean.xml")).unwrap(), CLEAN);
    // the input is untouched
    assert_eq!(fs::read_to_string(input.path().join("broken.xml")).unwrap(), BROKEN);
}

#[test]
fn test_check_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.xml"), BROKEN).unwrap();
    let sources = discover(&[dir.path()], &["xml".to_string()]).unwrap();
    let options = BatchOptions {
        mode: Mode::Check,
        ..BatchOptions::default()
    };
    let summary = run_batch(sources, &Registry::all(), &options).unwrap();
    match &summary.files[0].outcome {
        Outcome::Repaired(report) => {
            assert_eq!(report.fixes[0].to_string(), "textclass-casing: /TEI/teiHeader/textclass")
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(summary.exit_code(&options.mode), 1);
    assert_eq!(fs::read_to_string(dir.path().join("broken.xml")).unwrap(), BROKEN);
}

#[test]
fn test_config_selects_categories_and_extensions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.tei"), BROKEN).unwrap();
    fs::write(dir.path().join("b.xml"), BROKEN).unwrap();
    fs::write(
        dir.path().join(teifix::DEFAULT_CONFIG_FILE),
        "transforms: [head]\nextensions: [tei]\n",
    )
    .unwrap();

    let config = Config::discover(dir.path()).unwrap();
    let sources = discover(&[dir.path()], &config.extensions).unwrap();
    assert_eq!(sources.len(), 1);
    let summary = run_batch(sources, &config.registry().unwrap(), &BatchOptions::default()).unwrap();
    // the head category doesn't touch header casing
    assert_eq!(summary.unchanged(), 1);
}

#[test]
fn test_output_dir_rejects_files_with_the_same_name() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::create_dir_all(input.path().join("a")).unwrap();
    fs::create_dir_all(input.path().join("b")).unwrap();
    fs::write(input.path().join("a/x.xml"), BROKEN).unwrap();
    fs::write(input.path().join("b/x.xml"), CLEAN).unwrap();

    let paths = [input.path().join("a/x.xml"), input.path().join("b/x.xml")];
    let sources = discover(&paths, &["xml".to_string()]).unwrap();
    let options = BatchOptions {
        mode: Mode::OutputDir(output.path().to_path_buf()),
        ..BatchOptions::default()
    };
    assert!(matches!(
        run_batch(sources.clone(), &Registry::all(), &options),
        Err(Error::OutputCollision { .. })
    ));
    // nothing was written
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);

    // in place there is nothing to collide
    let summary = run_batch(sources, &Registry::all(), &BatchOptions::default()).unwrap();
    assert_eq!(summary.repaired(), 1);
    assert_eq!(summary.unchanged(), 1);
}

