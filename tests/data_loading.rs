//! Integration tests for the delimited-table loaders.

use std::fs;
use std::path::Path;

use subjectivity_classifiers::config::ClassifierConfig;
use subjectivity_classifiers::io::tables::{
    load_data_from, load_data_into_classifier_from, read_feature_table, read_label_table,
};

fn write_fixture(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("failed to write fixture");
}

fn write_four_files(dir: &Path) {
    write_fixture(
        dir,
        "x_train.csv",
        "f0,f1,f2\n1.0,0.5,0.0\n0.9,0.4,0.1\n0.1,0.2,0.9\n0.0,0.3,1.0\n",
    );
    write_fixture(dir, "y_train.csv", "label\n1\n1\n0\n0\n");
    write_fixture(dir, "x_test.csv", "f0,f1,f2\n1.0,0.4,0.0\n0.1,0.1,0.8\n");
    write_fixture(dir, "y_test.csv", "label\n1\n0\n");
}

#[test]
fn feature_table_shape_matches_data_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "x.csv", "a,b\n1.0,2.0\n3.0,4.0\n5.0,6.0\n");

    let x = read_feature_table(dir.path().join("x.csv")).unwrap();
    assert_eq!(x.nrows(), 3);
    assert_eq!(x.ncols(), 2);
    assert!((x[[2, 1]] - 6.0).abs() < 1e-12);
}

#[test]
fn label_table_flattens_single_column() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "y.csv", "label\n1\n0\n1\n");

    let y = read_label_table(dir.path().join("y.csv")).unwrap();
    assert_eq!(y.len(), 3);
    assert_eq!(y.to_vec(), vec![1, 0, 1]);
}

#[test]
fn label_table_flattens_multiple_columns() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "y.csv", "a,b\n1,0\n0,1\n");

    let y = read_label_table(dir.path().join("y.csv")).unwrap();
    assert_eq!(y.len(), 4, "two columns over two rows flatten to four labels");
}

#[test]
fn label_table_accepts_float_valued_labels() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "y.csv", "label\n1.0\n0.0\n");

    let y = read_label_table(dir.path().join("y.csv")).unwrap();
    assert_eq!(y.to_vec(), vec![1, 0]);
}

#[test]
fn missing_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_feature_table(dir.path().join("nope.csv")).is_err());
}

#[test]
fn malformed_field_errors_with_location() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "x.csv", "a,b\n1.0,oops\n");

    let err = read_feature_table(dir.path().join("x.csv")).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("oops"), "error should name the bad field: {}", msg);
}

#[test]
fn load_data_builds_validated_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_four_files(dir.path());

    let data = load_data_from(dir.path()).unwrap();
    assert_eq!(data.x_train.nrows(), 4);
    assert_eq!(data.x_test.nrows(), 2);
    assert_eq!(data.n_features(), 3);
    assert_eq!(data.y_train.len(), 4);
    assert_eq!(data.y_test.len(), 2);
    assert_eq!(data.class_labels(), vec![0, 1]);
}

#[test]
fn load_data_rejects_feature_dim_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    write_four_files(dir.path());
    // Rewrite the test features with a different column count.
    write_fixture(dir.path(), "x_test.csv", "f0,f1\n1.0,0.4\n0.1,0.1\n");

    assert!(load_data_from(dir.path()).is_err());
}

#[test]
fn load_data_into_classifier_binds_neural_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write_four_files(dir.path());

    let classifier = load_data_into_classifier_from(dir.path()).unwrap();
    match classifier.config() {
        ClassifierConfig::NeuralNet {
            solver,
            activation,
            alpha,
            hidden_layer_sizes,
        } => {
            assert_eq!(solver, "adam");
            assert_eq!(activation, "tanh");
            assert!((alpha - 1e-4).abs() < 1e-12);
            // Half of 3 input features, rounded up.
            assert_eq!(hidden_layer_sizes, &vec![2]);
        }
        other => panic!("expected neural defaults, got {:?}", other),
    }
}
