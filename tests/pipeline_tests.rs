use std::fs;
use std::path::Path;

use tempfile::TempDir;

use movie_recommender::config::{Config, ParsePolicy};
use movie_recommender::error::AppError;
use movie_recommender::services::{run_with_console, SimilarityMode};

const TRAIN: &str = "userId,movieId,rating\n1,1,5\n1,2,3\n2,1,4\n2,2,5\n3,1,1\n";
const TEST: &str = "Id,userId,movieId\n1,1,2\n2,3,2\n3,2,3\n4,9,1\n";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn config_in(dir: &TempDir) -> Config {
    Config {
        train_path: dir.path().join("train.csv"),
        test_path: dir.path().join("test.csv"),
        output_path: dir.path().join("submission.csv"),
        ..Config::default()
    }
}

fn run(config: &Config) -> (movie_recommender::services::RunSummary, String) {
    let mut console = Vec::new();
    let summary = run_with_console(config, &mut console).unwrap();
    (summary, String::from_utf8(console).unwrap())
}

#[test]
fn test_end_to_end_submission() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "train.csv", TRAIN);
    write(dir.path(), "test.csv", TEST);
    let config = config_in(&dir);

    let (summary, _) = run(&config);

    // 1: user 2 is the only other rater of movie 2
    // 2: user 1 is closer to user 3 than user 2 is
    // 3: movie 3 is past the training matrix
    // 4: user 9 is not in the training data
    let submission = fs::read_to_string(&config.output_path).unwrap();
    let lines: Vec<&str> = submission.lines().collect();
    assert_eq!(lines[0], "Id,Predicted");
    assert_eq!(lines[1], "1,5");
    assert_eq!(lines[2], "2,3");
    assert_eq!(lines[3], "3,-1");
    assert_eq!(lines[4], "4,-1");
    assert_eq!(lines.len(), 5);

    assert_eq!(summary.num_users, 4);
    assert_eq!(summary.num_movies, 3);
    assert_eq!(summary.observations, 5);
    assert_eq!(summary.queries, 4);
    assert_eq!(summary.predicted, 2);
    assert_eq!(summary.no_neighbor, 1);
    assert_eq!(summary.failed, 1);
}

#[test]
fn test_console_report() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "train.csv", TRAIN);
    write(dir.path(), "test.csv", TEST);

    let (_, console) = run(&config_in(&dir));

    assert!(console.contains("Total number of users is: 4"));
    assert!(console.contains("Total number of movies is: 3"));
    assert!(console.contains("Top 10 Movies:"));
    assert!(console.contains("Top 10 Users:"));
    assert!(console.contains("only 2 of 10 requested movies have ratings"));
}

#[test]
fn test_truncates_by_default() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "train.csv", TRAIN);
    write(dir.path(), "test.csv", "Id,userId,movieId\n1,1,2\n");
    write(dir.path(), "submission.csv", "stale contents\n");
    let config = config_in(&dir);

    run(&config);

    let submission = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(submission, "Id,Predicted\n1,5\n");
}

#[test]
fn test_append_keeps_previous_rows() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "train.csv", TRAIN);
    write(dir.path(), "test.csv", "Id,userId,movieId\n1,1,2\n");
    let config = Config {
        append_output: true,
        ..config_in(&dir)
    };

    run(&config);
    run(&config);

    let submission = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(submission, "Id,Predicted\n1,5\n1,5\n");
}

#[test]
fn test_missing_training_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "test.csv", TEST);

    let err = run_with_console(&config_in(&dir), &mut Vec::new()).unwrap_err();

    assert!(matches!(err, AppError::Io { .. }));
    assert!(!dir.path().join("submission.csv").exists());
}

#[test]
fn test_parse_policy() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "train.csv",
        "userId,movieId,rating\n1,1,5\n1,2,3\n2,1,4\nbroken,line,here\n2,2,5\n",
    );
    write(dir.path(), "test.csv", "Id,userId,movieId\n1,1,2\n");

    let err = run_with_console(&config_in(&dir), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, AppError::Parse { line: 5, .. }));

    let config = Config {
        parse_policy: ParsePolicy::Skip,
        ..config_in(&dir)
    };
    let (summary, _) = run(&config);
    assert_eq!(summary.observations, 4);
    assert_eq!(summary.predicted, 1);
}

#[test]
fn test_oversized_ids_are_dimensions_error() {
    let dir = TempDir::new().unwrap();
    let train = format!("userId,movieId,rating\n1,1,5\n2,{},4\n", usize::MAX);
    write(dir.path(), "train.csv", &train);
    write(dir.path(), "test.csv", TEST);

    let err = run_with_console(&config_in(&dir), &mut Vec::new()).unwrap_err();

    assert!(matches!(err, AppError::Dimensions { num_users: 3, .. }));
    assert!(!dir.path().join("submission.csv").exists());
}

#[test]
fn test_invalid_utf8_line_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("train.csv"),
        b"userId,movieId,rating\n1,1,5\n\xfe,2,3\n2,1,4\n2,2,5\n",
    )
    .unwrap();
    write(dir.path(), "test.csv", "Id,userId,movieId\n1,1,2\n");
    let config = Config {
        parse_policy: ParsePolicy::Skip,
        ..config_in(&dir)
    };

    let (summary, _) = run(&config);

    assert_eq!(summary.observations, 3);
    assert_eq!(summary.predicted, 1);
}

#[test]
fn test_rated_only_mode_runs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "train.csv", TRAIN);
    write(dir.path(), "test.csv", "Id,userId,movieId\n1,1,2\n");
    let config = Config {
        similarity_mode: SimilarityMode::RatedOnly,
        ..config_in(&dir)
    };

    let (summary, _) = run(&config);

    assert_eq!(summary.predicted, 1);
    let submission = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(submission, "Id,Predicted\n1,5\n");
}
